//! Weekly opening hours rendering.
//!
//! Turns the API's weekday lines into a Monday-to-Sunday list. Each day is
//! labelled with the calendar date it falls on in the current week window
//! (today and the six days after it), and today's row can be highlighted.
//!
//! The list is never rotated: Monday is always first. Only the dates and the
//! highlight move as the week goes on.

use std::collections::HashMap;

use askama::Template;
use chrono::{DateTime, Datelike, Days, TimeZone};
use tracing::error;

/// Fixed display order of the week.
pub const DAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Date format for the per-day label, e.g. `18 March, 2024`.
const DATE_FORMAT: &str = "%d %B, %Y";

/// Rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append each day's calendar date.
    pub show_dates: bool,
    /// Bold today's row and give it the `today` class.
    pub highlight_today: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_dates: true,
            highlight_today: true,
        }
    }
}

/// One parsed weekday line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub day: String,
    pub hours: String,
}

impl DayEntry {
    /// Split a line such as `"Monday: 9:00 AM – 5:00 PM"` on its first `": "`.
    ///
    /// Returns `None` for lines without the separator.
    pub fn parse(line: &str) -> Option<Self> {
        let (day, hours) = line.split_once(": ")?;
        Some(Self {
            day: day.to_string(),
            hours: hours.to_string(),
        })
    }
}

/// Build the day name → hours lookup. Malformed lines are dropped and a
/// repeated day keeps its last line.
pub fn hours_by_day(lines: &[String]) -> HashMap<String, String> {
    lines
        .iter()
        .filter_map(|line| DayEntry::parse(line))
        .map(|entry| (entry.day, entry.hours))
        .collect()
}

/// Zero-based weekday of `now` with Monday = 0.
pub fn today_index<Tz: TimeZone>(now: &DateTime<Tz>) -> usize {
    now.weekday().num_days_from_monday() as usize
}

/// Days from today forward to the day at `day_index`: 0 for today, 1..=6
/// for the rest of the week window.
pub fn day_offset(day_index: usize, today_index: usize) -> usize {
    (day_index + 7 - today_index) % 7
}

/// A row of the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub label: &'static str,
    pub date: Option<String>,
    pub hours: String,
    pub is_today: bool,
    /// Today, with highlighting switched on.
    pub highlighted: bool,
}

/// Weekly hours list fragment.
#[derive(Template)]
#[template(path = "week.html")]
pub struct WeekTemplate {
    pub days: Vec<DayView>,
}

/// Compute the seven rows, Monday first.
pub fn build_week<Tz: TimeZone>(
    lines: &[String],
    now: &DateTime<Tz>,
    options: &RenderOptions,
) -> Vec<DayView> {
    let by_day = hours_by_day(lines);
    let today = today_index(now);
    let today_date = now.date_naive();

    DAY_ORDER
        .iter()
        .enumerate()
        .map(|(i, &label)| {
            let offset = day_offset(i, today);
            // Calendar-day arithmetic: a DST switch inside the window must
            // not move a date.
            let date = options
                .show_dates
                .then(|| today_date.checked_add_days(Days::new(offset as u64)))
                .flatten()
                .map(|d| d.format(DATE_FORMAT).to_string());
            let is_today = i == today;

            DayView {
                label,
                date,
                hours: by_day.get(label).cloned().unwrap_or_default(),
                is_today,
                highlighted: is_today && options.highlight_today,
            }
        })
        .collect()
}

/// Render the weekly list as an HTML fragment.
///
/// Pure function of its inputs. Never fails: missing days render with blank
/// hours, and a template error (logged) yields an empty string.
pub fn render_week<Tz: TimeZone>(
    lines: &[String],
    now: &DateTime<Tz>,
    options: &RenderOptions,
) -> String {
    let template = WeekTemplate {
        days: build_week(lines, now, options),
    };

    template.render().unwrap_or_else(|e| {
        error!(error = %e, "failed to render opening hours template");
        String::new()
    })
}
