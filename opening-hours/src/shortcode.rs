//! The `display_opening_hours` entry point.
//!
//! Accepts shortcode-style attributes, resolves them against site
//! configuration, and returns either the rendered list or a plain-text
//! message that is safe to show to visitors. Failure details only go to the
//! log.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::cache::CachedHoursClient;
use crate::places::HoursSource;
use crate::week::{RenderOptions, render_week};

/// Shown when neither the attribute nor the site default names a place.
pub const MISSING_PLACE_ID: &str = "Place ID is missing.";

/// Shown for any fetch failure.
pub const HOURS_UNAVAILABLE: &str = "Opening hours not available at the moment.";

/// Shown when the API answered with an empty week.
pub const NO_HOURS: &str = "Opening hours not available.";

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*?>.*?</(script|style)>").expect("valid regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("valid regex"));
static PERCENT_OCTET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("valid regex"));

/// Clean a free-text attribute: drop markup, control characters and
/// percent-encoded octets, collapse whitespace runs, trim.
fn sanitize_text(raw: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(raw, "");
    let text = TAG.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let mut text: String = text.chars().filter(|c| !c.is_control()).collect();
    while PERCENT_OCTET.is_match(&text) {
        text = PERCENT_OCTET.replace_all(&text, "").into_owned();
    }

    text.trim().to_string()
}

/// Shortcode attributes. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShortcodeAttrs {
    pub place_id: Option<String>,
    pub show_dates: Option<String>,
    pub highlight_today: Option<String>,
}

impl ShortcodeAttrs {
    /// Attributes for a specific place, other options left at their defaults.
    pub fn for_place(place_id: impl Into<String>) -> Self {
        Self {
            place_id: Some(place_id.into()),
            ..Self::default()
        }
    }

    /// The rendering switches these attributes ask for.
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            show_dates: yes_flag(self.show_dates.as_deref()),
            highlight_today: yes_flag(self.highlight_today.as_deref()),
        }
    }
}

/// `"yes"` in any case is true, anything else false, absent means yes.
fn yes_flag(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.eq_ignore_ascii_case("yes"))
}

/// Site-wide settings for the handler.
#[derive(Debug, Clone)]
pub struct ShortcodeConfig {
    /// Place used when the attribute is absent.
    pub default_place_id: String,
    /// Zone in which "today" and the calendar dates are computed.
    pub timezone: Tz,
}

/// Renders opening hours for embedding in a page.
pub struct OpeningHoursShortcode<S> {
    hours: CachedHoursClient<S>,
    config: ShortcodeConfig,
}

impl<S: HoursSource> OpeningHoursShortcode<S> {
    pub fn new(hours: CachedHoursClient<S>, config: ShortcodeConfig) -> Self {
        Self { hours, config }
    }

    /// Render for the current moment.
    pub async fn render(&self, attrs: &ShortcodeAttrs) -> String {
        self.render_at(attrs, Utc::now()).await
    }

    /// Render as of `now`, converted to the configured timezone.
    pub async fn render_at(&self, attrs: &ShortcodeAttrs, now: DateTime<Utc>) -> String {
        let place_id = self.resolve_place_id(attrs);
        if place_id.is_empty() {
            return MISSING_PLACE_ID.to_string();
        }

        let lines = match self.hours.get_hours(&place_id).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!(place_id = %place_id, error = %e, "opening hours unavailable");
                return HOURS_UNAVAILABLE.to_string();
            }
        };

        if lines.is_empty() {
            return NO_HOURS.to_string();
        }

        let now = now.with_timezone(&self.config.timezone);
        render_week(&lines, &now, &attrs.options())
    }

    /// The place named by the attribute, or the site default when the
    /// attribute is absent. An explicitly blank attribute stays blank.
    fn resolve_place_id(&self, attrs: &ShortcodeAttrs) -> String {
        let raw = attrs
            .place_id
            .as_deref()
            .unwrap_or(&self.config.default_place_id);
        sanitize_text(raw)
    }

    pub fn config(&self) -> &ShortcodeConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;

    use super::*;
    use crate::cache::{CacheConfig, MokaStore};
    use crate::places::{MockFailure, MockPlacesClient};

    fn shortcode(
        source: MockPlacesClient,
        default_place_id: &str,
    ) -> OpeningHoursShortcode<MockPlacesClient> {
        let hours = CachedHoursClient::new(
            source,
            Arc::new(MokaStore::new(100)),
            &CacheConfig::default(),
        );
        OpeningHoursShortcode::new(
            hours,
            ShortcodeConfig {
                default_place_id: default_place_id.to_string(),
                timezone: chrono_tz::Europe::London,
            },
        )
    }

    /// Wednesday 13 March 2024, 10:00 UTC.
    fn wednesday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 13, 10, 0, 0).unwrap()
    }

    #[test]
    fn flags_default_to_yes() {
        assert!(yes_flag(None));
        assert!(yes_flag(Some("yes")));
        assert!(yes_flag(Some("YES")));
        assert!(yes_flag(Some("Yes")));
        assert!(!yes_flag(Some("no")));
        assert!(!yes_flag(Some("true")));
        assert!(!yes_flag(Some("")));
    }

    #[test]
    fn sanitize_strips_markup_and_controls() {
        assert_eq!(sanitize_text("  ChIJabc  "), "ChIJabc");
        assert_eq!(sanitize_text("<b>ChIJabc</b>"), "ChIJabc");
        assert_eq!(sanitize_text("ChIJ<script>alert(1)</script>abc"), "ChIJabc");
        assert_eq!(sanitize_text("ChIJ\tabc\r\n"), "ChIJ abc");
        assert_eq!(sanitize_text("ChIJ\u{0}abc"), "ChIJabc");
        assert_eq!(sanitize_text("ChIJ%0aabc"), "ChIJabc");
        assert_eq!(sanitize_text("ChIJ%%4141abc"), "ChIJabc");
        assert_eq!(sanitize_text("<p></p>"), "");
    }

    #[test]
    fn attrs_to_options() {
        let attrs = ShortcodeAttrs {
            place_id: None,
            show_dates: Some("no".into()),
            highlight_today: None,
        };
        assert_eq!(
            attrs.options(),
            RenderOptions {
                show_dates: false,
                highlight_today: true
            }
        );
    }

    #[tokio::test]
    async fn missing_place_id_skips_fetch() {
        let source = MockPlacesClient::office_week();
        let handler = shortcode(source.clone(), "ChIJdefault");

        let out = handler
            .render_at(&ShortcodeAttrs::for_place(""), wednesday())
            .await;

        assert_eq!(out, MISSING_PLACE_ID);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn blank_place_id_is_missing() {
        let source = MockPlacesClient::office_week();
        let handler = shortcode(source.clone(), "   ");

        let out = handler
            .render_at(&ShortcodeAttrs::default(), wednesday())
            .await;

        assert_eq!(out, MISSING_PLACE_ID);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn falls_back_to_default_place() {
        let source = MockPlacesClient::office_week();
        let handler = shortcode(source.clone(), "ChIJdefault");

        let out = handler
            .render_at(&ShortcodeAttrs::default(), wednesday())
            .await;

        assert!(out.starts_with(r#"<ul class="gmb-hours">"#));
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn attribute_wins_over_default() {
        let handler = shortcode(MockPlacesClient::office_week(), "ChIJdefault");

        assert_eq!(
            handler.resolve_place_id(&ShortcodeAttrs::for_place("  ChIJother ")),
            "ChIJother"
        );
        assert_eq!(
            handler.resolve_place_id(&ShortcodeAttrs::default()),
            "ChIJdefault"
        );
        assert_eq!(
            handler.resolve_place_id(&ShortcodeAttrs::for_place("<em>ChIJother</em>\n")),
            "ChIJother"
        );
        assert_eq!(handler.resolve_place_id(&ShortcodeAttrs::for_place(" ")), "");
    }

    #[tokio::test]
    async fn http_error_is_hidden() {
        let source = MockPlacesClient::failing(MockFailure::Http(403));
        let handler = shortcode(source, "ChIJplace");

        let out = handler
            .render_at(&ShortcodeAttrs::default(), wednesday())
            .await;

        assert_eq!(out, HOURS_UNAVAILABLE);
        assert!(!out.contains("403"));
    }

    #[tokio::test]
    async fn api_message_is_hidden() {
        let source =
            MockPlacesClient::failing(MockFailure::Api("The provided API key is invalid.".into()));
        let handler = shortcode(source, "ChIJplace");

        let out = handler
            .render_at(&ShortcodeAttrs::default(), wednesday())
            .await;

        assert_eq!(out, HOURS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn empty_week_has_its_own_message() {
        let source = MockPlacesClient::new(Vec::<String>::new());
        let handler = shortcode(source, "ChIJplace");

        let out = handler
            .render_at(&ShortcodeAttrs::default(), wednesday())
            .await;

        assert_eq!(out, NO_HOURS);
    }

    #[tokio::test]
    async fn renders_in_configured_timezone() {
        let handler = shortcode(MockPlacesClient::office_week(), "ChIJplace");

        // 23:30 UTC on Tuesday 12 March is still Tuesday in London (GMT).
        let now = Utc.with_ymd_and_hms(2024, 3, 12, 23, 30, 0).unwrap();
        let out = handler.render_at(&ShortcodeAttrs::default(), now).await;
        assert!(out.contains(r#"<li class="today"><strong><span class="gmb-hours__day">Tuesday</span>"#));

        // 23:30 UTC on Tuesday 9 July is Wednesday 00:30 in London (BST).
        let now = Utc.with_ymd_and_hms(2024, 7, 9, 23, 30, 0).unwrap();
        let out = handler.render_at(&ShortcodeAttrs::default(), now).await;
        assert!(out.contains(r#"<li class="today"><strong><span class="gmb-hours__day">Wednesday</span>"#));
        assert!(out.contains("(10 July, 2024)"));
    }

    #[tokio::test]
    async fn options_pass_through() {
        let handler = shortcode(MockPlacesClient::office_week(), "ChIJplace");
        let attrs = ShortcodeAttrs {
            place_id: None,
            show_dates: Some("NO".into()),
            highlight_today: Some("no".into()),
        };

        let out = handler.render_at(&attrs, wednesday()).await;

        assert!(!out.contains("gmb-hours__date"));
        assert!(!out.contains("<strong>"));
        assert_eq!(out.matches("<li>").count(), 7);
    }

    #[tokio::test]
    async fn second_render_uses_cache() {
        let source = MockPlacesClient::office_week();
        let handler = shortcode(source.clone(), "ChIJplace");

        let first = handler
            .render_at(&ShortcodeAttrs::default(), wednesday())
            .await;
        let second = handler
            .render_at(&ShortcodeAttrs::default(), wednesday())
            .await;

        assert_eq!(first, second);
        assert_eq!(source.calls(), 1);
    }
}
