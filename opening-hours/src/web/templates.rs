//! Askama page templates.
//!
//! The hours list itself is a fragment template owned by
//! [`crate::week`]; pages here only embed it.

use askama::Template;

/// Demo page embedding the hours for one place.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Place shown, blank when none is configured.
    pub place_id: String,
    /// Rendered hours fragment or fallback message, embedded unescaped.
    pub hours: String,
}
