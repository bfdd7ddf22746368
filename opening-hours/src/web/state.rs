//! Application state for the web layer.

use std::sync::Arc;

use crate::shortcode::OpeningHoursShortcode;

/// Shared application state.
///
/// Generic over the hours source so tests can serve mock data.
pub struct AppState<S> {
    /// Opening hours handler (cache and renderer included)
    pub hours: Arc<OpeningHoursShortcode<S>>,
}

impl<S> AppState<S> {
    /// Create a new app state.
    pub fn new(hours: OpeningHoursShortcode<S>) -> Self {
        Self {
            hours: Arc::new(hours),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            hours: Arc::clone(&self.hours),
        }
    }
}
