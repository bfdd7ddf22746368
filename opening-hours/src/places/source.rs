//! The seam between the cache and whatever produces opening hours.

use async_trait::async_trait;

use super::error::FetchError;

/// Something that can produce the weekday text lines for a place.
///
/// Implemented by the live [`PlacesClient`](super::PlacesClient) and by
/// [`MockPlacesClient`](super::MockPlacesClient).
#[async_trait]
pub trait HoursSource: Send + Sync {
    /// Fetch the raw `weekday_text` lines for `place_id`.
    ///
    /// Lines are returned exactly as the API sent them, typically
    /// `"Monday: 9:00 AM – 5:00 PM"`, Monday first.
    async fn fetch_hours(&self, place_id: &str) -> Result<Vec<String>, FetchError>;
}
