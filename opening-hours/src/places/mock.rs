//! Mock Places client for testing without API access.
//!
//! Serves a fixed set of weekday lines, or a scripted failure, as if they
//! were live API responses. Counts every call so tests can assert on how
//! often the API would have been hit.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::FetchError;
use super::source::HoursSource;

/// A failure the mock client should report instead of its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    /// Non-200 HTTP status
    Http(u16),
    /// API `status` other than `OK`
    ApiStatus(String),
    /// API `error_message`
    Api(String),
    /// No `weekday_text` in the response
    NoHours,
}

impl MockFailure {
    fn to_error(&self) -> FetchError {
        match self {
            MockFailure::Http(code) => FetchError::Http(*code),
            MockFailure::ApiStatus(status) => FetchError::ApiStatus(status.clone()),
            MockFailure::Api(message) => FetchError::Api(message.clone()),
            MockFailure::NoHours => FetchError::NoHours,
        }
    }
}

/// Mock Places client that serves static data.
#[derive(Clone)]
pub struct MockPlacesClient {
    lines: Arc<RwLock<Vec<String>>>,
    failure: Arc<RwLock<Option<MockFailure>>>,
    calls: Arc<AtomicUsize>,
}

impl MockPlacesClient {
    /// Create a mock that returns `lines` for every place.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Arc::new(RwLock::new(lines.into_iter().map(Into::into).collect())),
            failure: Arc::new(RwLock::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock serving a typical Monday-to-Friday week.
    pub fn office_week() -> Self {
        Self::new([
            "Monday: 9:00 AM – 5:00 PM",
            "Tuesday: 9:00 AM – 5:00 PM",
            "Wednesday: 9:00 AM – 5:00 PM",
            "Thursday: 9:00 AM – 5:00 PM",
            "Friday: 9:00 AM – 5:00 PM",
            "Saturday: Closed",
            "Sunday: Closed",
        ])
    }

    /// Create a mock that always fails.
    pub fn failing(failure: MockFailure) -> Self {
        let mut mock = Self::new(Vec::<String>::new());
        mock.failure = Arc::new(RwLock::new(Some(failure)));
        mock
    }

    /// Make subsequent calls fail, or succeed again with `None`.
    pub async fn set_failure(&self, failure: Option<MockFailure>) {
        *self.failure.write().await = failure;
    }

    /// Replace the lines served by subsequent calls.
    pub async fn set_lines(&self, lines: Vec<String>) {
        *self.lines.write().await = lines;
    }

    /// How many times `fetch_hours` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HoursSource for MockPlacesClient {
    async fn fetch_hours(&self, place_id: &str) -> Result<Vec<String>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if place_id.is_empty() {
            return Err(FetchError::Config);
        }

        if let Some(failure) = self.failure.read().await.as_ref() {
            return Err(failure.to_error());
        }

        Ok(self.lines.read().await.clone())
    }
}
