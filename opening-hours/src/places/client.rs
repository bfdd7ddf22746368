//! Google Places Details HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::error::FetchError;
use super::source::HoursSource;

/// Default base URL for the Places API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Path of the place details endpoint, relative to the base URL.
const DETAILS_PATH: &str = "/maps/api/place/details/json";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 12;

/// Site URL reported in the user agent when none is configured.
const DEFAULT_SITE_URL: &str = "http://localhost:3000/";

/// Configuration for the Places client.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production Google)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Public URL of the site embedding the hours, reported in the user agent
    pub site_url: String,
}

impl PlacesConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the site URL reported in the user agent.
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self
    }

    /// The user agent string sent with every request.
    pub fn user_agent(&self) -> String {
        format!(
            "opening-hours/{}; {}",
            env!("CARGO_PKG_VERSION"),
            self.site_url
        )
    }
}

/// Places Details API client.
///
/// Only the opening hours field is ever requested.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PlacesClient {
    /// Create a new Places client with the given configuration.
    ///
    /// An empty API key is accepted here; every fetch then fails with
    /// [`FetchError::Config`].
    pub fn new(config: PlacesConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn details_url(&self) -> String {
        format!("{}{}", self.base_url, DETAILS_PATH)
    }
}

#[async_trait]
impl HoursSource for PlacesClient {
    async fn fetch_hours(&self, place_id: &str) -> Result<Vec<String>, FetchError> {
        if self.api_key.is_empty() || place_id.is_empty() {
            return Err(FetchError::Config);
        }

        debug!(place_id, "requesting place details");

        let response = self
            .http
            .get(self.details_url())
            .query(&[
                ("place_id", place_id),
                ("fields", "opening_hours"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = response.text().await?;
        parse_details_body(&body)
    }
}

/// Validate a place details response body and pull out `weekday_text`.
///
/// Checks run in a fixed order: JSON syntax, `error_message`, `status`,
/// then the presence of the `result.opening_hours.weekday_text` array.
pub fn parse_details_body(body: &str) -> Result<Vec<String>, FetchError> {
    let data: Value = serde_json::from_str(body).map_err(|e| FetchError::Json(e.to_string()))?;

    if let Some(message) = data.get("error_message").filter(|v| is_present(v)) {
        let message = match message {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        return Err(FetchError::Api(message));
    }

    match data.get("status") {
        None | Some(Value::Null) => {}
        Some(Value::String(status)) if status == "OK" => {}
        Some(Value::String(status)) => return Err(FetchError::ApiStatus(status.clone())),
        Some(other) => return Err(FetchError::ApiStatus(other.to_string())),
    }

    let lines = data
        .pointer("/result/opening_hours/weekday_text")
        .and_then(Value::as_array)
        .ok_or(FetchError::NoHours)?;

    Ok(lines
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect())
}

/// Whether a JSON value counts as set: not null, false, zero, `""`, `"0"`,
/// or an empty array or object.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
