//! Google Places Details client.
//!
//! Fetches a place's opening hours as the API's `weekday_text` lines.
//!
//! Key characteristics of the endpoint:
//! - Only `fields=opening_hours` is requested
//! - Failures can arrive as an HTTP status, an `error_message`, or a
//!   non-`OK` `status` inside a 200 response
//! - `weekday_text` is Monday first, one `"Day: hours"` line per day

mod client;
mod error;
mod mock;
mod source;

pub use client::{PlacesClient, PlacesConfig, parse_details_body};
pub use error::FetchError;
pub use mock::{MockFailure, MockPlacesClient};
pub use source::HoursSource;
