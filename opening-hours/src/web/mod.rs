//! Web layer for the opening hours service.
//!
//! Exposes the shortcode handler over HTTP, plus a demo page.

mod routes;
mod state;
pub mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
