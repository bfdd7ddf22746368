//! HTTP route handlers.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{Html, IntoResponse},
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::places::HoursSource;
use crate::shortcode::ShortcodeAttrs;

use super::state::AppState;
use super::templates::IndexTemplate;

/// Create the application router.
pub fn create_router<S: HoursSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(index_page::<S>))
        .route("/health", get(health))
        .route("/opening-hours", get(opening_hours::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Opening hours fragment, driven by the shortcode attributes in the query
/// string: `place_id`, `show_dates` and `highlight_today`.
///
/// Always 200. Failures come back as a visitor-safe message.
async fn opening_hours<S: HoursSource + 'static>(
    State(state): State<AppState<S>>,
    Query(attrs): Query<ShortcodeAttrs>,
) -> Html<String> {
    Html(state.hours.render(&attrs).await)
}

/// Demo page with the hours embedded.
async fn index_page<S: HoursSource + 'static>(
    State(state): State<AppState<S>>,
    Query(attrs): Query<ShortcodeAttrs>,
) -> impl IntoResponse {
    let hours = state.hours.render(&attrs).await;
    let place_id = attrs
        .place_id
        .unwrap_or_else(|| state.hours.config().default_place_id.clone());

    let page = IndexTemplate {
        place_id: place_id.trim().to_string(),
        hours,
    };
    Html(
        page.render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}
