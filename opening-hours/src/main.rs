use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use opening_hours::cache::{CachedHoursClient, MokaStore};
use opening_hours::config::{API_KEY_VAR, AppConfig, ConfigError, PLACE_ID_VAR};
use opening_hours::places::{FetchError, PlacesClient};
use opening_hours::shortcode::OpeningHoursShortcode;
use opening_hours::web::{AppState, create_router};

/// Fatal startup failures.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build Places client: {0}")]
    Client(#[from] FetchError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("opening_hours=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "opening hours service stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;

    if config.api_key.is_empty() {
        warn!("{API_KEY_VAR} not set. API calls will fail.");
    }
    if config.default_place_id.is_empty() {
        warn!("{PLACE_ID_VAR} not set. Requests must name a place_id.");
    }

    // Places client behind the read-through cache
    let cache_config = config.cache_config();
    let places = PlacesClient::new(config.places_config())?;
    let store = Arc::new(MokaStore::new(cache_config.max_capacity));
    let hours = CachedHoursClient::new(places, store, &cache_config);

    let shortcode = OpeningHoursShortcode::new(hours, config.shortcode_config());
    let app = create_router(AppState::new(shortcode));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        timezone = %config.timezone,
        cache_ttl_secs = cache_config.ttl.as_secs(),
        "opening hours service listening"
    );
    info!("  GET  /               - Demo page");
    info!("  GET  /opening-hours  - Hours fragment (place_id, show_dates, highlight_today)");
    info!("  GET  /health         - Health check");

    axum::serve(listener, app).await?;
    Ok(())
}
