use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fiscal_search_api::app::{api_routes, build_router};
use fiscal_search_api::config::Config;
use fiscal_search_api::csv_provider::CsvDataProvider;
use fiscal_search_api::export_service::ExportService;
use fiscal_search_api::handlers::AppState;
use fiscal_search_api::search_service::SearchService;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The dataset provider (fails fast if the data file is missing).
/// - HTTP routes and middleware (CORS, body limit, rate limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fiscal_search_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let data_provider = CsvDataProvider::new(config.data_file.clone())?;
    tracing::info!("Dataset found at {}", data_provider.data_file().display());

    let app_state = Arc::new(AppState {
        config: config.clone(),
        search_service: SearchService::new(Arc::new(data_provider)),
        export_service: ExportService::new(),
    });

    // Per-IP rate limiter for the API routes
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let api = api_routes().layer(GovernorLayer {
        config: governor_conf,
    });

    let app = build_router(app_state, api);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
