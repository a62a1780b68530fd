use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use roadtrip_search::config;
use roadtrip_search::search::SearchService;
use roadtrip_search::sparql::SparqlClient;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roadtrip_search=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "roadtrip-search {} ({} build, {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TIME")
    );

    // Load configuration / 加载配置
    let app_config = config::load_config().map_err(anyhow::Error::msg)?;
    tracing::info!(
        "SPARQL endpoint {} ({:?}, timeout {}s)",
        app_config.sparql.endpoint,
        app_config.sparql.request_mode,
        app_config.sparql.timeout_secs
    );

    let client = SparqlClient::new(&app_config.sparql)?;
    let search = SearchService::from_config(&app_config, Arc::new(client));
    let bind_addr = app_config.get_bind_address();

    let state = Arc::new(AppState::new(app_config, search));
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Search API running at http://{} (/countrysearch, /citysearch)", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
