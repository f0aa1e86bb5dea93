mod auth;
mod handlers;
mod hackrx_request;
mod query_response;

use axum::{
    routing::{get, post},
    Router,
};
use qa_engine::{
    ContextBuilder, DocumentFetcher, EngineConfig, GeminiService, InMemoryStore, KeyRotator,
    QueryService, SessionStore,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueryService>,
    pub store: Arc<dyn SessionStore>,
    pub config: Arc<EngineConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = EngineConfig::from_env()?;
    log::info!(
        "starting with {} credential(s), model {}, strategy {}",
        config.api_keys.len(),
        config.model,
        config.strategy.as_str()
    );

    let rotator = Arc::new(KeyRotator::new(config.api_keys.clone())?);
    let llm = Arc::new(GeminiService::new(rotator, config.model.clone()));
    // Process-local store; a store honoring SessionStore and the configured
    // connection settings can replace it here.
    let store: Arc<dyn SessionStore> = Arc::new(InMemoryStore::new());
    log::info!(
        "session store: in-memory (configured target {}/{})",
        config.mongo_url,
        config.db_name
    );

    let service = Arc::new(QueryService::new(
        DocumentFetcher::new()?,
        ContextBuilder::new(config.strategy),
        llm,
        store.clone(),
    ));

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        service,
        store,
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/hackrx/run", post(handlers::run))
        .route("/hackrx/upload", post(handlers::upload))
        .route(
            "/sessions/:session_id/history",
            get(handlers::session_history),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
