use std::sync::Arc;

use chat_service::{
    config, error, logging, routes,
    services::user_directory::{InMemoryUserDirectory, UserDirectory},
    state::AppState,
    storage::{InMemoryMessageStore, MessageStore},
    websocket::ConnectionRegistry,
};

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    logging::init_tracing();
    let cfg = Arc::new(config::Config::from_env()?);

    let store: Arc<dyn MessageStore> = Arc::new(InMemoryMessageStore::new());
    // Stand-in directory; production deployments implement UserDirectory
    // against the user service.
    let users: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::from_env_seed()?);
    let registry = ConnectionRegistry::new();

    let state = AppState {
        store,
        users,
        registry,
        config: cfg.clone(),
    };

    let bind_addr = format!("{}:{}", cfg.bind_addr, cfg.port);
    tracing::info!(%bind_addr, "starting chat-service");

    let app = routes::build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| error::AppError::StartServer(e.to_string()))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| error::AppError::StartServer(e.to_string()))?;

    Ok(())
}
