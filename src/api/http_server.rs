use super::handlers::{build_prompt_handler, generate_image_handler, index_handler};
use super::AppState;
use crate::ai::{OpenAiChatClient, OpenAiImageClient};
use crate::models::Config;
use crate::{Error, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the router with CORS restricted to `allowed_origins`.
pub fn create_app(state: AppState, allowed_origins: &[String]) -> Result<Router> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| Error::Config(format!("Invalid CORS origin '{}'", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/", get(index_handler))
        .route("/build_prompt", post(build_prompt_handler))
        .route("/generate_image", post(generate_image_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Wire the upstream clients from `config` and serve until Ctrl-C.
pub async fn start_server(config: Config) -> Result<()> {
    // Reuse one HTTP connection pool across both upstream clients.
    let http_client = reqwest::Client::new();

    let chat = OpenAiChatClient::new_with_client(
        config.chat_api_url.clone(),
        config.chat_api_key.clone(),
        config.chat_timeout,
        http_client.clone(),
    );
    let image_gen = OpenAiImageClient::new_with_client(
        config.image_api_url.clone(),
        config.image_api_key.clone(),
        config.image_model.clone(),
        config.image_timeout,
        http_client,
    );

    let state = AppState::new(Arc::new(chat), Arc::new(image_gen));
    let app = create_app(state, &config.allowed_origins)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("API server listening on {}", config.bind_addr);
    tracing::info!("CORS origins: {}", config.allowed_origins.join(", "));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
