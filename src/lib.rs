pub mod api;
pub mod app_state;
pub mod clock;
pub mod config;
pub mod error;
pub mod media;
pub mod token;

use axum::Router;
use axum::extract::Extension;
use axum::http::{HeaderName, header};
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tracing::info;

//
// Re-export
//
pub use api::{IssueTokenRequest, IssueTokenResponse, healthz, issue_token, stream_media};
pub use app_state::AppState;
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::Config;
pub use error::MediaError;
pub use media::{ByteRange, ContentStore, LogicalPath, StreamHandler, StreamResponse};
pub use token::{CallerIdentity, IssuedToken, TokenIssuer, TokenPayload, TokenSigner, TokenVerifier};

/// Request headers browsers may send cross-origin. The identity header is
/// never among them, so only the upstream proxy can set it.
pub const CORS_ALLOW_HEADERS: [HeaderName; 3] =
    [header::AUTHORIZATION, header::CONTENT_TYPE, header::RANGE];

/// Build the HTTP surface around an already-constructed state
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(CORS_ALLOW_HEADERS)
        .expose_headers(Any);

    Router::new()
        .route("/token", post(issue_token))
        .route("/stream", get(stream_media))
        .route("/healthz", get(healthz))
        .layer(axum::middleware::from_fn(api::log_request_errors))
        .layer(cors)
        .layer(Extension(state))
}

/// Serve `state` on an already-bound listener until the server stops
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(&config, Arc::new(SystemClock))?;

    let addr = format!("0.0.0.0:{}", config.listen_on_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Media API listening on {addr}");

    serve(listener, state).await
}
