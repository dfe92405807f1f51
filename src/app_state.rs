use crate::clock::SharedClock;
use crate::config::Config;
use crate::media::{ContentStore, StreamHandler};
use crate::token::{TokenIssuer, TokenSigner, TokenVerifier};
use axum::http::HeaderName;
use anyhow::Context;
use std::path::Path;
use tracing::{info, warn};

/// Everything a request handler needs. Cheap to clone, immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub issuer: TokenIssuer,
    pub stream_handler: StreamHandler,
    pub identity_header: HeaderName,
}

impl AppState {
    pub fn new(config: &Config, clock: SharedClock) -> anyhow::Result<Self> {
        if config.uses_dev_secret() {
            warn!("Using the built-in development token secret; do not run this in production");
        }

        let signer = TokenSigner::new(config.signing_secret()?)?;
        let store = ContentStore::open(Path::new(&config.content_root))
            .with_context(|| format!("failed to open content root {}", config.content_root))?;
        info!(root = ?store.root(), ttl_secs = config.token_ttl_secs, "Content store ready");

        Ok(Self {
            issuer: TokenIssuer::new(signer.clone(), config.token_ttl(), clock.clone()),
            stream_handler: StreamHandler::new(TokenVerifier::new(signer, clock), store),
            identity_header: config.identity_header_name()?,
        })
    }
}
