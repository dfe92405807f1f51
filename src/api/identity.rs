use crate::AppState;
use crate::token::CallerIdentity;
use axum::extract::FromRequestParts;
use axum::http::HeaderName;
use axum::http::request::Parts;
use std::convert::Infallible;

/// Header the upstream identity provider sets on authenticated requests
pub const DEFAULT_IDENTITY_HEADER: &str = "x-authenticated-user";

/// Caller identity forwarded by the identity provider, if any.
///
/// Never rejects: a missing or blank header yields `None` and the decision is
/// left to the token issuer.
#[derive(Debug, Clone)]
pub struct Identity(pub Option<CallerIdentity>);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_name = parts
            .extensions
            .get::<AppState>()
            .map(|state| state.identity_header.clone())
            .unwrap_or_else(|| HeaderName::from_static(DEFAULT_IDENTITY_HEADER));

        let identity = parts
            .headers
            .get(&header_name)
            .and_then(|value| value.to_str().ok())
            .and_then(CallerIdentity::new);

        Ok(Identity(identity))
    }
}
