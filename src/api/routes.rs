use crate::AppState;
use crate::api::identity::Identity;
use crate::error::MediaError;
use crate::media::StreamResponse;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Query};
use axum::http::{HeaderMap, header};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Body of `POST /token`
#[derive(Debug, Clone, Deserialize)]
pub struct IssueTokenRequest {
    /// Logical media path, e.g. `<collectionId>/<filename>`
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenResponse {
    pub token: String,
    pub expires_at: u64,
    /// Relative URL the player can open directly
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub token: Option<String>,
}

/// Issue a short-lived credential for one media path
pub async fn issue_token(
    Extension(state): Extension<AppState>,
    Identity(identity): Identity,
    body: Result<Json<IssueTokenRequest>, JsonRejection>,
) -> Result<Json<IssueTokenResponse>, MediaError> {
    let path = match body {
        Ok(Json(request)) => request.path.unwrap_or_default(),
        Err(rejection) if identity.is_some() => {
            warn!(%rejection, "Rejected token request body");
            return Err(MediaError::InvalidRequest("invalid request body"));
        }
        Err(_) => String::new(),
    };

    let issued = state.issuer.issue_token(identity.as_ref(), &path)?;
    let url = format!("/stream?token={}", issued.token);

    Ok(Json(IssueTokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        url,
    }))
}

/// Stream a media file, honoring `Range`
pub async fn stream_media(
    Extension(state): Extension<AppState>,
    query: Result<Query<StreamQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Result<StreamResponse, MediaError> {
    let token = query
        .ok()
        .and_then(|Query(query)| query.token)
        .filter(|token| !token.is_empty())
        .or_else(|| bearer_token(&headers));

    // A non-UTF-8 Range header is still reported after the token check
    let range = headers
        .get(header::RANGE)
        .map(|value| value.to_str().unwrap_or_default());

    state
        .stream_handler
        .serve(token.as_deref(), range)
        .await
}

pub async fn healthz() -> &'static str {
    "ok"
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
