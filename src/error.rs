use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Request-level failures of the media pipeline.
///
/// Display strings are what the client sees, so they stay generic. The cause
/// of a refused credential is logged where it is detected, never returned.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum MediaError {
    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    InvalidRequest(&'static str),

    #[error("File not found")]
    NotFound,

    #[error("Access denied")]
    Forbidden,

    #[error("Malformed range header")]
    RangeUnparsable,

    #[error("Requested range not satisfiable")]
    RangeUnsatisfiable { size: u64 },

    #[error("Internal server error")]
    Internal,
}

impl MediaError {
    pub fn status(&self) -> StatusCode {
        match self {
            MediaError::Unauthorized => StatusCode::UNAUTHORIZED,
            MediaError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            MediaError::NotFound => StatusCode::NOT_FOUND,
            MediaError::Forbidden => StatusCode::FORBIDDEN,
            MediaError::RangeUnparsable | MediaError::RangeUnsatisfiable { .. } => {
                StatusCode::RANGE_NOT_SATISFIABLE
            }
            MediaError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MediaError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        let mut res = (status, [(header::CONTENT_TYPE, "application/json")], body.to_string())
            .into_response();

        if let MediaError::RangeUnsatisfiable { size } = self
            && let Ok(value) = HeaderValue::from_str(&format!("bytes */{size}"))
        {
            res.headers_mut().insert(header::CONTENT_RANGE, value);
        }

        res
    }
}
