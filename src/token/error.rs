use thiserror::Error;

/// Reasons a credential is refused. All of them surface as 401 to the client.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TokenError {
    #[error("Token is not in payload.tag form")]
    Malformed,

    #[error("Token is not valid base64url")]
    Encoding,

    #[error("Signature mismatch")]
    BadSignature,

    #[error("Invalid payload")]
    InvalidPayload,

    #[error("Token has expired")]
    Expired,
}

impl From<TokenError> for crate::MediaError {
    fn from(_: TokenError) -> Self {
        crate::MediaError::Unauthorized
    }
}
