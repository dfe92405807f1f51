use crate::token::error::TokenError;
use serde::{Deserialize, Serialize};

/// Claims carried inside a media credential.
///
/// Field order is fixed by the struct layout, so the JSON form is stable and
/// the tag can be computed over it directly.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Logical path inside the content store
    pub path: String,
    /// Expiration time in Unix seconds
    pub exp: u64,
    /// Identity the credential was issued to
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl TokenPayload {
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn decode(data: &[u8]) -> Result<Self, TokenError> {
        serde_json::from_slice(data).map_err(|_| TokenError::InvalidPayload)
    }

    /// A credential stays valid up to and including its `exp` second.
    pub fn is_expired(&self, now_unix: u64) -> bool {
        now_unix > self.exp
    }
}
