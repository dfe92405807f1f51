use crate::clock::SharedClock;
use crate::error::MediaError;
use crate::media::path::{LogicalPath, PathError};
use crate::token::{CallerIdentity, SEPARATOR, TokenPayload, TokenSigner};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Credential handed back to the caller
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    /// Unix seconds after which the token is refused
    pub expires_at: u64,
}

/// Mints credentials for one logical path at a time. Stateless.
#[derive(Clone)]
pub struct TokenIssuer {
    signer: TokenSigner,
    ttl_secs: u64,
    clock: SharedClock,
}

impl TokenIssuer {
    pub fn new(signer: TokenSigner, ttl: Duration, clock: SharedClock) -> Self {
        Self {
            signer,
            ttl_secs: ttl.as_secs(),
            clock,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Sign a credential for `logical_path` bound to `identity`.
    ///
    /// Only checks that a caller was authenticated, not that the caller is
    /// entitled to this particular path.
    pub fn issue_token(
        &self,
        identity: Option<&CallerIdentity>,
        logical_path: &str,
    ) -> Result<IssuedToken, MediaError> {
        let Some(identity) = identity else {
            warn!("Token requested without an authenticated caller");
            return Err(MediaError::Unauthorized);
        };

        let path = LogicalPath::parse(logical_path).map_err(|error| {
            warn!(%error, "Rejected token request path");
            match error {
                PathError::Empty => MediaError::InvalidRequest("path is required"),
                PathError::Malformed | PathError::Escape => {
                    MediaError::InvalidRequest("path is invalid")
                }
            }
        })?;

        let exp = self.clock.now_unix().saturating_add(self.ttl_secs);
        let payload = TokenPayload {
            path: path.as_str().to_string(),
            exp,
            subject: Some(identity.as_str().to_string()),
        };

        let payload_bytes = payload.encode().map_err(|error| {
            error!(?error, "Failed to serialize token payload");
            MediaError::Internal
        })?;
        let tag = self.signer.sign(&payload_bytes);

        let token = format!(
            "{}{SEPARATOR}{}",
            URL_SAFE_NO_PAD.encode(&payload_bytes),
            URL_SAFE_NO_PAD.encode(tag)
        );

        debug!(path = %path.as_str(), expires_at = exp, "Token issued");

        Ok(IssuedToken {
            token,
            expires_at: exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::Arc;

    fn issuer(clock: &ManualClock) -> TokenIssuer {
        TokenIssuer::new(
            TokenSigner::new(&[5u8; 32]).unwrap(),
            Duration::from_secs(120),
            Arc::new(clock.clone()),
        )
    }

    #[test]
    fn test_issue_token_shape() {
        let clock = ManualClock::new(1_700_000_000);
        let identity = CallerIdentity::new("student-1").unwrap();

        let issued = issuer(&clock)
            .issue_token(Some(&identity), "courseA/lesson1.mp4")
            .unwrap();
        assert_eq!(issued.expires_at, 1_700_000_120);

        let (payload_b64, tag_b64) = issued.token.split_once(SEPARATOR).unwrap();
        let payload =
            TokenPayload::decode(&URL_SAFE_NO_PAD.decode(payload_b64).unwrap()).unwrap();
        assert_eq!(payload.path, "courseA/lesson1.mp4");
        assert_eq!(payload.exp, 1_700_000_120);
        assert_eq!(payload.subject.as_deref(), Some("student-1"));
        assert_eq!(URL_SAFE_NO_PAD.decode(tag_b64).unwrap().len(), 32);
    }

    #[test]
    fn test_issue_token_normalizes_path() {
        let clock = ManualClock::new(0);
        let identity = CallerIdentity::new("u").unwrap();

        let issued = issuer(&clock)
            .issue_token(Some(&identity), "/courseA/./lesson1.mp4")
            .unwrap();
        let (payload_b64, _) = issued.token.split_once(SEPARATOR).unwrap();
        let payload =
            TokenPayload::decode(&URL_SAFE_NO_PAD.decode(payload_b64).unwrap()).unwrap();
        assert_eq!(payload.path, "courseA/lesson1.mp4");
    }

    #[test]
    fn test_issue_token_requires_identity() {
        let clock = ManualClock::new(0);
        assert_eq!(
            issuer(&clock).issue_token(None, "courseA/lesson1.mp4"),
            Err(MediaError::Unauthorized)
        );
    }

    #[test]
    fn test_issue_token_rejects_bad_paths() {
        let clock = ManualClock::new(0);
        let identity = CallerIdentity::new("u").unwrap();
        let issuer = issuer(&clock);

        assert_eq!(
            issuer.issue_token(Some(&identity), ""),
            Err(MediaError::InvalidRequest("path is required"))
        );
        assert_eq!(
            issuer.issue_token(Some(&identity), "../../etc/passwd"),
            Err(MediaError::InvalidRequest("path is invalid"))
        );
        assert_eq!(
            issuer.issue_token(Some(&identity), "a\0b"),
            Err(MediaError::InvalidRequest("path is invalid"))
        );
    }

    #[test]
    fn test_identity_checked_before_path() {
        let clock = ManualClock::new(0);
        assert_eq!(
            issuer(&clock).issue_token(None, ""),
            Err(MediaError::Unauthorized)
        );
    }
}
