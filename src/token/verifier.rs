use crate::clock::SharedClock;
use crate::token::{SEPARATOR, TokenError, TokenPayload, TokenSigner};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Checks credentials minted by [`crate::token::TokenIssuer`]
#[derive(Clone)]
pub struct TokenVerifier {
    signer: TokenSigner,
    clock: SharedClock,
}

impl TokenVerifier {
    pub fn new(signer: TokenSigner, clock: SharedClock) -> Self {
        Self { signer, clock }
    }

    /// Decode, authenticate and expiry-check a credential.
    ///
    /// The tag is checked before the payload is parsed, so nothing in an
    /// unauthenticated payload is ever interpreted.
    pub fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let (payload_b64, tag_b64) = token.split_once(SEPARATOR).ok_or(TokenError::Malformed)?;
        if payload_b64.is_empty() || tag_b64.is_empty() {
            return Err(TokenError::Malformed);
        }

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Encoding)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| TokenError::Encoding)?;

        if !self.signer.verify(&payload_bytes, &tag) {
            return Err(TokenError::BadSignature);
        }

        let payload = TokenPayload::decode(&payload_bytes)?;
        if payload.is_expired(self.clock.now_unix()) {
            return Err(TokenError::Expired);
        }

        Ok(payload)
    }
}
