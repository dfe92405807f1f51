//! Signed, time-boxed media credentials.
//!
//! A credential is `base64url(payload) "." base64url(tag)` where the tag is
//! HMAC-SHA256 over the exact payload bytes.

pub mod error;
pub mod identity;
pub mod issuer;
pub mod payload;
pub mod signer;
pub mod verifier;

pub use error::TokenError;
pub use identity::CallerIdentity;
pub use issuer::{IssuedToken, TokenIssuer};
pub use payload::TokenPayload;
pub use signer::{MIN_SECRET_LEN, TAG_SIZE, TokenSigner};
pub use verifier::TokenVerifier;

/// Joins the encoded payload and the encoded tag
pub const SEPARATOR: char = '.';
