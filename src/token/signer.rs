use anyhow::{Result, anyhow, bail};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Length of an HMAC-SHA256 tag
pub const TAG_SIZE: usize = 32;

/// Shortest secret accepted for signing
pub const MIN_SECRET_LEN: usize = 32;

/// Keyed HMAC-SHA256 shared by the issuer and the verifier
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: &[u8]) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            bail!(
                "Signing secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                secret.len()
            );
        }

        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|error| anyhow!("Failed to initialise HMAC: {error}"))?;

        Ok(Self { mac })
    }

    /// Compute the tag over the exact bytes given
    pub fn sign(&self, msg: &[u8]) -> [u8; TAG_SIZE] {
        let mut mac = self.mac.clone();
        mac.update(msg);

        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        tag
    }

    /// Recompute the tag and compare in constant time
    pub fn verify(&self, msg: &[u8], tag: &[u8]) -> bool {
        if tag.len() != TAG_SIZE {
            return false;
        }

        let expected = self.sign(msg);
        expected.ct_eq(tag).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_secret() {
        assert!(TokenSigner::new(b"").is_err());
        assert!(TokenSigner::new(&[7u8; MIN_SECRET_LEN - 1]).is_err());
        assert!(TokenSigner::new(&[7u8; MIN_SECRET_LEN]).is_ok());
    }

    #[test]
    fn test_sign_is_deterministic() {
        let signer = TokenSigner::new(&[1u8; 32]).unwrap();
        assert_eq!(signer.sign(b"hello"), signer.sign(b"hello"));
        assert_ne!(signer.sign(b"hello"), signer.sign(b"hellp"));
    }

    #[test]
    fn test_matches_plain_hmac() {
        let signer = TokenSigner::new(b"Jefe-is-not-long-enough-so-padded").unwrap();
        let mut mac = HmacSha256::new_from_slice(b"Jefe-is-not-long-enough-so-padded").unwrap();
        mac.update(b"what do ya want for nothing?");
        let expected = mac.finalize().into_bytes();
        assert_eq!(
            signer.sign(b"what do ya want for nothing?").as_slice(),
            expected.as_slice()
        );
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let signer = TokenSigner::new(&[9u8; 32]).unwrap();
        let tag = signer.sign(b"payload");
        assert!(signer.verify(b"payload", &tag));

        for i in 0..TAG_SIZE {
            let mut bad = tag;
            bad[i] ^= 0x01;
            assert!(!signer.verify(b"payload", &bad), "flipped byte {i}");
        }

        assert!(!signer.verify(b"payload", &tag[..TAG_SIZE - 1]));
        assert!(!signer.verify(b"payload", &[]));
        assert!(!signer.verify(b"payloaD", &tag));
    }

    #[test]
    fn test_different_secrets_disagree() {
        let a = TokenSigner::new(&[1u8; 32]).unwrap();
        let b = TokenSigner::new(&[2u8; 32]).unwrap();
        assert!(!b.verify(b"payload", &a.sign(b"payload")));
    }
}
