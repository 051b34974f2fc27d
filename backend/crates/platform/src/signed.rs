//! Signed Cookie Codec
//!
//! Encodes a small JSON claims payload into an opaque cookie value of the
//! form `base64url(json).base64url(hmac-sha256)`.
//!
//! The codec is a transport convenience only: decoded claims are lookup
//! keys, never authorization facts. Callers must re-validate against the
//! persistent store.
//!
//! ## Failure Model
//! `decode` fails closed: a missing segment, an invalid signature, or an
//! undeserializable payload all yield `None`. It never panics and never
//! surfaces an error to the caller.

use hmac::{Hmac, Mac};
use serde::{Serialize, de::DeserializeOwned};
use sha2::Sha256;

use crate::crypto::{b64url_decode, b64url_encode, constant_time_eq};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer/verifier for cookie claims
#[derive(Clone)]
pub struct SignedCookieCodec {
    secret: [u8; 32],
}

impl SignedCookieCodec {
    pub fn new(secret: [u8; 32]) -> Self {
        Self { secret }
    }

    /// Sign claims into an opaque token
    ///
    /// Serialization of a plain claims struct cannot fail; a failure here
    /// means a programming error, so it propagates as `serde_json::Error`.
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, serde_json::Error> {
        let payload = serde_json::to_vec(claims)?;
        let signature = self.sign(&payload);

        Ok(format!(
            "{}.{}",
            b64url_encode(&payload),
            b64url_encode(&signature)
        ))
    }

    /// Verify and decode a token into claims
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Option<T> {
        let (payload_b64, signature_b64) = token.split_once('.')?;

        let payload = b64url_decode(payload_b64).ok()?;
        let signature = b64url_decode(signature_b64).ok()?;

        let expected = self.sign(&payload);
        if !constant_time_eq(&signature, &expected) {
            return None;
        }

        serde_json::from_slice(&payload).ok()
    }

    fn sign(&self, payload: &[u8]) -> [u8; 32] {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(payload);
        mac.finalize().into_bytes().into()
    }
}
