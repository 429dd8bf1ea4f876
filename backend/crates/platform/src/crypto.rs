//! Cryptographic Utilities
//!
//! Keyed signing for session tokens: `payload.signature`, both parts
//! URL-safe Base64 without padding so they fit in a cookie value.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of signing keys in bytes
pub const KEY_LEN: usize = 32;

/// Generate a fresh signing key
pub fn random_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    key
}

/// Encode bytes as cookie-safe base64
pub fn to_base64(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode cookie-safe base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(s)
}

/// Sign a payload, producing `base64(payload).base64(mac)`
///
/// The MAC covers the encoded payload, so verification never decodes
/// untrusted input first.
pub fn sign(key: &[u8; KEY_LEN], payload: &[u8]) -> Result<String, InvalidLength> {
    let encoded = to_base64(payload);

    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(encoded.as_bytes());
    let tag = mac.finalize().into_bytes();

    Ok(format!("{}.{}", encoded, to_base64(&tag)))
}

/// Verify a token produced by [`sign`] and return the payload
///
/// Returns `None` for anything malformed or forged.
pub fn verify_signed(key: &[u8; KEY_LEN], token: &str) -> Option<Vec<u8>> {
    let (encoded, tag_b64) = token.split_once('.')?;
    let tag = from_base64(tag_b64).ok()?;

    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(encoded.as_bytes());
    // constant-time
    mac.verify_slice(&tag).ok()?;

    from_base64(encoded).ok()
}
