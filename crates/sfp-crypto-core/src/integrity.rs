//! HMAC-SHA256 tagging and constant-time verification.
//!
//! Comparison is delegated to `ring::hmac::verify`, which checks the tag in
//! constant time.

use ring::hmac;

/// HMAC-SHA256 tag length in bytes.
pub const TAG_LEN: usize = 32;

/// Compute HMAC-SHA256 over `data`.
#[must_use]
pub fn tag(mac_key: &[u8], data: &[u8]) -> [u8; TAG_LEN] {
    let key = hmac::Key::new(hmac::HMAC_SHA256, mac_key);
    let mut out = [0u8; TAG_LEN];
    out.copy_from_slice(hmac::sign(&key, data).as_ref());
    out
}

/// Recompute the tag over `data` and compare it with `expected` in
/// constant time.
///
/// Never panics and never errors: a malformed `expected` simply fails.
#[must_use]
pub fn verify(mac_key: &[u8], data: &[u8], expected: &[u8]) -> bool {
    let key = hmac::Key::new(hmac::HMAC_SHA256, mac_key);
    hmac::verify(&key, data, expected).is_ok()
}
