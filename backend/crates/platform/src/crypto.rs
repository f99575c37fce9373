//! Cryptographic Utilities

use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use rand::{RngCore, rngs::OsRng};
use subtle::ConstantTimeEq;

/// URL-safe alphabet, padded on encode, padding optional on decode
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Encode bytes as padded base64url
pub fn to_base64url(bytes: &[u8]) -> String {
    BASE64URL.encode(bytes)
}

/// Decode base64url, with or without padding
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64URL.decode(s)
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Compare two base64url strings by their decoded bytes in constant time.
///
/// Either side failing to decode yields `false`.
pub fn constant_time_eq_b64url(a: &str, b: &str) -> bool {
    let (Ok(a), Ok(b)) = (from_base64url(a), from_base64url(b)) else {
        return false;
    };
    constant_time_eq(&a, &b)
}
