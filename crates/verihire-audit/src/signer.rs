//! HMAC-SHA256 signatures over hex Merkle roots.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use verihire_contracts::error::{HireError, HireResult};

type HmacSha256 = Hmac<Sha256>;

fn mac_over(key: &[u8], message: &str) -> HireResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| HireError::Encoding {
        reason: format!("invalid signing key: {}", e),
    })?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Sign the UTF-8 bytes of `message`; returns 64 lowercase hex characters.
pub fn sign(key: &[u8], message: &str) -> HireResult<String> {
    mac_over(key, message).map(hex::encode)
}

/// Check `signature` (hex) against `message` in constant time.
///
/// Malformed hex or a wrong-length signature is simply a mismatch.
pub fn verify(key: &[u8], message: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let Ok(computed) = mac_over(key, message) else {
        return false;
    };
    if expected.len() != computed.len() {
        return false;
    }
    computed.ct_eq(expected.as_slice()).into()
}
