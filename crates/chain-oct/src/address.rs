//! Octra address derivation and validation.
//!
//! An address is the literal prefix `oct` followed by the Base58 encoding of
//! `SHA-256(public_key)`. The mapping is one-way and carries no checksum
//! beyond the hash itself.

use crypto_utils::base58;
use sha2::{Digest, Sha256};

use crate::error::OctError;

/// Literal prefix of every Octra account address.
pub const ADDRESS_PREFIX: &str = "oct";

/// Derive the account address for a 32-byte Ed25519 public key.
pub fn address_from_public_key(public_key: &[u8; 32]) -> String {
    let digest = Sha256::digest(public_key);
    format!("{ADDRESS_PREFIX}{}", base58::encode(&digest))
}

/// Validate an Octra address string.
///
/// The address must carry the `oct` prefix and the remainder must be Base58
/// that decodes to exactly 32 bytes (a SHA-256 digest).
pub fn validate_address(address: &str) -> Result<bool, OctError> {
    let body = address.strip_prefix(ADDRESS_PREFIX).ok_or_else(|| {
        OctError::InvalidAddress(format!("missing {ADDRESS_PREFIX} prefix"))
    })?;

    if body.is_empty() {
        return Err(OctError::InvalidAddress("empty address body".into()));
    }

    let digest = base58::decode(body)
        .map_err(|e| OctError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    if digest.len() != 32 {
        return Err(OctError::InvalidAddress(format!(
            "expected 32 bytes, got {}",
            digest.len()
        )));
    }

    Ok(true)
}
