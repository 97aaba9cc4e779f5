//! Seeded Ed25519 key pairs.
//!
//! The 32-byte signing key is the Ed25519 secret seed. The public key and the
//! 64-byte expanded secret (`seed || public_key`) are computed from it on
//! demand, so a key pair can always be rebuilt from the signing key alone.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::error::OctError;

/// An Ed25519 key pair regenerated from a 32-byte signing key.
///
/// The inner `SigningKey` zeroizes itself on drop.
pub struct OctKeyPair {
    signing_key: SigningKey,
}

impl OctKeyPair {
    /// The 32-byte Ed25519 public key.
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The 64-byte secret key in `seed || public_key` layout.
    pub fn secret_key(&self) -> Zeroizing<[u8; 64]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Produce a detached signature over `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        let signature: Signature = self.signing_key.sign(message);
        signature.to_bytes()
    }
}

/// Build the key pair for a 32-byte signing key. Total over all inputs.
pub fn keypair_from_seed(signing_key: &[u8; 32]) -> OctKeyPair {
    OctKeyPair {
        signing_key: SigningKey::from_bytes(signing_key),
    }
}

/// Extract the 32-byte signing key from stored key material.
///
/// Exports may carry the 64-byte `seed || public_key` form, so only the
/// first 32 bytes are used; shorter input is rejected.
pub fn signing_key_from_slice(bytes: &[u8]) -> Result<Zeroizing<[u8; 32]>, OctError> {
    bytes
        .get(..32)
        .and_then(|s| <[u8; 32]>::try_from(s).ok())
        .map(Zeroizing::new)
        .ok_or_else(|| {
            OctError::InvalidPrivateKey(format!(
                "private key must be at least 32 bytes, got {}",
                bytes.len()
            ))
        })
}
