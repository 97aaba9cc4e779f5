use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chain_oct::{address_from_public_key, keypair_from_seed, signing_key_from_slice};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::error::WalletError;
use crate::mnemonic::mnemonic_to_seed;

type HmacSha512 = Hmac<Sha512>;

/// HMAC key binding the signing key to this wallet.
///
/// Signing key = first 32 bytes of HMAC-SHA512(key = label, data = seed).
pub const SEED_DOMAIN_LABEL: &[u8] = b"Octra seed";

/// Stretch a BIP-39 seed into the 32-byte signing key.
pub fn signing_key_from_seed(seed: &[u8]) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let mut mac = HmacSha512::new_from_slice(SEED_DOMAIN_LABEL)
        .map_err(|e| WalletError::DerivationFailed(e.to_string()))?;
    mac.update(seed);
    let mut result = mac.finalize().into_bytes();

    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&result[..32]);
    result.as_mut_slice().zeroize();

    Ok(key)
}

/// Mnemonic -> seed (empty passphrase) -> signing key.
pub fn derive_signing_key(mnemonic: &str) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let seed = mnemonic_to_seed(mnemonic, "")?;
    signing_key_from_seed(&seed)
}

/// Derive the full key material for a mnemonic: signing key, Ed25519
/// public key and account address.
pub fn derive_octra_key(mnemonic: &str) -> Result<DerivedOctraKey, WalletError> {
    let signing_key = derive_signing_key(mnemonic)?;
    Ok(DerivedOctraKey::from_signing_key(&signing_key))
}

/// Decode a stored base64 private key into the 32-byte signing key.
pub fn signing_key_from_b64(private_key_b64: &str) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let decoded = Zeroizing::new(
        BASE64
            .decode(private_key_b64.trim())
            .map_err(|e| WalletError::InvalidPrivateKey(format!("not base64: {e}")))?,
    );
    Ok(signing_key_from_slice(&decoded)?)
}

/// Derived Octra key material
pub struct DerivedOctraKey {
    pub private_key: [u8; 32],
    pub public_key: [u8; 32],
    pub address: String,
}

impl DerivedOctraKey {
    pub fn from_signing_key(signing_key: &[u8; 32]) -> Self {
        let public_key = keypair_from_seed(signing_key).public_key();
        Self {
            private_key: *signing_key,
            public_key,
            address: address_from_public_key(&public_key),
        }
    }
}

impl Drop for DerivedOctraKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // BIP-39 test vector: "abandon" x11 + "about"
    const TEST_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_known_signing_key() {
        let key = derive_signing_key(TEST_MNEMONIC).unwrap();
        assert_eq!(
            hex::encode(*key),
            "6d6951ff80c1bfe7eea39065bdcd42387bd25d4277d21bfa7b6f9e23c8e09c10"
        );
    }

    #[test]
    fn test_known_key_material() {
        let key = derive_octra_key(TEST_MNEMONIC).unwrap();
        assert_eq!(
            hex::encode(key.public_key),
            "f7801589b04dfccf79c16bb59684d8ed7574fcc77413fa7b23a0b57e38765a97"
        );
        assert_eq!(key.address, "octCRus1yKzZbQoABuUhWQzcps8KhdqqQWxPzGciLgY698h");
    }

    #[test]
    fn test_derivation_deterministic() {
        let a = derive_octra_key(TEST_MNEMONIC).unwrap();
        let b = derive_octra_key(TEST_MNEMONIC).unwrap();
        assert_eq!(a.private_key, b.private_key);
        assert_eq!(a.address, b.address);
    }

    #[test]
    fn test_signing_key_is_not_raw_seed_prefix() {
        let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        let key = signing_key_from_seed(&seed).unwrap();
        assert_ne!(&key[..], &seed[..32]);
    }

    #[test]
    fn test_domain_label_changes_key() {
        let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        let key = signing_key_from_seed(&seed).unwrap();

        // Same construction with the SLIP-0010 label must differ.
        let mut mac = HmacSha512::new_from_slice(b"ed25519 seed").unwrap();
        mac.update(&seed);
        let other = mac.finalize().into_bytes();
        assert_ne!(&key[..], &other[..32]);
    }

    #[test]
    fn test_signing_key_from_b64() {
        let key = signing_key_from_b64("bWlR/4DBv+fuo5Blvc1COHvSXUJ30hv6e2+eI8jgnBA=").unwrap();
        assert_eq!(*key, *derive_signing_key(TEST_MNEMONIC).unwrap());
    }

    #[test]
    fn test_signing_key_from_b64_takes_prefix_of_long_key() {
        let mut long = vec![0x24u8; 32];
        long.extend_from_slice(&[0xff; 32]);
        let key = signing_key_from_b64(&format!(" {}\n", BASE64.encode(&long))).unwrap();
        assert_eq!(*key, [0x24u8; 32]);
    }

    #[test]
    fn test_signing_key_from_b64_rejects_bad_input() {
        assert!(matches!(
            signing_key_from_b64("not base64!"),
            Err(WalletError::InvalidPrivateKey(_))
        ));
        let err = signing_key_from_b64(&BASE64.encode([1u8; 16])).unwrap_err();
        assert!(matches!(err, WalletError::InvalidPrivateKey(_)));
        assert!(err.to_string().contains("at least 32 bytes, got 16"));
    }

    #[test]
    fn test_invalid_mnemonic_fails() {
        let result = derive_signing_key("abandon abandon");
        assert!(matches!(result, Err(WalletError::InvalidMnemonic(_))));
    }
}
