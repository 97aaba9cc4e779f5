use bip39::{Language, Mnemonic};
use crypto_utils::random::random_bytes_fixed;
use crypto_utils::{ZeroizingBytes, ZeroizingString};
use zeroize::Zeroize;

use crate::error::WalletError;

/// Entropy size for a 12-word mnemonic (128 bits).
pub const ENTROPY_BYTES: usize = 16;

/// Generate a new 12-word BIP-39 mnemonic from OS randomness.
///
/// Fails with [`WalletError::RandomnessFailure`] if the entropy source is
/// unavailable; there is no fallback.
pub fn generate_mnemonic() -> Result<ZeroizingString, WalletError> {
    let mut entropy = random_bytes_fixed::<ENTROPY_BYTES>()?;
    let result = mnemonic_from_entropy(&entropy);
    entropy.zeroize();
    result
}

/// Encode 16 bytes of entropy as a 12-word English mnemonic.
pub fn mnemonic_from_entropy(
    entropy: &[u8; ENTROPY_BYTES],
) -> Result<ZeroizingString, WalletError> {
    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(ZeroizingString::new(mnemonic.to_string()))
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> Result<bool, WalletError> {
    match Mnemonic::parse_in_normalized(Language::English, phrase) {
        Ok(_) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Derive the 64-byte BIP-39 seed from a mnemonic and passphrase.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<ZeroizingBytes, WalletError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;

    let mut seed = mnemonic.to_seed(passphrase);
    let out = ZeroizingBytes::from(seed.as_slice());
    seed.zeroize();
    Ok(out)
}
