//! Bitcoin-alphabet Base58.
//!
//! The input is treated as a big-endian unsigned integer and written in base
//! 58, most significant digit first. Every leading zero byte becomes a leading
//! `'1'`, so the byte length survives the integer conversion. There is no
//! checksum.

use crate::error::CryptoError;

/// The 58-symbol alphabet (no `0`, `O`, `I`, `l`).
pub const ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Encode arbitrary bytes as Base58.
///
/// Empty input encodes to the empty string, and `n` zero bytes encode to `n`
/// `'1'` characters.
pub fn encode(bytes: &[u8]) -> String {
    bs58::encode(bytes)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_string()
}

/// Decode a Base58 string back into bytes, restoring leading zero bytes.
pub fn decode(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    bs58::decode(encoded)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| CryptoError::InvalidBase58(e.to_string()))
}

/// Returns `true` if every character of `s` belongs to [`ALPHABET`].
pub fn is_base58(s: &str) -> bool {
    s.chars().all(|c| ALPHABET.contains(c))
}
