use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CryptoError;

/// Generates a fixed-size array of cryptographically secure random bytes.
///
/// Fails if the operating system entropy source is unavailable. Callers must
/// treat that as fatal and must not retry with a weaker source.
pub fn random_bytes_fixed<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut buf = [0u8; N];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;
    Ok(buf)
}
