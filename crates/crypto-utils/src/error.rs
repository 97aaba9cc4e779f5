use thiserror::Error;

/// Cryptographic utility errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("invalid base58: {0}")]
    InvalidBase58(String),
}
