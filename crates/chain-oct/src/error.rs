use thiserror::Error;

/// Octra chain operation errors.
#[derive(Debug, Error)]
pub enum OctError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}
