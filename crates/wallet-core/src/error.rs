use thiserror::Error;

#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum WalletError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid wallet record: {0}")]
    InvalidWalletRecord(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Transaction build failed: {0}")]
    TransactionFailed(String),

    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: u64, required: u64 },

    #[error(
        "Network error{}: {detail}",
        status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
    )]
    Network { status: Option<u16>, detail: String },

    /// The node answered but did not accept the transaction. Carries the
    /// response body verbatim.
    #[error("Transaction rejected: {0}")]
    Rejected(serde_json::Value),

    #[error("Randomness source unavailable: {0}")]
    RandomnessFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Whether the same call may succeed later without changing its inputs
    /// (after funding the account, or once the network recovers). Nothing in
    /// this crate retries on its own.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WalletError::InsufficientFunds { .. } | WalletError::Network { .. }
        )
    }
}

impl From<crypto_utils::error::CryptoError> for WalletError {
    fn from(e: crypto_utils::error::CryptoError) -> Self {
        use crypto_utils::error::CryptoError;
        match e {
            CryptoError::RandomnessUnavailable(msg) => WalletError::RandomnessFailure(msg),
            other => WalletError::Internal(other.to_string()),
        }
    }
}

impl From<chain_oct::error::OctError> for WalletError {
    fn from(e: chain_oct::error::OctError) -> Self {
        use chain_oct::error::OctError;
        match e {
            OctError::InvalidAddress(msg) => WalletError::InvalidAddress(msg),
            OctError::InvalidPrivateKey(msg) => WalletError::InvalidPrivateKey(msg),
            OctError::InvalidPublicKey(msg) | OctError::InvalidSignature(msg) => {
                WalletError::SigningFailed(msg)
            }
            other => WalletError::TransactionFailed(format!("OCT: {other}")),
        }
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(e: reqwest::Error) -> Self {
        WalletError::Network {
            status: e.status().map(|s| s.as_u16()),
            detail: e.to_string(),
        }
    }
}
