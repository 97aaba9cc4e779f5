//! Runtime configuration and wallet file discovery.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::WalletError;
use crate::wallet::WalletRecord;

/// Public node used when the wallet record names none.
pub const DEFAULT_RPC_URL: &str = "https://octra.network";

/// Per-request HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause after an accepted submission so the node's nonce catches up.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// File name looked up in `$HOME/.octra/` and the working directory.
pub const WALLET_FILE_NAME: &str = "wallet.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    pub rpc_url: String,
    pub request_timeout: Duration,
    pub settle_delay: Duration,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl WalletConfig {
    /// Defaults, with the record's `rpc` taking precedence when set.
    pub fn for_record(record: &WalletRecord) -> Self {
        let mut config = Self::default();
        if let Some(rpc) = record.rpc.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            config.rpc_url = rpc.to_owned();
        }
        config
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}

/// Places a wallet file is looked for, in order.
pub fn wallet_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2);
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".octra").join(WALLET_FILE_NAME));
    }
    candidates.push(PathBuf::from(".").join(WALLET_FILE_NAME));
    candidates
}

/// Resolve the wallet file: an explicit path wins, otherwise the first
/// existing candidate.
pub fn locate_wallet_file(explicit: Option<&Path>) -> Result<PathBuf, WalletError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    wallet_file_candidates()
        .into_iter()
        .find(|p| p.is_file())
        .ok_or_else(|| WalletError::InvalidWalletRecord(format!("{WALLET_FILE_NAME} not found")))
}

/// Parse a wallet record from JSON text.
pub fn parse_wallet_record(json: &str) -> Result<WalletRecord, WalletError> {
    serde_json::from_str(json)
        .map_err(|e| WalletError::InvalidWalletRecord(format!("malformed wallet JSON: {e}")))
}

/// Read and parse the wallet record at `path`.
pub fn load_wallet_record(path: &Path) -> Result<WalletRecord, WalletError> {
    debug!(path = %path.display(), "loading wallet record");
    let text = std::fs::read_to_string(path).map_err(|e| {
        WalletError::InvalidWalletRecord(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_wallet_record(&text)
}
