use std::fmt;

use chain_oct::SignedTransaction;
use serde::{Deserialize, Serialize};

/// Smallest units per OCT.
pub const MU: u64 = 1_000_000;

/// The fixed transfer amount, 0.01 OCT, in smallest units.
pub const TRANSFER_AMOUNT_RAW: u64 = MU / 100;

/// Balance and nonce of an account as reported by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatus {
    /// Balance in smallest units.
    pub balance: u64,
    /// Nonce of the last transaction the node has seen from this account.
    pub nonce: u64,
}

/// Stages of a single transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Idle,
    BalanceChecked,
    NonceChecked,
    Signed,
    Submitted,
    Accepted,
    Rejected,
    Errored,
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferState::Idle => "idle",
            TransferState::BalanceChecked => "balance_checked",
            TransferState::NonceChecked => "nonce_checked",
            TransferState::Signed => "signed",
            TransferState::Submitted => "submitted",
            TransferState::Accepted => "accepted",
            TransferState::Rejected => "rejected",
            TransferState::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// Result of an accepted transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub tx_hash: String,
    pub transaction: SignedTransaction,
}

/// Format a smallest-unit amount as an OCT decimal string (`10000` -> `"0.01"`).
pub fn format_oct(raw: u64) -> String {
    let whole = raw / MU;
    let frac = raw % MU;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:06}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
