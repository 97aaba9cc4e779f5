//! The fixed-amount transfer flow.
//!
//! One attempt walks `idle -> balance_checked -> nonce_checked -> signed ->
//! submitted` and ends `accepted`, `rejected` or `errored`. Nothing is
//! retried. Two concurrent transfers from the same account read the same
//! nonce; callers that need that must serialize them per address.

use std::time::Duration;

use chain_oct::{build_transfer, validate_address, SignedTransaction};
use rand::Rng;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{WalletConfig, DEFAULT_SETTLE_DELAY};
use crate::error::WalletError;
use crate::rpc::RpcChannel;
use crate::types::{AccountStatus, TransferReceipt, TransferState, TRANSFER_AMOUNT_RAW};
use crate::wallet::WalletAccount;

/// Upper bound (exclusive) of the random fraction added to the timestamp.
pub const TIMESTAMP_JITTER: f64 = 0.01;

pub struct TransferProtocol<C> {
    channel: C,
    settle_delay: Duration,
}

impl<C: RpcChannel> TransferProtocol<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_config(channel: C, config: &WalletConfig) -> Self {
        Self::new(channel).with_settle_delay(config.settle_delay)
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Balance and nonce of `address`.
    pub async fn status(&self, address: &str) -> Result<AccountStatus, WalletError> {
        self.channel.account_status(address).await
    }

    /// Send the fixed transfer amount from `account` to `to`.
    ///
    /// On acceptance, waits for the settle delay before returning so the
    /// node reflects the new nonce. Any other 2xx answer is returned as
    /// [`WalletError::Rejected`] with the payload untouched.
    pub async fn send(
        &self,
        account: &WalletAccount,
        to: &str,
    ) -> Result<TransferReceipt, WalletError> {
        let to = to.trim();
        if to.is_empty() {
            return Err(WalletError::InvalidAddress("destination is empty".into()));
        }
        validate_address(to)?;

        let result = self.run(account, to).await;
        if let Err(e) = &result {
            if final_state(e) == Some(TransferState::Errored) {
                warn!(state = %TransferState::Errored, error = %e, "transfer failed");
            }
        }
        result
    }

    async fn run(
        &self,
        account: &WalletAccount,
        to: &str,
    ) -> Result<TransferReceipt, WalletError> {
        let from = account.address();
        debug!(state = %TransferState::Idle, %from, %to, "starting transfer");

        let snapshot = self.channel.account_status(from).await?;
        debug!(
            state = %TransferState::BalanceChecked,
            balance = snapshot.balance,
            nonce = snapshot.nonce,
            "account status read"
        );
        if snapshot.balance < TRANSFER_AMOUNT_RAW {
            return Err(WalletError::InsufficientFunds {
                balance: snapshot.balance,
                required: TRANSFER_AMOUNT_RAW,
            });
        }

        // Second, fresher read right before building.
        let latest = self.channel.account_status(from).await?;
        debug!(state = %TransferState::NonceChecked, nonce = latest.nonce, "nonce refreshed");

        let nonce = latest
            .nonce
            .checked_add(1)
            .ok_or_else(|| WalletError::TransactionFailed("nonce overflow".into()))?;
        let tx = build_transfer(from, to, TRANSFER_AMOUNT_RAW, nonce, jittered_timestamp())?;
        let signed = account.sign(&tx)?;
        debug!(
            state = %TransferState::Signed,
            nonce,
            timestamp = tx.timestamp,
            "transaction signed"
        );

        let response = self.channel.submit_transaction(&signed).await?;
        debug!(state = %TransferState::Submitted, "node answered");

        let receipt = classify(response, signed)?;
        info!(
            state = %TransferState::Accepted,
            tx_hash = %receipt.tx_hash,
            nonce,
            "transfer accepted"
        );

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
        Ok(receipt)
    }
}

/// Whole Unix seconds plus a random fraction in `[0, 0.01)`.
pub fn jittered_timestamp() -> f64 {
    let secs = chrono::Utc::now().timestamp() as f64;
    secs + rand::thread_rng().gen_range(0.0..TIMESTAMP_JITTER)
}

/// Terminal state a failed attempt ends in.
///
/// Only RPC failures end in `errored` and only node refusals in `rejected`.
/// Bad input and insufficient funds abort before anything is submitted and
/// have no terminal state.
pub fn final_state(err: &WalletError) -> Option<TransferState> {
    match err {
        WalletError::Network { .. } => Some(TransferState::Errored),
        WalletError::Rejected(_) => Some(TransferState::Rejected),
        _ => None,
    }
}

fn classify(
    response: Value,
    transaction: SignedTransaction,
) -> Result<TransferReceipt, WalletError> {
    if response.get("status").and_then(Value::as_str) != Some("accepted") {
        warn!(state = %TransferState::Rejected, response = %response, "transfer rejected");
        return Err(WalletError::Rejected(response));
    }

    let tx_hash = match response.get("tx_hash").and_then(Value::as_str) {
        Some(hash) => hash.to_owned(),
        None => {
            warn!("accepted response carries no tx_hash");
            String::new()
        }
    };
    Ok(TransferReceipt {
        tx_hash,
        transaction,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use chain_oct::{verify_signed_transaction, verify_with_public_key};
    use serde_json::json;

    use super::*;

    const DEST: &str = "octJ8Uo9u28953Fpeeg7ki5H3cYhQ9V2w9Zotxr1nhFE2FJ";

    /// Scripted channel recording every call.
    #[derive(Default)]
    struct ScriptedChannel {
        statuses: Mutex<VecDeque<AccountStatus>>,
        response: Mutex<Option<Value>>,
        status_calls: Mutex<usize>,
        status_limit: Option<usize>,
        submitted: Mutex<Vec<SignedTransaction>>,
    }

    impl ScriptedChannel {
        fn new(statuses: &[(u64, u64)], response: Value) -> Self {
            Self {
                statuses: Mutex::new(
                    statuses
                        .iter()
                        .map(|&(balance, nonce)| AccountStatus { balance, nonce })
                        .collect(),
                ),
                response: Mutex::new(Some(response)),
                ..Default::default()
            }
        }

        /// Fail every status read after the first `reads`.
        fn failing_after(mut self, reads: usize) -> Self {
            self.status_limit = Some(reads);
            self
        }

        fn submitted(&self) -> Vec<SignedTransaction> {
            self.submitted.lock().unwrap().clone()
        }

        fn status_calls(&self) -> usize {
            *self.status_calls.lock().unwrap()
        }
    }

    impl RpcChannel for ScriptedChannel {
        async fn account_status(&self, _address: &str) -> Result<AccountStatus, WalletError> {
            let calls = {
                let mut calls = self.status_calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if self.status_limit.is_some_and(|limit| calls > limit) {
                return Err(WalletError::Network {
                    status: Some(503),
                    detail: "node unavailable".into(),
                });
            }
            let mut statuses = self.statuses.lock().unwrap();
            // Repeat the last snapshot once the script runs out.
            let status = if statuses.len() > 1 {
                statuses.pop_front()
            } else {
                statuses.front().copied()
            };
            status.ok_or_else(|| WalletError::Network {
                status: None,
                detail: "no scripted status".into(),
            })
        }

        async fn submit_transaction(&self, tx: &SignedTransaction) -> Result<Value, WalletError> {
            self.submitted.lock().unwrap().push(tx.clone());
            self.response
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| WalletError::Internal("no scripted response".into()))
        }
    }

    fn account() -> WalletAccount {
        WalletAccount::from_signing_key(&[0x42; 32])
    }

    fn protocol(channel: ScriptedChannel) -> TransferProtocol<ScriptedChannel> {
        TransferProtocol::new(channel).with_settle_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_accepted_transfer() {
        let protocol = protocol(ScriptedChannel::new(
            &[(500_000, 7)],
            json!({"status": "accepted", "tx_hash": "deadbeef"}),
        ));
        let account = account();

        let receipt = protocol.send(&account, DEST).await.unwrap();
        assert_eq!(receipt.tx_hash, "deadbeef");

        let tx = &receipt.transaction;
        assert_eq!(tx.core.nonce, 8);
        assert_eq!(tx.core.amount, 10_000);
        assert_eq!(tx.core.ou, "1");
        assert_eq!(tx.core.from, account.address());
        assert_eq!(tx.core.to, DEST);

        let wire = serde_json::to_value(tx).unwrap();
        assert_eq!(wire["amount"], "10000");

        assert!(verify_signed_transaction(tx).is_ok());
        let other = WalletAccount::from_signing_key(&[0x43; 32]);
        assert!(verify_with_public_key(&tx.core, &tx.signature, &other.public_key()).is_err());

        assert_eq!(protocol.channel().status_calls(), 2);
        assert_eq!(protocol.channel().submitted(), vec![tx.clone()]);
    }

    #[tokio::test]
    async fn test_second_read_sets_nonce() {
        let protocol = protocol(ScriptedChannel::new(
            &[(500_000, 7), (500_000, 9)],
            json!({"status": "accepted", "tx_hash": "h"}),
        ));
        let receipt = protocol.send(&account(), DEST).await.unwrap();
        assert_eq!(receipt.transaction.core.nonce, 10);
    }

    #[tokio::test]
    async fn test_timestamp_jitter_is_small() {
        let before = chrono::Utc::now().timestamp() as f64;
        let protocol = protocol(ScriptedChannel::new(
            &[(500_000, 0)],
            json!({"status": "accepted", "tx_hash": "h"}),
        ));
        let receipt = protocol.send(&account(), DEST).await.unwrap();
        let after = chrono::Utc::now().timestamp() as f64;

        let ts = receipt.transaction.core.timestamp;
        assert!(ts >= before);
        assert!(ts < after + TIMESTAMP_JITTER);
        assert!(ts - ts.floor() < TIMESTAMP_JITTER);
    }

    #[tokio::test]
    async fn test_insufficient_funds_never_submits() {
        let protocol = protocol(ScriptedChannel::new(
            &[(5_000, 3)],
            json!({"status": "accepted", "tx_hash": "h"}),
        ));

        let err = protocol.send(&account(), DEST).await.unwrap_err();
        assert!(matches!(
            err,
            WalletError::InsufficientFunds {
                balance: 5_000,
                required: 10_000
            }
        ));
        assert!(protocol.channel().submitted().is_empty());
        assert_eq!(protocol.channel().status_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_nonce_refresh_never_submits() {
        let protocol = protocol(
            ScriptedChannel::new(&[(500_000, 7)], json!({"status": "accepted", "tx_hash": "h"}))
                .failing_after(1),
        );

        let err = protocol.send(&account(), DEST).await.unwrap_err();
        match &err {
            WalletError::Network { status, detail } => {
                assert_eq!(*status, Some(503));
                assert_eq!(detail, "node unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(final_state(&err), Some(TransferState::Errored));
        assert_eq!(protocol.channel().status_calls(), 2);
        assert!(protocol.channel().submitted().is_empty());
    }

    #[tokio::test]
    async fn test_failed_balance_read_never_refreshes() {
        let protocol = protocol(ScriptedChannel::new(&[(500_000, 7)], json!({})).failing_after(0));

        let err = protocol.send(&account(), DEST).await.unwrap_err();
        assert!(matches!(err, WalletError::Network { .. }));
        assert_eq!(protocol.channel().status_calls(), 1);
        assert!(protocol.channel().submitted().is_empty());
    }

    #[test]
    fn only_rpc_failures_end_errored() {
        let network = WalletError::Network {
            status: Some(502),
            detail: "upstream down".into(),
        };
        assert_eq!(final_state(&network), Some(TransferState::Errored));
        assert_eq!(
            final_state(&WalletError::Rejected(json!({"status": "rejected"}))),
            Some(TransferState::Rejected)
        );
        let insufficient = WalletError::InsufficientFunds {
            balance: 5_000,
            required: 10_000,
        };
        assert_eq!(final_state(&insufficient), None);
        assert_eq!(final_state(&WalletError::InvalidAddress("empty".into())), None);
    }

    #[tokio::test]
    async fn test_exact_amount_is_enough() {
        let protocol = protocol(ScriptedChannel::new(
            &[(10_000, 0)],
            json!({"status": "accepted", "tx_hash": "h"}),
        ));
        assert!(protocol.send(&account(), DEST).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejection_surfaces_payload_once() {
        let payload = json!({"status": "rejected", "reason": "bad nonce"});
        let protocol = protocol(ScriptedChannel::new(&[(500_000, 7)], payload.clone()));

        let err = protocol.send(&account(), DEST).await.unwrap_err();
        match err {
            WalletError::Rejected(body) => assert_eq!(body, payload),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(protocol.channel().submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_response_is_rejection() {
        let protocol = protocol(ScriptedChannel::new(&[(500_000, 7)], json!({})));
        assert!(matches!(
            protocol.send(&account(), DEST).await,
            Err(WalletError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_bad_destination_makes_no_calls() {
        for to in ["", "   ", "btc1qxyz", "oct0OIl"] {
            let protocol = protocol(ScriptedChannel::new(&[(500_000, 7)], json!({})));
            let err = protocol.send(&account(), to).await.unwrap_err();
            assert!(matches!(err, WalletError::InvalidAddress(_)), "{to:?}: {err:?}");
            assert_eq!(protocol.channel().status_calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_destination_is_trimmed() {
        let protocol = protocol(ScriptedChannel::new(
            &[(500_000, 7)],
            json!({"status": "accepted", "tx_hash": "h"}),
        ));
        let receipt = protocol.send(&account(), &format!("  {DEST}\n")).await.unwrap();
        assert_eq!(receipt.transaction.core.to, DEST);
    }

    #[tokio::test]
    async fn test_status_passthrough() {
        let protocol = protocol(ScriptedChannel::new(&[(123, 4)], json!({})));
        let status = protocol.status(account().address()).await.unwrap();
        assert_eq!(status, AccountStatus { balance: 123, nonce: 4 });
    }

    #[test]
    fn accepted_without_hash_keeps_empty_hash() {
        let core =
            build_transfer(account().address(), DEST, 10_000, 1, 1_700_000_000.5).unwrap();
        let signed = account().sign(&core).unwrap();
        let receipt = classify(json!({"status": "accepted"}), signed).unwrap();
        assert!(receipt.tx_hash.is_empty());
    }
}
