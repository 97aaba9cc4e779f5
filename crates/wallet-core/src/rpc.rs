//! Node RPC channel: account status lookup and transaction submission.

use std::future::Future;

use chain_oct::SignedTransaction;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::types::AccountStatus;

/// Transport used by the transfer protocol.
pub trait RpcChannel {
    /// Current balance and last nonce of `address`.
    fn account_status(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<AccountStatus, WalletError>> + Send;

    /// Submit a signed transaction and return the node's answer as-is.
    ///
    /// A 2xx response is returned whatever its content; deciding whether it
    /// means acceptance is up to the caller.
    fn submit_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> impl Future<Output = Result<Value, WalletError>> + Send;
}

/// JSON-over-HTTP client for an Octra node.
#[derive(Debug, Clone)]
pub struct HttpRpcClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRpcClient {
    pub fn new(config: &WalletConfig) -> Result<Self, WalletError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| WalletError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            base_url: config.rpc_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_json(&self, resp: reqwest::Response) -> Result<Value, WalletError> {
        let status = resp.status();
        let body = resp.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "rpc response");

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "rpc call failed");
            return Err(http_error(status, body));
        }
        if body.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&body).map_err(|e| WalletError::Network {
            status: Some(status.as_u16()),
            detail: format!("invalid JSON in response: {e}"),
        })
    }
}

fn http_error(status: StatusCode, body: String) -> WalletError {
    WalletError::Network {
        status: Some(status.as_u16()),
        detail: if body.is_empty() {
            status.to_string()
        } else {
            body
        },
    }
}

impl RpcChannel for HttpRpcClient {
    async fn account_status(&self, address: &str) -> Result<AccountStatus, WalletError> {
        let url = format!("{}/balance/{}", self.base_url, address);
        debug!(%url, "querying account status");

        let resp = self.client.get(&url).send().await?;
        let body = self.read_json(resp).await?;
        parse_account_status(&body)
    }

    async fn submit_transaction(&self, tx: &SignedTransaction) -> Result<Value, WalletError> {
        let url = format!("{}/send-tx", self.base_url);
        debug!(%url, nonce = tx.core.nonce, "submitting transaction");

        let resp = self.client.post(&url).json(tx).send().await?;
        self.read_json(resp).await
    }
}

/// Pull `balance` and `nonce` out of a status response.
///
/// Both may be JSON numbers or numeric strings; fractional balances are
/// truncated to whole smallest units.
pub fn parse_account_status(body: &Value) -> Result<AccountStatus, WalletError> {
    Ok(AccountStatus {
        balance: numeric_field(body, "balance")?,
        nonce: numeric_field(body, "nonce")?,
    })
}

fn numeric_field(body: &Value, field: &str) -> Result<u64, WalletError> {
    let malformed = |why: &str| WalletError::Network {
        status: None,
        detail: format!("malformed status response: `{field}` {why}"),
    };

    match body.get(field) {
        None | Some(Value::Null) => Err(malformed("is missing")),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.trunc() as u64))
            .ok_or_else(|| malformed("is not a non-negative number")),
        Some(Value::String(s)) => parse_decimal(s.trim())
            .ok_or_else(|| malformed("is not a non-negative number")),
        Some(_) => Err(malformed("has an unexpected type")),
    }
}

fn parse_decimal(s: &str) -> Option<u64> {
    let whole = match s.split_once('.') {
        Some((whole, frac)) if frac.chars().all(|c| c.is_ascii_digit()) => whole,
        Some(_) => return None,
        None => s,
    };
    if whole.is_empty() {
        return if s.len() > 1 { Some(0) } else { None };
    }
    whole.parse().ok()
}
