//! Wallet records and the signing account built from them.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chain_oct::{sign_transaction, validate_address, SignedTransaction, TransactionCore};
use crypto_utils::ZeroizingString;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::WalletError;
use crate::key_derivation::{derive_octra_key, signing_key_from_b64, DerivedOctraKey};
use crate::mnemonic::{generate_mnemonic, mnemonic_from_entropy, ENTROPY_BYTES};

/// Wallet material as exchanged with whoever persists it.
///
/// Reads both the generator's field names (`private_key_b64`, `address`)
/// and the short ones used by older wallet files (`priv`, `addr`).
#[derive(Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct WalletRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    #[serde(alias = "priv")]
    pub private_key_b64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_b64: Option<String>,
    #[serde(alias = "addr")]
    pub address: String,
    /// Node base URL; the default endpoint is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc: Option<String>,
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("mnemonic", &self.mnemonic.as_ref().map(|_| "[REDACTED]"))
            .field("private_key_b64", &"[REDACTED]")
            .field("public_key_b64", &self.public_key_b64)
            .field("address", &self.address)
            .field("rpc", &self.rpc)
            .finish()
    }
}

impl WalletRecord {
    fn from_key(mnemonic: String, key: &DerivedOctraKey) -> Self {
        Self {
            mnemonic: Some(mnemonic),
            private_key_b64: BASE64.encode(key.private_key),
            public_key_b64: Some(BASE64.encode(key.public_key)),
            address: key.address.clone(),
            rpc: None,
        }
    }
}

/// Generate a brand-new wallet from 16 bytes of OS randomness.
///
/// The only failure mode is an unavailable entropy source, reported as
/// [`WalletError::RandomnessFailure`] and never retried.
pub fn generate() -> Result<WalletRecord, WalletError> {
    let record = record_from_mnemonic(&generate_mnemonic()?)?;
    debug!(address = %record.address, "generated wallet");
    Ok(record)
}

/// Deterministic wallet generation: same entropy, same mnemonic, same keys,
/// same address.
pub fn generate_from_entropy(entropy: &[u8; ENTROPY_BYTES]) -> Result<WalletRecord, WalletError> {
    record_from_mnemonic(&mnemonic_from_entropy(entropy)?)
}

fn record_from_mnemonic(mnemonic: &ZeroizingString) -> Result<WalletRecord, WalletError> {
    let key = derive_octra_key(mnemonic)?;
    Ok(WalletRecord::from_key(String::from(&**mnemonic), &key))
}

/// A validated wallet able to sign transfers.
///
/// Only the 32-byte signing key is kept; the Ed25519 key pair is rebuilt
/// for every signature.
pub struct WalletAccount {
    signing_key: Zeroizing<[u8; 32]>,
    public_key: [u8; 32],
    address: String,
}

impl WalletAccount {
    /// Validate a record and build the account.
    ///
    /// The private key must be base64 of at least 32 bytes (the first 32 are
    /// used). The address must be well formed and belong to that key, and a
    /// stored public key, if any, must match it too.
    pub fn from_record(record: &WalletRecord) -> Result<Self, WalletError> {
        let signing_key = signing_key_from_b64(&record.private_key_b64)
            .map_err(|e| WalletError::InvalidWalletRecord(e.to_string()))?;
        let account = Self::from_signing_key(&signing_key);

        let address = record.address.trim();
        if address.is_empty() {
            return Err(WalletError::InvalidWalletRecord("address is missing".into()));
        }
        validate_address(address)
            .map_err(|e| WalletError::InvalidWalletRecord(e.to_string()))?;
        if address != account.address {
            return Err(WalletError::InvalidWalletRecord(format!(
                "address {address} does not belong to the private key"
            )));
        }

        if let Some(pk_b64) = &record.public_key_b64 {
            let pk = BASE64.decode(pk_b64.trim()).map_err(|e| {
                WalletError::InvalidWalletRecord(format!("public key is not base64: {e}"))
            })?;
            if pk.as_slice() != account.public_key.as_slice() {
                return Err(WalletError::InvalidWalletRecord(
                    "public key does not match the private key".into(),
                ));
            }
        }

        Ok(account)
    }

    pub fn from_signing_key(signing_key: &[u8; 32]) -> Self {
        let key = DerivedOctraKey::from_signing_key(signing_key);
        Self {
            signing_key: Zeroizing::new(*signing_key),
            public_key: key.public_key,
            address: key.address.clone(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.public_key
    }

    /// Sign `tx` with this account's key.
    pub fn sign(&self, tx: &TransactionCore) -> Result<SignedTransaction, WalletError> {
        if tx.from != self.address {
            return Err(WalletError::SigningFailed(format!(
                "transaction sender {} is not this account",
                tx.from
            )));
        }
        Ok(sign_transaction(tx, &self.signing_key)?)
    }
}

impl fmt::Debug for WalletAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletAccount")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
