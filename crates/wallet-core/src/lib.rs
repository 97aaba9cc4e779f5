pub mod config;
pub mod error;
pub mod key_derivation;
pub mod mnemonic;
pub mod rpc;
pub mod transfer;
pub mod types;
pub mod wallet;

pub use config::WalletConfig;
pub use error::WalletError;
pub use rpc::{HttpRpcClient, RpcChannel};
pub use transfer::TransferProtocol;
pub use types::{
    format_oct, AccountStatus, TransferReceipt, TransferState, MU, TRANSFER_AMOUNT_RAW,
};
pub use wallet::{WalletAccount, WalletRecord};

uniffi::setup_scaffolding!();

// ─── UniFFI-exported functions ──────────────────────────────────────
// UniFFI passes owned String/Vec<u8> across FFI, so every export takes
// owned values.

/// Generate a new wallet: 12-word mnemonic, signing key, public key, address.
#[uniffi::export]
pub fn generate_wallet() -> Result<WalletRecord, WalletError> {
    wallet::generate()
}

/// Validate a mnemonic phrase
#[uniffi::export]
pub fn validate_mnemonic(phrase: String) -> Result<bool, WalletError> {
    mnemonic::validate_mnemonic(&phrase)
}

/// Address for a raw 32-byte Ed25519 public key.
#[uniffi::export]
pub fn address_from_public_key(public_key: Vec<u8>) -> Result<String, WalletError> {
    let public_key: [u8; 32] = public_key.as_slice().try_into().map_err(|_| {
        WalletError::InvalidAddress(format!(
            "public key must be 32 bytes, got {}",
            public_key.len()
        ))
    })?;
    Ok(chain_oct::address_from_public_key(&public_key))
}

/// Validate an Octra address
#[uniffi::export]
pub fn validate_address(address: String) -> Result<bool, WalletError> {
    Ok(chain_oct::validate_address(address.trim())?)
}

/// Build and sign the fixed 0.01 OCT transfer offline.
///
/// `private_key_b64` is the wallet's base64 key (at least 32 bytes, the
/// first 32 are used). Returns the JSON body for `POST /send-tx`; the host
/// supplies the nonce (last nonce + 1) and the timestamp.
#[uniffi::export]
pub fn sign_transfer(
    private_key_b64: String,
    to_address: String,
    nonce: u64,
    timestamp: f64,
) -> Result<String, WalletError> {
    let signing_key = key_derivation::signing_key_from_b64(&private_key_b64)?;
    let account = WalletAccount::from_signing_key(&signing_key);
    let tx = chain_oct::build_transfer(
        account.address(),
        to_address.trim(),
        TRANSFER_AMOUNT_RAW,
        nonce,
        timestamp,
    )?;
    let signed = account.sign(&tx)?;
    serde_json::to_string(&signed).map_err(|e| WalletError::Internal(e.to_string()))
}

/// Check a `send-tx` JSON body against the public key it carries.
#[uniffi::export]
pub fn verify_transfer(signed_json: String) -> Result<bool, WalletError> {
    let signed: chain_oct::SignedTransaction = serde_json::from_str(&signed_json)
        .map_err(|e| WalletError::TransactionFailed(format!("malformed transaction: {e}")))?;
    Ok(chain_oct::verify_signed_transaction(&signed).is_ok())
}
