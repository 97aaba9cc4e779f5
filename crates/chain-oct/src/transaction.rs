//! Transfer transactions, their canonical form, and Ed25519 signing.
//!
//! The signature covers exactly one byte string, the compact JSON object
//!
//! ```text
//! {"from":<str>,"to_":<str>,"amount":<decimal str>,"nonce":<int>,"ou":<str>,"timestamp":<float>}
//! ```
//!
//! with keys in that order and no whitespace. `timestamp` is written as the
//! shortest decimal that round-trips to the same IEEE-754 double, always
//! with a decimal point (e.g. `1700000000.00125`, `1700000000.0`).
//! `signature` and `public_key` are appended only after signing and never
//! take part in the signed payload.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::address::validate_address;
use crate::error::OctError;
use crate::keys::keypair_from_seed;

/// `ou` tag carried by the fixed-amount transfer.
pub const TRANSFER_OU: &str = "1";

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// The signable fields of a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCore {
    pub from: String,
    #[serde(rename = "to_")]
    pub to: String,
    /// Amount in smallest units; travels as a decimal string.
    #[serde(with = "amount_string")]
    pub amount: u64,
    pub nonce: u64,
    pub ou: String,
    /// Fractional Unix seconds.
    pub timestamp: f64,
}

/// A transfer with its detached signature and the signer's public key, in
/// the shape the node's `send-tx` endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub core: TransactionCore,
    /// Base64 of the 64-byte Ed25519 signature.
    pub signature: String,
    /// Base64 of the 32-byte Ed25519 public key.
    pub public_key: String,
}

/// Borrowed view fixing the canonical key order.
#[derive(Serialize)]
struct CanonicalView<'a> {
    from: &'a str,
    to_: &'a str,
    amount: String,
    nonce: u64,
    ou: &'a str,
    timestamp: f64,
}

// ---------------------------------------------------------------------------
// Building and canonicalization
// ---------------------------------------------------------------------------

/// Build a fixed-kind transfer (`ou = "1"`).
///
/// Both addresses must be valid Octra addresses, `amount` must be non-zero,
/// and `timestamp` must be a finite, positive number of seconds.
pub fn build_transfer(
    from: &str,
    to: &str,
    amount: u64,
    nonce: u64,
    timestamp: f64,
) -> Result<TransactionCore, OctError> {
    validate_address(from)?;
    validate_address(to)?;

    if amount == 0 {
        return Err(OctError::TransactionBuildError("amount must be > 0".into()));
    }

    let tx = TransactionCore {
        from: from.to_owned(),
        to: to.to_owned(),
        amount,
        nonce,
        ou: TRANSFER_OU.to_owned(),
        timestamp,
    };
    check_timestamp(tx.timestamp)?;

    Ok(tx)
}

impl TransactionCore {
    /// The exact bytes a signature over this transaction authenticates.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, OctError> {
        check_timestamp(self.timestamp)?;

        let view = CanonicalView {
            from: &self.from,
            to_: &self.to,
            amount: self.amount.to_string(),
            nonce: self.nonce,
            ou: &self.ou,
            timestamp: self.timestamp,
        };

        serde_json::to_vec(&view).map_err(|e| OctError::SerializationError(e.to_string()))
    }
}

fn check_timestamp(timestamp: f64) -> Result<(), OctError> {
    // NaN and infinities have no JSON number form.
    if !timestamp.is_finite() || timestamp <= 0.0 {
        return Err(OctError::TransactionBuildError(format!(
            "timestamp must be a finite positive number, got {timestamp}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Signing and verification
// ---------------------------------------------------------------------------

/// Sign `tx` with the 32-byte signing key.
///
/// The key pair is rebuilt from `signing_key` on every call; no key object
/// outlives the signature.
pub fn sign_transaction(
    tx: &TransactionCore,
    signing_key: &[u8; 32],
) -> Result<SignedTransaction, OctError> {
    let message = tx.canonical_bytes()?;

    let keypair = keypair_from_seed(signing_key);
    let signature = keypair.sign(&message);

    Ok(SignedTransaction {
        core: tx.clone(),
        signature: BASE64.encode(signature),
        public_key: BASE64.encode(keypair.public_key()),
    })
}

/// Verify a base64 signature over the canonical form of `tx` against an
/// arbitrary public key.
pub fn verify_with_public_key(
    tx: &TransactionCore,
    signature_b64: &str,
    public_key: &[u8; 32],
) -> Result<(), OctError> {
    let verifying_key = VerifyingKey::from_bytes(public_key)
        .map_err(|e| OctError::InvalidPublicKey(e.to_string()))?;

    let sig_bytes: [u8; 64] = BASE64
        .decode(signature_b64)
        .map_err(|e| OctError::InvalidSignature(format!("base64 decode failed: {e}")))?
        .try_into()
        .map_err(|v: Vec<u8>| {
            OctError::InvalidSignature(format!("expected 64 bytes, got {}", v.len()))
        })?;
    let signature = Signature::from_bytes(&sig_bytes);

    let message = tx.canonical_bytes()?;
    verifying_key
        .verify(&message, &signature)
        .map_err(|e| OctError::InvalidSignature(e.to_string()))
}

/// Verify a signed transaction against the public key it carries.
pub fn verify_signed_transaction(signed: &SignedTransaction) -> Result<(), OctError> {
    let public_key: [u8; 32] = BASE64
        .decode(&signed.public_key)
        .map_err(|e| OctError::InvalidPublicKey(format!("base64 decode failed: {e}")))?
        .try_into()
        .map_err(|v: Vec<u8>| {
            OctError::InvalidPublicKey(format!("expected 32 bytes, got {}", v.len()))
        })?;

    verify_with_public_key(&signed.core, &signed.signature, &public_key)
}

// ---------------------------------------------------------------------------
// Amount wire format
// ---------------------------------------------------------------------------

/// Amounts are written as decimal strings; either a string or an integer is
/// accepted when reading.
mod amount_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Text(String),
        Number(u64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(n) => Ok(n),
            RawAmount::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|e| de::Error::custom(format!("invalid amount {s:?}: {e}"))),
        }
    }
}
