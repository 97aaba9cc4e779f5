//! Octra chain support for the wallet.
//!
//! Addresses are `"oct"` followed by the Base58 encoding of the SHA-256 hash
//! of an Ed25519 public key. Transfers are signed over a compact canonical
//! JSON rendering of their fields and submitted as JSON objects carrying the
//! base64 signature and public key.

pub mod address;
pub mod error;
pub mod keys;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{address_from_public_key, validate_address, ADDRESS_PREFIX};
pub use error::OctError;
pub use keys::{keypair_from_seed, signing_key_from_slice, OctKeyPair};
pub use transaction::{
    build_transfer, sign_transaction, verify_signed_transaction, verify_with_public_key,
    SignedTransaction, TransactionCore, TRANSFER_OU,
};
