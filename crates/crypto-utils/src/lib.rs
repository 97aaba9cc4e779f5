//! # crypto-utils
//!
//! Base58 encoding, secure random generation, and memory safety utilities
//! for the Octra wallet.

pub mod base58;
pub mod error;
pub mod random;
pub mod zeroizing;

pub use error::CryptoError;
pub use zeroizing::{ZeroizingBytes, ZeroizingString};
