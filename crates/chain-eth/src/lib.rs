//! EVM primitives for claim links.
//!
//! This crate provides:
//! - Ethereum address derivation and EIP-55 parsing
//! - Packed (`abi.encodePacked`) encoding for signed digests
//! - EIP-191 message hashing and recoverable secp256k1 signatures
//! - EVM chain definitions, including receipt layout quirks
//! - A minimal transaction receipt / log model

pub mod abi;
pub mod address;
pub mod chains;
pub mod error;
pub mod receipt;
pub mod signing;

pub use error::EthError;
