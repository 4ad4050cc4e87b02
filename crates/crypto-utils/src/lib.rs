//! # crypto-utils
//!
//! Secure random generation for link secrets: raw bytes and the
//! alphanumeric passwords embedded in claim links.

pub mod random;
