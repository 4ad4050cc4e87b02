use alloy_primitives::Address;
use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::error::EthError;

/// Derives the Ethereum address of a secp256k1 public key.
///
/// The derivation takes the Keccak-256 hash of the 64-byte uncompressed key
/// (without the 0x04 prefix) and uses the last 20 bytes as the address.
pub fn address_from_public_key(key: &VerifyingKey) -> Address {
    let uncompressed = key.to_encoded_point(false);
    let hash = Keccak256::digest(&uncompressed.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Derives the Ethereum address controlled by a raw 32-byte private key.
pub fn address_from_private_key(private_key: &[u8; 32]) -> Result<Address, EthError> {
    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()));
    key_bytes.zeroize();

    Ok(address_from_public_key(signing_key?.verifying_key()))
}

/// Parses a 0x-prefixed hex address.
///
/// All-lowercase and all-uppercase inputs are accepted as-is. Mixed-case
/// inputs must carry a valid EIP-55 checksum.
pub fn parse_address(address: &str) -> Result<Address, EthError> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    let bytes = hex::decode(hex_part)
        .map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;
    let parsed = Address::from_slice(&bytes);

    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return Ok(parsed);
    }

    if &checksum(&parsed)[2..] != hex_part {
        return Err(EthError::InvalidAddress(format!(
            "bad EIP-55 checksum: {address}"
        )));
    }

    Ok(parsed)
}

/// Renders an address with EIP-55 mixed-case checksum.
pub fn checksum(address: &Address) -> String {
    address.to_checksum(None)
}
