//! Packed ABI encoding (`abi.encodePacked`) for signed digests.
//!
//! Vault and router contracts rebuild the digests they verify with
//! `keccak256(abi.encodePacked(...))`, so every field here is written at its
//! natural width with no padding and no length prefixes.

use alloy_primitives::{Address, B256, U256};
use sha3::{Digest, Keccak256};

/// A single packed parameter.
#[derive(Debug, Clone)]
pub enum PackedParam<'a> {
    /// `bytes2`, written as-is.
    Bytes2([u8; 2]),
    /// `bytes32`, written as-is.
    Bytes32(B256),
    /// `address`, 20 bytes.
    Address(Address),
    /// `uint256`, 32 bytes big-endian.
    Uint256(U256),
    /// Dynamic `bytes`, written raw without a length prefix.
    Bytes(&'a [u8]),
}

impl PackedParam<'_> {
    /// Number of bytes this parameter occupies once packed.
    pub fn packed_len(&self) -> usize {
        match self {
            PackedParam::Bytes2(_) => 2,
            PackedParam::Bytes32(_) => 32,
            PackedParam::Address(_) => 20,
            PackedParam::Uint256(_) => 32,
            PackedParam::Bytes(bytes) => bytes.len(),
        }
    }
}

/// Concatenates `params` in order using packed encoding.
pub fn encode_packed(params: &[PackedParam<'_>]) -> Vec<u8> {
    let mut data = Vec::with_capacity(params.iter().map(PackedParam::packed_len).sum());

    for param in params {
        match param {
            PackedParam::Bytes2(tag) => data.extend_from_slice(tag),
            PackedParam::Bytes32(word) => data.extend_from_slice(word.as_slice()),
            PackedParam::Address(addr) => data.extend_from_slice(addr.as_slice()),
            PackedParam::Uint256(value) => data.extend_from_slice(&value.to_be_bytes::<32>()),
            PackedParam::Bytes(bytes) => data.extend_from_slice(bytes),
        }
    }

    data
}

/// `keccak256(abi.encodePacked(params...))`, the Solidity `solidityKeccak256`.
pub fn packed_keccak256(params: &[PackedParam<'_>]) -> B256 {
    keccak256(&encode_packed(params))
}

/// Keccak-256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> B256 {
    B256::from_slice(&Keccak256::digest(data))
}

/// Topic hash of an event signature such as `Transfer(address,address,uint256)`.
pub fn event_topic(signature: &str) -> B256 {
    keccak256(signature.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_packed_without_padding() {
        let mut raw = [0u8; 20];
        raw[0] = 0xde;
        raw[19] = 0xad;

        let data = encode_packed(&[PackedParam::Address(Address::from(raw))]);
        assert_eq!(data.len(), 20);
        assert_eq!(data, raw.to_vec());
    }

    #[test]
    fn uint256_is_big_endian_32_bytes() {
        let data = encode_packed(&[PackedParam::Uint256(U256::from(42u64))]);
        assert_eq!(data.len(), 32);
        assert_eq!(&data[..31], &[0u8; 31]);
        assert_eq!(data[31], 42);
    }

    #[test]
    fn dynamic_bytes_have_no_length_prefix() {
        let calldata = [0xCA, 0xFE, 0xBA, 0xBE, 0x01];
        let data = encode_packed(&[PackedParam::Bytes(&calldata)]);
        assert_eq!(data, calldata.to_vec());
    }

    #[test]
    fn mixed_params_concatenate_in_order() {
        let addr = Address::repeat_byte(0x11);
        let params = [
            PackedParam::Bytes2([0x19, 0x00]),
            PackedParam::Address(addr),
            PackedParam::Uint256(U256::from(1u64)),
            PackedParam::Bytes(&[0xFF]),
        ];

        let data = encode_packed(&params);
        assert_eq!(data.len(), 2 + 20 + 32 + 1);
        assert_eq!(&data[..2], &[0x19, 0x00]);
        assert_eq!(&data[2..22], addr.as_slice());
        assert_eq!(data[53], 1);
        assert_eq!(data[54], 0xFF);
    }

    #[test]
    fn packed_len_matches_encoding() {
        let params = [
            PackedParam::Bytes32(B256::repeat_byte(0xAB)),
            PackedParam::Bytes(&[1, 2, 3]),
        ];
        let expected: usize = params.iter().map(PackedParam::packed_len).sum();
        assert_eq!(encode_packed(&params).len(), expected);
    }

    #[test]
    fn keccak256_of_empty_input() {
        assert_eq!(
            hex::encode(keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn packed_keccak_equals_hash_of_encoding() {
        let params = [PackedParam::Address(Address::repeat_byte(0x42))];
        assert_eq!(packed_keccak256(&params), keccak256(&encode_packed(&params)));
    }

    #[test]
    fn event_topic_known_vector() {
        // ERC-20 Transfer event topic.
        assert_eq!(
            hex::encode(event_topic("Transfer(address,address,uint256)")),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
