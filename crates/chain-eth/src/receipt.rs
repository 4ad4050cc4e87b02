use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// A single event log as returned by a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Contract that emitted the event.
    pub address: Address,
    /// Indexed topics; `topics[0]` is the event signature hash.
    #[serde(default)]
    pub topics: Vec<B256>,
    /// Non-indexed event data.
    #[serde(default)]
    pub data: Bytes,
    /// Decoded event arguments, present only when the receipt source parsed
    /// the log against the emitting contract's ABI.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<U256>,
}

impl Log {
    /// Returns topic `n` as an unsigned integer.
    pub fn topic_as_u256(&self, n: usize) -> Option<U256> {
        self.topics.get(n).map(|t| U256::from_be_bytes(t.0))
    }

    /// Returns the first 32-byte word of `data` as an unsigned integer.
    pub fn first_data_word(&self) -> Option<U256> {
        let word = self.data.get(..32)?;
        Some(U256::from_be_slice(word))
    }
}

/// The part of a transaction receipt needed to locate deposit events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    #[serde(default)]
    pub transaction_hash: Option<B256>,
    pub logs: Vec<Log>,
}
