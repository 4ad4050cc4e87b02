//! Interfaces to the outside world.
//!
//! Contract addresses, receipts and bridge quotes come from collaborators
//! the caller supplies. [`StaticVaultRegistry`] covers the common case of a
//! fixed address table.

use std::collections::HashMap;

use alloy_primitives::{Address, Bytes, B256, U256};
use chain_eth::address::parse_address;
use chain_eth::receipt::TransactionReceipt;
use serde::{Deserialize, Serialize};

use crate::error::{ClaimError, CollaboratorError};
use crate::version::ContractVersion;

/// Resolves the deployed address of a vault, batcher or router.
pub trait VaultAddressRegistry {
    fn resolve(&self, chain_id: &str, version: &ContractVersion) -> Option<Address>;
}

/// Fetches transaction receipts.
pub trait TransactionReceiptSource {
    fn fetch(&self, tx_hash: &B256, chain_id: &str) -> Result<TransactionReceipt, CollaboratorError>;
}

/// Quotes a bridge route for a cross-chain claim.
pub trait RoutingProvider {
    fn quote(&self, request: &RouteRequest) -> Result<RoutingQuote, CollaboratorError>;
}

/// What a cross-chain claim wants the bridge to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub source_chain_id: String,
    pub destination_chain_id: String,
    /// Receives the bridged funds on the destination chain.
    pub recipient: Address,
    pub deposit_index: u64,
}

/// A bridge route: call `target_address` with `calldata`, sending `value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingQuote {
    pub target_address: Address,
    pub calldata: Bytes,
    /// Native value the router forwards to the bridge.
    pub value: U256,
    /// Fee the route charges, informational.
    #[serde(default)]
    pub fee: U256,
}

/// A fixed `(chain, version) -> address` table.
#[derive(Debug, Clone, Default)]
pub struct StaticVaultRegistry {
    entries: HashMap<(String, ContractVersion), Address>,
}

impl StaticVaultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, chain_id: &str, version: ContractVersion, address: Address) -> Self {
        self.insert(chain_id, version, address);
        self
    }

    pub fn insert(&mut self, chain_id: &str, version: ContractVersion, address: Address) {
        self.entries.insert((chain_id.to_owned(), version), address);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads `{ "<chainId>": { "<version>": "<address>" } }`.
    pub fn from_json(json: &str) -> Result<Self, ClaimError> {
        let table: HashMap<String, HashMap<String, String>> = serde_json::from_str(json)?;

        let mut registry = Self::new();
        for (chain_id, contracts) in table {
            for (version, address) in contracts {
                let address =
                    parse_address(&address).map_err(|e| ClaimError::Config(e.to_string()))?;
                registry.insert(&chain_id, version.parse()?, address);
            }
        }
        Ok(registry)
    }
}

impl VaultAddressRegistry for StaticVaultRegistry {
    fn resolve(&self, chain_id: &str, version: &ContractVersion) -> Option<Address> {
        self.entries.get(&(chain_id.to_owned(), *version)).copied()
    }
}
