use serde::Serialize;

/// Definition of an EVM-compatible network, as far as receipt decoding
/// cares about it.
#[derive(Debug, Clone, Serialize)]
pub struct EvmChain {
    pub chain_id: u64,
    /// Logs the chain appends after the contract's own events in every
    /// receipt. Polygon PoS chains emit a `LogFeeTransfer` from the fee
    /// contract after user logs.
    pub trailing_logs: usize,
}

/// Ethereum Mainnet (chain ID 1).
pub const ETHEREUM: EvmChain = EvmChain {
    chain_id: 1,
    trailing_logs: 0,
};

/// Optimism (chain ID 10).
pub const OPTIMISM: EvmChain = EvmChain {
    chain_id: 10,
    trailing_logs: 0,
};

/// BNB Smart Chain (chain ID 56).
pub const BSC: EvmChain = EvmChain {
    chain_id: 56,
    trailing_logs: 0,
};

/// Polygon PoS (chain ID 137).
pub const POLYGON: EvmChain = EvmChain {
    chain_id: 137,
    trailing_logs: 1,
};

/// Base (chain ID 8453).
pub const BASE: EvmChain = EvmChain {
    chain_id: 8453,
    trailing_logs: 0,
};

/// Arbitrum One (chain ID 42161).
pub const ARBITRUM: EvmChain = EvmChain {
    chain_id: 42161,
    trailing_logs: 0,
};

/// Avalanche C-Chain (chain ID 43114).
pub const AVALANCHE: EvmChain = EvmChain {
    chain_id: 43114,
    trailing_logs: 0,
};

/// Polygon Mumbai Testnet (chain ID 80001).
pub const POLYGON_MUMBAI: EvmChain = EvmChain {
    chain_id: 80001,
    trailing_logs: 1,
};

/// Sepolia Testnet (chain ID 11155111).
pub const SEPOLIA: EvmChain = EvmChain {
    chain_id: 11155111,
    trailing_logs: 0,
};

/// All known EVM chains. Chains missing from this table are treated as
/// having no trailing logs; a chain that starts emitting them has to be
/// added here explicitly.
const ALL_CHAINS: &[&EvmChain] = &[
    &ETHEREUM,
    &OPTIMISM,
    &BSC,
    &POLYGON,
    &BASE,
    &ARBITRUM,
    &AVALANCHE,
    &POLYGON_MUMBAI,
    &SEPOLIA,
];

/// Returns the chain definition for a given chain ID, or `None` if unknown.
pub fn get_chain(chain_id: u64) -> Option<&'static EvmChain> {
    ALL_CHAINS.iter().find(|c| c.chain_id == chain_id).copied()
}

/// Returns all known EVM chain definitions.
pub fn known_chains() -> Vec<&'static EvmChain> {
    ALL_CHAINS.to_vec()
}

/// Number of chain-emitted logs that follow the contract's own logs in a
/// receipt on `chain_id`.
pub fn trailing_logs(chain_id: u64) -> usize {
    get_chain(chain_id).map_or(0, |c| c.trailing_logs)
}
