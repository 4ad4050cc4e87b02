//! Finding the deposit index a vault assigned, from a deposit receipt.

use alloy_primitives::{B256, U256};
use chain_eth::abi::event_topic;
use chain_eth::chains::trailing_logs;
use chain_eth::receipt::Log;
use tracing::{debug, warn};

use crate::error::ClaimError;
use crate::registry::{TransactionReceiptSource, VaultAddressRegistry};
use crate::version::{ContractVersion, LogStrategy};

/// Signature of the event every vault emits per deposit.
pub const DEPOSIT_EVENT_SIGNATURE: &str = "DepositEvent(uint256,uint8,uint256,address)";

pub fn deposit_event_topic() -> B256 {
    event_topic(DEPOSIT_EVENT_SIGNATURE)
}

/// Reads the index of a single deposit from the logs of its transaction.
///
/// The vault's deposit event is the last log of the receipt, except on
/// chains that append their own logs after it.
pub fn extract_one(logs: &[Log], chain_id: &str, contract_version: &str) -> Result<u64, ClaimError> {
    let strategy = contract_version
        .parse::<ContractVersion>()?
        .capabilities()
        .log_strategy;
    let trailing = chain_id.parse::<u64>().map(trailing_logs).unwrap_or(0);

    let position = logs.len().checked_sub(1 + trailing).ok_or_else(|| {
        ClaimError::IndexNotFound(format!(
            "receipt has {} logs, chain {chain_id} needs at least {}",
            logs.len(),
            1 + trailing
        ))
    })?;
    let log = &logs[position];
    debug!(chain_id, ?strategy, position, total = logs.len(), "reading deposit log");

    let raw = match strategy {
        LogStrategy::Legacy => log.args.first().copied().or_else(|| log.first_data_word()),
        LogStrategy::IndexedTopic => log.topic_as_u256(1),
    }
    .ok_or_else(|| {
        ClaimError::IndexNotFound(format!("log {position} carries no deposit index"))
    })?;

    index_from_word(raw)
}

/// Reads the indices of every deposit in a batch transaction, in log order.
///
/// Only deposit events emitted by the vault for `(chain_id,
/// contract_version)` count. A batcher tag resolves to its vault, since the
/// vault emits the events.
pub fn extract_many<R: VaultAddressRegistry + ?Sized>(
    logs: &[Log],
    chain_id: &str,
    contract_version: &str,
    registry: &R,
) -> Result<Vec<u64>, ClaimError> {
    let version = contract_version.parse::<ContractVersion>()?.as_vault();
    let vault = registry
        .resolve(chain_id, &version)
        .ok_or_else(|| ClaimError::UnknownContract {
            chain_id: chain_id.to_owned(),
            version: version.to_string(),
        })?;
    let topic = deposit_event_topic();

    let mut indices = Vec::new();
    for (position, log) in logs.iter().enumerate() {
        if log.address != vault || log.topics.first() != Some(&topic) {
            continue;
        }
        match log.topic_as_u256(1).map(index_from_word) {
            Some(Ok(index)) => indices.push(index),
            Some(Err(e)) => warn!(position, error = %e, "skipping deposit event"),
            None => warn!(position, "skipping deposit event without an index topic"),
        }
    }

    if indices.is_empty() {
        return Err(ClaimError::IndexNotFound(format!(
            "no deposit events from {vault} in {} logs",
            logs.len()
        )));
    }
    debug!(chain_id, %vault, deposits = indices.len(), "extracted deposit indices");
    Ok(indices)
}

/// Fetches a batch deposit receipt and extracts its indices.
pub fn fetch_deposit_indices<S, R>(
    source: &S,
    tx_hash: &B256,
    chain_id: &str,
    contract_version: &str,
    registry: &R,
) -> Result<Vec<u64>, ClaimError>
where
    S: TransactionReceiptSource + ?Sized,
    R: VaultAddressRegistry + ?Sized,
{
    let receipt = source
        .fetch(tx_hash, chain_id)
        .map_err(ClaimError::Collaborator)?;
    extract_many(&receipt.logs, chain_id, contract_version, registry)
}

fn index_from_word(word: U256) -> Result<u64, ClaimError> {
    u64::try_from(word).map_err(|_| ClaimError::IndexOverflow(format!("{word:#x}")))
}
