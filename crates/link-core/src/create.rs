//! Turning confirmed deposits into claim links.

use chain_eth::receipt::TransactionReceipt;
use crypto_utils::random::random_password;
use link_codec::{encode, LinkParams};
use tracing::debug;

use crate::config::LinkConfig;
use crate::deposit::{extract_many, extract_one};
use crate::error::ClaimError;
use crate::registry::VaultAddressRegistry;
use crate::version::ContractVersion;

/// A fresh random password for a new link.
pub fn generate_password(config: &LinkConfig) -> String {
    random_password(config.password_length)
}

/// Builds the claim link for a single deposit transaction.
pub fn link_from_receipt(
    receipt: &TransactionReceipt,
    chain_id: &str,
    contract_version: &str,
    password: &str,
    config: &LinkConfig,
) -> Result<String, ClaimError> {
    let deposit_index = extract_one(&receipt.logs, chain_id, contract_version)?;
    let version = contract_version.parse::<ContractVersion>()?.as_vault();

    Ok(encode(
        &LinkParams {
            chain_id: chain_id.to_owned(),
            contract_version: version.to_string(),
            deposit_index,
            password: password.to_owned(),
            track_id: String::new(),
        },
        &config.claim_base_url,
    ))
}

/// Builds one claim link per deposit of a batch transaction.
///
/// `passwords[k]` protects the k-th deposit in log order, so there must be
/// exactly one password per deposit.
pub fn links_from_receipt<R: VaultAddressRegistry + ?Sized>(
    receipt: &TransactionReceipt,
    chain_id: &str,
    contract_version: &str,
    passwords: &[String],
    registry: &R,
    config: &LinkConfig,
) -> Result<Vec<String>, ClaimError> {
    let indices = extract_many(&receipt.logs, chain_id, contract_version, registry)?;
    if indices.len() != passwords.len() {
        return Err(ClaimError::CountMismatch {
            passwords: passwords.len(),
            indices: indices.len(),
        });
    }
    let version = contract_version.parse::<ContractVersion>()?.as_vault().to_string();

    debug!(chain_id, %version, links = indices.len(), "creating links from batch receipt");
    Ok(indices
        .into_iter()
        .zip(passwords)
        .map(|(deposit_index, password)| {
            encode(
                &LinkParams {
                    chain_id: chain_id.to_owned(),
                    contract_version: version.clone(),
                    deposit_index,
                    password: password.clone(),
                    track_id: String::new(),
                },
                &config.claim_base_url,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deposit::deposit_event_topic;
    use crate::registry::StaticVaultRegistry;
    use alloy_primitives::{Address, B256, U256};
    use chain_eth::receipt::Log;
    use link_codec::decode;

    fn deposit_log(vault: Address, index: u64) -> Log {
        Log {
            address: vault,
            topics: vec![deposit_event_topic(), B256::from(U256::from(index).to_be_bytes::<32>())],
            ..Default::default()
        }
    }

    #[test]
    fn generated_password_length() {
        let config = LinkConfig {
            password_length: 24,
            ..Default::default()
        };
        let password = generate_password(&config);
        assert_eq!(password.len(), 24);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn single_link_from_receipt() {
        let receipt = TransactionReceipt {
            transaction_hash: None,
            logs: vec![deposit_log(Address::repeat_byte(1), 314)],
        };
        let link =
            link_from_receipt(&receipt, "10", "v4", "pw", &LinkConfig::default()).unwrap();
        assert_eq!(link, "https://peanut.to/claim?c=10&v=v4&i=314#p=pw");
    }

    #[test]
    fn batch_links_pair_passwords_in_order() {
        let vault = Address::repeat_byte(1);
        let registry = StaticVaultRegistry::new().with("1", "v4.3".parse().unwrap(), vault);
        let receipt = TransactionReceipt {
            transaction_hash: None,
            logs: vec![deposit_log(vault, 8), deposit_log(vault, 3)],
        };
        let passwords = vec!["first".to_string(), "second".to_string()];

        let links = links_from_receipt(
            &receipt,
            "1",
            "Bv4.3",
            &passwords,
            &registry,
            &LinkConfig::default(),
        )
        .unwrap();

        let decoded: Vec<_> = links.iter().map(|l| decode(l).unwrap()).collect();
        assert_eq!(decoded[0].deposit_index, 8);
        assert_eq!(decoded[0].password, "first");
        assert_eq!(decoded[1].deposit_index, 3);
        assert_eq!(decoded[1].password, "second");
        assert!(decoded.iter().all(|p| p.contract_version == "v4.3"));
    }

    #[test]
    fn batch_count_mismatch() {
        let vault = Address::repeat_byte(1);
        let registry = StaticVaultRegistry::new().with("1", "v4".parse().unwrap(), vault);
        let receipt = TransactionReceipt {
            transaction_hash: None,
            logs: vec![deposit_log(vault, 1), deposit_log(vault, 2)],
        };

        let err = links_from_receipt(
            &receipt,
            "1",
            "v4",
            &["only".to_string()],
            &registry,
            &LinkConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ClaimError::CountMismatch {
                passwords: 1,
                indices: 2
            }
        ));
    }
}
