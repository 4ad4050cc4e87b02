use alloy_primitives::{b256, Address, B256, U256};
use chain_eth::abi::{packed_keccak256, PackedParam};
use chain_eth::signing::{hash_message, recover_signer, sign_prehash, RecoverableSignature};
use link_codec::{LinkError, LinkParams};
use serde::Serialize;
use tracing::debug;

use crate::error::ClaimError;
use crate::keys::{derive_key_pair, ClaimKeyPair};
use crate::version::ContractVersion;

/// Salt mixed into scoped withdrawal digests.
pub const WITHDRAWAL_SALT: B256 =
    b256!("70adbbeba9d4f0c82e28dd574f15466f75df0543b65f24460fc445813b5d94e0");

/// Who may submit a scoped withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WithdrawalMode {
    /// Anyone holding the signature may submit it for the recipient.
    #[default]
    Anyone,
    /// Only the recipient may submit it.
    RecipientOnly,
}

impl WithdrawalMode {
    pub fn tag(self) -> B256 {
        match self {
            WithdrawalMode::Anyone => B256::ZERO,
            WithdrawalMode::RecipientOnly => {
                b256!("2bb5bef2b248d3edba501ad918c3ab524cce2aea54d4c914414e1c4401dc4ff4")
            }
        }
    }
}

/// Signed permission to withdraw one deposit to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimAuthorization {
    pub deposit_index: u64,
    pub recipient: Address,
    /// The EIP-191 prefixed digest that was signed.
    pub auth_hash: B256,
    #[serde(serialize_with = "serialize_signature")]
    pub signature: RecoverableSignature,
}

pub(crate) fn serialize_signature<S: serde::Serializer>(
    signature: &RecoverableSignature,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&signature.to_hex())
}

/// Authorizes withdrawal of the deposit in `params` to `recipient`.
///
/// Signs the EIP-191 hash of `keccak256(recipient)` with the key derived
/// from the link password.
pub fn authorize_claim(
    params: &LinkParams,
    recipient: Address,
) -> Result<ClaimAuthorization, ClaimError> {
    let keys = derive_key_pair(&params.password)?;
    authorize_with_keys(&keys, params.deposit_index, recipient)
}

pub(crate) fn authorize_with_keys(
    keys: &ClaimKeyPair,
    deposit_index: u64,
    recipient: Address,
) -> Result<ClaimAuthorization, ClaimError> {
    let recipient_hash = packed_keccak256(&[PackedParam::Address(recipient)]);
    let auth_hash = hash_message(recipient_hash.as_slice());
    let signature = sign_prehash(&auth_hash, keys.private_key())?;

    debug!(deposit_index, %recipient, signer = %keys.address(), "authorized claim");
    Ok(ClaimAuthorization {
        deposit_index,
        recipient,
        auth_hash,
        signature,
    })
}

/// Authorizes a withdrawal bound to one chain, vault and recipient.
///
/// Only versions that accept scoped withdrawals (v4.2 and later) can verify
/// this signature; others fail with
/// [`ClaimError::UnsupportedContractVersion`].
pub fn authorize_scoped_claim(
    params: &LinkParams,
    vault: Address,
    recipient: Address,
    mode: WithdrawalMode,
) -> Result<ClaimAuthorization, ClaimError> {
    let version: ContractVersion = params.contract_version.parse()?;
    if !version.capabilities().scoped_withdrawal {
        return Err(ClaimError::UnsupportedContractVersion(
            params.contract_version.clone(),
        ));
    }

    let digest = packed_keccak256(&[
        PackedParam::Bytes32(WITHDRAWAL_SALT),
        PackedParam::Uint256(numeric_chain_id(params)?),
        PackedParam::Address(vault),
        PackedParam::Uint256(U256::from(params.deposit_index)),
        PackedParam::Address(recipient),
        PackedParam::Bytes32(mode.tag()),
    ]);
    let auth_hash = hash_message(digest.as_slice());

    let keys = derive_key_pair(&params.password)?;
    let signature = sign_prehash(&auth_hash, keys.private_key())?;

    debug!(deposit_index = params.deposit_index, ?mode, "authorized scoped claim");
    Ok(ClaimAuthorization {
        deposit_index: params.deposit_index,
        recipient,
        auth_hash,
        signature,
    })
}

/// Whether `auth` was signed by `expected`, normally the address derived
/// from the link password.
pub fn verify_claim(auth: &ClaimAuthorization, expected: Address) -> bool {
    recover_signer(&auth.auth_hash, &auth.signature)
        .map(|signer| signer == expected)
        .unwrap_or(false)
}

pub(crate) fn numeric_chain_id(params: &LinkParams) -> Result<U256, ClaimError> {
    params
        .chain_id
        .parse::<u64>()
        .map(U256::from)
        .map_err(|_| {
            ClaimError::Link(LinkError::MalformedLink {
                link: params.chain_id.clone(),
                reason: "chain id is not numeric".into(),
            })
        })
}
