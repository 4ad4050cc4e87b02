//! Cross-chain claims.
//!
//! A cross-chain claim withdraws a deposit to the version's router contract,
//! which then calls a bridge to deliver the funds on another chain. Two
//! signatures from the link keypair are needed: the usual withdrawal
//! authorization with the router as recipient, and a routing signature over
//! the bridge call so the router cannot be pointed elsewhere.

use alloy_primitives::{Address, Bytes, B256, U256};
use chain_eth::abi::{packed_keccak256, PackedParam};
use chain_eth::signing::{recover_signer, sign_prehash, RecoverableSignature};
use link_codec::LinkParams;
use serde::Serialize;
use tracing::debug;

use crate::claim::{authorize_with_keys, numeric_chain_id, serialize_signature, ClaimAuthorization};
use crate::error::ClaimError;
use crate::keys::derive_key_pair;
use crate::registry::{RouteRequest, RoutingProvider, RoutingQuote, VaultAddressRegistry};
use crate::version::ContractVersion;

/// EIP-191 version `0x00` tag: data with an intended validator.
const ROUTING_TAG: [u8; 2] = [0x19, 0x00];

/// Fee the protocol charges on bridged claims.
pub const PROTOCOL_FEE: U256 = U256::ZERO;

/// Everything the router needs to claim a deposit and bridge it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainClaimPayload {
    /// Withdrawal authorization naming the router as recipient.
    pub withdrawal: ClaimAuthorization,
    pub chain_id: String,
    /// Router version tag, e.g. `Rv4.2`.
    pub contract_version: String,
    pub vault_address: Address,
    pub router_address: Address,
    /// Final recipient on the destination chain.
    pub recipient: Address,
    pub destination_chain_id: String,
    pub bridge_target: Address,
    pub bridge_calldata: Bytes,
    pub bridge_value: U256,
    pub protocol_fee: U256,
    pub routing_digest: B256,
    #[serde(serialize_with = "serialize_signature")]
    pub routing_signature: RecoverableSignature,
}

/// Digest the router checks before forwarding a claim to the bridge:
///
/// `keccak256(0x1900 ‖ router ‖ chainId ‖ vault ‖ depositIndex ‖
/// bridgeTarget ‖ bridgeValue ‖ protocolFee ‖ calldata)`
pub fn build_routing_digest(
    router: Address,
    chain_id: U256,
    vault: Address,
    deposit_index: u64,
    bridge_target: Address,
    bridge_value: U256,
    calldata: &[u8],
) -> B256 {
    packed_keccak256(&[
        PackedParam::Bytes2(ROUTING_TAG),
        PackedParam::Address(router),
        PackedParam::Uint256(chain_id),
        PackedParam::Address(vault),
        PackedParam::Uint256(U256::from(deposit_index)),
        PackedParam::Address(bridge_target),
        PackedParam::Uint256(bridge_value),
        PackedParam::Uint256(PROTOCOL_FEE),
        PackedParam::Bytes(calldata),
    ])
}

/// Builds cross-chain claim payloads against a registry of deployed
/// vaults and routers.
pub struct CrossChainClaimBuilder<'a, R: VaultAddressRegistry + ?Sized> {
    registry: &'a R,
}

impl<'a, R: VaultAddressRegistry + ?Sized> CrossChainClaimBuilder<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// Builds the payload for claiming `params` to `recipient` on
    /// `destination_chain_id` along `quote`.
    ///
    /// The link's version is checked before anything is resolved or signed.
    ///
    /// The withdrawal is signed with the plain [`authorize_claim`] scheme,
    /// naming the router as recipient. Deployed v4.2 routers instead check
    /// the salted recipient-only scope of
    /// [`authorize_scoped_claim`](crate::claim::authorize_scoped_claim), so
    /// this payload does not verify against those contracts as is.
    ///
    /// [`authorize_claim`]: crate::claim::authorize_claim
    pub fn build(
        &self,
        params: &LinkParams,
        recipient: Address,
        destination_chain_id: &str,
        quote: &RoutingQuote,
    ) -> Result<CrossChainClaimPayload, ClaimError> {
        let version = supported_version(params)?;
        let chain_id = numeric_chain_id(params)?;
        let vault = self.resolve(&params.chain_id, version)?;
        let router_version = version.router();
        let router = self.resolve(&params.chain_id, router_version)?;

        let keys = derive_key_pair(&params.password)?;
        let withdrawal = authorize_with_keys(&keys, params.deposit_index, router)?;

        let routing_digest = build_routing_digest(
            router,
            chain_id,
            vault,
            params.deposit_index,
            quote.target_address,
            quote.value,
            &quote.calldata,
        );
        let routing_signature = sign_prehash(&routing_digest, keys.private_key())?;

        debug!(
            chain_id = %params.chain_id,
            destination_chain_id,
            deposit_index = params.deposit_index,
            %router,
            "built cross-chain claim"
        );
        Ok(CrossChainClaimPayload {
            withdrawal,
            chain_id: params.chain_id.clone(),
            contract_version: router_version.to_string(),
            vault_address: vault,
            router_address: router,
            recipient,
            destination_chain_id: destination_chain_id.to_owned(),
            bridge_target: quote.target_address,
            bridge_calldata: quote.calldata.clone(),
            bridge_value: quote.value,
            protocol_fee: PROTOCOL_FEE,
            routing_digest,
            routing_signature,
        })
    }

    /// Like [`build`](Self::build), asking `provider` for the route.
    ///
    /// The provider is not called for links whose version cannot bridge.
    pub fn build_with_provider<P: RoutingProvider + ?Sized>(
        &self,
        params: &LinkParams,
        recipient: Address,
        destination_chain_id: &str,
        provider: &P,
    ) -> Result<CrossChainClaimPayload, ClaimError> {
        supported_version(params)?;

        let request = RouteRequest {
            source_chain_id: params.chain_id.clone(),
            destination_chain_id: destination_chain_id.to_owned(),
            recipient,
            deposit_index: params.deposit_index,
        };
        let quote = provider.quote(&request).map_err(ClaimError::Collaborator)?;
        self.build(params, recipient, destination_chain_id, &quote)
    }

    fn resolve(&self, chain_id: &str, version: ContractVersion) -> Result<Address, ClaimError> {
        self.registry
            .resolve(chain_id, &version)
            .ok_or_else(|| ClaimError::UnknownContract {
                chain_id: chain_id.to_owned(),
                version: version.to_string(),
            })
    }
}

fn supported_version(params: &LinkParams) -> Result<ContractVersion, ClaimError> {
    let unsupported = || ClaimError::UnsupportedContractVersion(params.contract_version.clone());

    let version = params
        .contract_version
        .parse::<ContractVersion>()
        .map_err(|_| unsupported())?
        .as_vault();
    if !version.capabilities().cross_chain {
        return Err(unsupported());
    }
    Ok(version)
}

/// Whether both signatures of `payload` come from `expected`.
pub fn verify_payload(payload: &CrossChainClaimPayload, expected: Address) -> bool {
    let routing_ok = recover_signer(&payload.routing_digest, &payload.routing_signature)
        .map(|signer| signer == expected)
        .unwrap_or(false);
    routing_ok && crate::claim::verify_claim(&payload.withdrawal, expected)
}
