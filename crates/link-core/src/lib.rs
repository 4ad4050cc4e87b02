//! Claim links for token vault deposits.
//!
//! A sender deposits tokens into a vault and shares a link carrying the
//! chain, vault version, deposit index and a password. Whoever holds the
//! link derives a keypair from the password and signs a withdrawal for a
//! recipient of their choice, optionally bridging the funds to another chain
//! through the vault's router.
//!
//! Everything here is synchronous and performs no I/O of its own; receipts,
//! contract addresses and bridge quotes come from the traits in
//! [`registry`].

pub mod claim;
pub mod config;
pub mod create;
pub mod deposit;
pub mod error;
pub mod keys;
pub mod registry;
pub mod version;
pub mod xchain;

// ─── Link encoding ───────────────────────────────────────────────────

pub use link_codec::{
    combine_multilinks, create_multilink_from_links, create_multilink_from_links_strict, decode,
    decode_raw, encode, expand_multilink, is_shortened_link, shorten_multilink, LinkError,
    LinkParams, MultiLink, RawLinkParams, DEFAULT_BASE_URL,
};

// ─── Keys and claims ─────────────────────────────────────────────────

pub use claim::{
    authorize_claim, authorize_scoped_claim, verify_claim, ClaimAuthorization, WithdrawalMode,
};
pub use keys::{derive_key_pair, ClaimKeyPair};
pub use xchain::{
    build_routing_digest, verify_payload, CrossChainClaimBuilder, CrossChainClaimPayload,
};

// ─── Deposits ────────────────────────────────────────────────────────

pub use create::{generate_password, link_from_receipt, links_from_receipt};
pub use deposit::{extract_many, extract_one, fetch_deposit_indices};

// ─── Collaborators, configuration, errors ────────────────────────────

pub use config::LinkConfig;
pub use error::{ClaimError, CollaboratorError};
pub use registry::{
    RouteRequest, RoutingProvider, RoutingQuote, StaticVaultRegistry, TransactionReceiptSource,
    VaultAddressRegistry,
};
pub use version::{ContractRole, ContractVersion, VaultVersion};

/// Decodes `link` and authorizes its withdrawal to `recipient`.
pub fn authorize_link(
    link: &str,
    recipient: alloy_primitives::Address,
) -> Result<ClaimAuthorization, ClaimError> {
    authorize_claim(&decode(link)?, recipient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_send_and_sync() {
        assert_send_sync::<LinkParams>();
        assert_send_sync::<MultiLink>();
        assert_send_sync::<ClaimKeyPair>();
        assert_send_sync::<ClaimAuthorization>();
        assert_send_sync::<CrossChainClaimPayload>();
        assert_send_sync::<StaticVaultRegistry>();
        assert_send_sync::<ClaimError>();
    }

    #[test]
    fn authorize_link_decodes_first() {
        let recipient = Address::repeat_byte(0x42);
        let auth = authorize_link("https://peanut.to/claim?c=1&v=v4&i=9#p=pw", recipient).unwrap();
        assert_eq!(auth.deposit_index, 9);
        assert!(verify_claim(&auth, derive_key_pair("pw").unwrap().address()));

        assert!(matches!(
            authorize_link("https://peanut.to/claim?v=v4&i=9#p=pw", recipient),
            Err(ClaimError::Link(LinkError::MissingField { .. }))
        ));
    }
}
