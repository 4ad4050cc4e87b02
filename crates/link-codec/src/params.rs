use serde::{Deserialize, Serialize};

/// Claim page used when the caller does not supply one.
pub const DEFAULT_BASE_URL: &str = "https://peanut.to/claim";

pub(crate) const KEY_CHAIN: &str = "c";
pub(crate) const KEY_VERSION: &str = "v";
pub(crate) const KEY_INDEX: &str = "i";
pub(crate) const KEY_PASSWORD: &str = "p";
pub(crate) const KEY_TRACK: &str = "t";

/// Keys with a fixed meaning; everything else is carried through untouched.
pub(crate) const RESERVED_KEYS: [&str; 5] =
    [KEY_CHAIN, KEY_VERSION, KEY_INDEX, KEY_PASSWORD, KEY_TRACK];

/// The decoded contents of one claim link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkParams {
    /// Decimal chain id, canonical form (no leading zeros).
    pub chain_id: String,
    /// Vault version tag such as `v4.2`; empty when the link omits it.
    pub contract_version: String,
    pub deposit_index: u64,
    pub password: String,
    /// Attribution tag, empty when absent.
    pub track_id: String,
}

/// Link parameters as they appear in the URL, before any numeric
/// interpretation. `deposit_indices` may hold a plain index, a comma list or
/// compressed `(start,count)` groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLinkParams {
    pub chain_id: String,
    pub contract_version: String,
    pub deposit_indices: String,
    pub password: String,
    pub track_id: String,
}
