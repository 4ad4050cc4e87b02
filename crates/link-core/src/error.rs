use link_codec::LinkError;
use thiserror::Error;

/// Boxed error returned by an external collaborator.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from claim authorization, cross-chain building and deposit
/// extraction.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("unsupported contract version: {0}")]
    UnsupportedContractVersion(String),

    #[error("deposit index not found: {0}")]
    IndexNotFound(String),

    #[error("deposit index {0} does not fit in 64 bits")]
    IndexOverflow(String),

    #[error("signature error: {0}")]
    Signature(String),

    #[error("no {version} contract registered on chain {chain_id}")]
    UnknownContract { chain_id: String, version: String },

    #[error("{passwords} passwords for {indices} deposits")]
    CountMismatch { passwords: usize, indices: usize },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("collaborator failed: {0}")]
    Collaborator(#[source] CollaboratorError),
}

impl From<chain_eth::EthError> for ClaimError {
    fn from(e: chain_eth::EthError) -> Self {
        ClaimError::Signature(e.to_string())
    }
}

impl From<serde_json::Error> for ClaimError {
    fn from(e: serde_json::Error) -> Self {
        ClaimError::Config(e.to_string())
    }
}
