use thiserror::Error;

/// Ethereum primitive errors.
#[derive(Debug, Error)]
pub enum EthError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("recovery error: {0}")]
    RecoveryError(String),
}
