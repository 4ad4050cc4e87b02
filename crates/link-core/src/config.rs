use link_codec::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

use crate::error::ClaimError;

/// Settings for link creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkConfig {
    /// Claim page the generated links point at.
    pub claim_base_url: String,
    /// Length of generated link passwords.
    pub password_length: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            claim_base_url: DEFAULT_BASE_URL.to_owned(),
            password_length: 16,
        }
    }
}

impl LinkConfig {
    pub fn from_json(json: &str) -> Result<Self, ClaimError> {
        let config: Self = serde_json::from_str(json)?;
        if config.password_length == 0 {
            return Err(ClaimError::Config("passwordLength must be positive".into()));
        }
        Ok(config)
    }
}
