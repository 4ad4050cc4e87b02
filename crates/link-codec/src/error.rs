use thiserror::Error;

/// Link encoding errors. All of them are deterministic in the input link, so
/// none is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("malformed link '{link}': {reason}")]
    MalformedLink { link: String, reason: String },

    #[error("link '{link}' is missing required parameter '{field}'")]
    MissingField { link: String, field: &'static str },

    #[error("link '{link}' has {actual} chain ids, expected 1 or {expected}")]
    CardinalityMismatch {
        link: String,
        expected: usize,
        actual: usize,
    },

    #[error("no links provided")]
    EmptyInput,

    #[error("link '{link}' has a different '{field}' than the first link")]
    InconsistentLinks { link: String, field: &'static str },
}

impl LinkError {
    pub(crate) fn malformed(link: &str, reason: impl Into<String>) -> Self {
        LinkError::MalformedLink {
            link: link.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(link: &str, field: &'static str) -> Self {
        LinkError::MissingField {
            link: link.to_owned(),
            field,
        }
    }
}
