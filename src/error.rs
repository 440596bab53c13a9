use thiserror::Error;

use crate::state::CheckState;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("--url or CLUSTER_URL environment variable is required")]
    MissingUrl,

    #[error("--api-key or CLUSTER_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("trusted CA file {path}: {reason}")]
    CaBundle { path: String, reason: String },

    #[error("{query} query HTTP request failed: {source}")]
    Transport {
        query: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{query} query response parsing failed: {source}")]
    Parse {
        query: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to find Sensu backend version in version query response")]
    MissingBackendVersion,
}

impl CheckError {
    /// Status the check terminates with when this error aborts a run.
    pub fn state(&self) -> CheckState {
        match self {
            CheckError::MissingUrl | CheckError::MissingApiKey | CheckError::InvalidConfig(_) => {
                CheckState::Warning
            }
            CheckError::CaBundle { .. }
            | CheckError::Transport { .. }
            | CheckError::Parse { .. }
            | CheckError::MissingBackendVersion => CheckState::Critical,
        }
    }
}
