//! Error types for the issuer service.

use std::path::PathBuf;

use credsign_core::{CoreError, VerificationError};
use thiserror::Error;

/// Errors that can occur while configuring or running an issuer.
#[derive(Debug, Error)]
pub enum IssuerError {
    /// Error from document building, hashing or signing.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Proof verification failed.
    #[error("verification failed: {0}")]
    Verification(#[from] VerificationError),

    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for an issuer config.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A batch worker panicked or was cancelled.
    #[error("issuance task failed: {0}")]
    Task(String),
}

impl IssuerError {
    /// True for any configuration problem, whether from the file layer or
    /// from profile validation.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ConfigRead { .. } | Self::ConfigParse { .. } | Self::Core(CoreError::Configuration(_))
        )
    }
}

/// Result type for issuer operations.
pub type Result<T> = std::result::Result<T, IssuerError>;
