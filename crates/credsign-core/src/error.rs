//! Error types for credsign core.

use thiserror::Error;

/// Errors that can occur while issuing a credential.
///
/// Messages never carry private key material or the raw signing input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or malformed issuer configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Caller-supplied subject data was rejected before hashing.
    #[error("validation error: {0}")]
    Validation(String),

    /// A value of unsupported shape reached the canonicalizer.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A proof was attached to a signed document, or an unsigned proof was attached.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The key does not decode to a valid private key for the scheme.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The underlying signature primitive failed.
    #[error("signing error: {0}")]
    Signing(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

/// Errors from re-checking the proof on a signed document.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("document carries no proof")]
    ProofMissing,

    #[error("proof type {found} does not match key scheme {expected}")]
    ProofTypeMismatch { expected: String, found: String },

    #[error("malformed proof value: {0}")]
    MalformedProofValue(String),

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("signature verification failed")]
    SignatureFailed,

    #[error("could not recompute digests: {0}")]
    Digest(#[from] CoreError),
}
