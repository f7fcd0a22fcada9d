//! # credsign
//!
//! Issue signed verifiable credentials from subject data.
//!
//! ## Overview
//!
//! An [`Issuer`] holds an issuer profile and a signing key. Each call to
//! [`Issuer::issue`] builds a claim document, hashes the document and the
//! proof options separately, signs `proof_digest || document_digest`, and
//! returns the document with the proof embedded.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use credsign::{Issuer, IssuerConfig};
//!
//! fn example() -> credsign::Result<()> {
//!     let config = IssuerConfig::from_env()?;
//!     let issuer = Issuer::from_config(&config)?;
//!
//!     let doc = issuer.issue("did:example:holder1", [("nama", "Budi"), ("nim", "12345")])?;
//!     println!("{}", serde_json::to_string_pretty(&doc).unwrap());
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `credsign::core` - documents, canonical hashing, signers, verification

pub mod config;
pub mod error;
pub mod issuer;

pub use credsign_core as core;

pub use config::IssuerConfig;
pub use error::{IssuerError, Result};
pub use issuer::{IssueRequest, Issuer};

pub use credsign_core::{
    ClaimDocument, CoreError, CredentialId, IssuerProfile, ProofOptions, ProofSigner, PublicKey,
    SignatureScheme, Timestamp, VerificationError,
};
