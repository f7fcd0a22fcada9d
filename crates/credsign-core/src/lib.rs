//! # credsign core
//!
//! Pure primitives for issuing signed claim documents: canonical hashing,
//! proof signing, and the document model.
//!
//! This crate contains no I/O, no configuration loading, no logging. It is
//! pure computation over documents and keys.
//!
//! ## Key Types
//!
//! - [`ClaimDocument`] - The credential body, optionally carrying one proof
//! - [`ProofOptions`] - Proof metadata, hashed separately from the document
//! - [`ProofSigner`] - Signing interface, one implementation per scheme
//! - [`IssuerProfile`] - Fixed issuer metadata stamped into every document
//!
//! ## Signing input
//!
//! The signed message is `SHA-256(proof options) || SHA-256(document)`, each
//! digest taken over canonical JSON with the proof (respectively the proof
//! value) removed. See [`canonical`].

pub mod canonical;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod issuance;
pub mod types;
pub mod validation;

pub use canonical::{canonicalize, document_digest, hash, proof_digest, signing_input};
pub use credential::{
    attach_proof, build, ClaimDocument, CredentialBuilder, CredentialSubject, IssuerProfile,
    ProofOptions,
};
pub use crypto::{
    Ed25519Keypair, ProofSigner, PublicKey, Secp256k1Keypair, Sha256Hash, SignatureScheme,
};
pub use error::{CoreError, VerificationError};
pub use issuance::{issue_credential, sign, sign_document};
pub use types::{CredentialId, Timestamp};
pub use validation::{attributes_from_json, validate_subject, verify_credential, verify_json};
