//! # credsign testkit
//!
//! Testing utilities for credsign.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: fixed inputs with their expected canonical bytes
//! - **Generators**: proptest strategies for subjects, attributes and drafts
//! - **Fixtures**: seeded issuers and a call-counting signer
//!
//! ## Golden Vectors
//!
//! ```rust
//! use credsign_testkit::vectors::{all_vectors, sign_vector};
//!
//! for vector in all_vectors() {
//!     let signed = sign_vector(&vector);
//!     println!("{}: {}", vector.name, signed.id());
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use credsign_testkit::generators::{draft_from_params, CredentialParams};
//!
//! proptest! {
//!     #[test]
//!     fn document_bytes_are_stable(params: CredentialParams) {
//!         let a = draft_from_params(&params);
//!         let b = draft_from_params(&params);
//!         prop_assert_eq!(a, b);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use credsign_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let doc = fixture.issue_student("Budi", "12345");
//! assert!(fixture.issuer.verify(&doc).is_ok());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_issuer_fixtures, CountingSigner, TestFixture};
pub use generators::{draft_from_params, CredentialParams};
pub use vectors::{all_vectors, draft_from_vector, sign_vector, verify_all_vectors, GoldenVector};
