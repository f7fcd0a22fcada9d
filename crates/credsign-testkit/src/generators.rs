//! Proptest generators for property-based testing.

use std::sync::Arc;

use proptest::prelude::*;

use credsign_core::{
    ClaimDocument, CredentialBuilder, CredentialId, ProofSigner, SignatureScheme, Timestamp,
};

use crate::fixtures::{signer_from_seed, test_profile};

/// Generate a signature scheme.
pub fn scheme() -> impl Strategy<Value = SignatureScheme> {
    prop_oneof![Just(SignatureScheme::Secp256k1), Just(SignatureScheme::Ed25519)]
}

/// Generate a scheme and a seed that is a valid key for it.
pub fn signer_key() -> impl Strategy<Value = (SignatureScheme, [u8; 32])> {
    (scheme(), any::<[u8; 32]>()).prop_filter("seed is not a valid key", |(scheme, seed)| {
        signer_from_seed(*scheme, *seed).is_ok()
    })
}

/// Build the signer for a generated key.
pub fn signer_for(key: (SignatureScheme, [u8; 32])) -> Arc<dyn ProofSigner> {
    signer_from_seed(key.0, key.1).expect("generated key is valid")
}

/// Generate a random CredentialId.
pub fn credential_id() -> impl Strategy<Value = CredentialId> {
    any::<[u8; 16]>().prop_map(CredentialId::from_bytes)
}

/// Generate a timestamp between 1970 and 2100.
pub fn timestamp() -> impl Strategy<Value = Timestamp> {
    (0i64..=4_102_444_800i64).prop_filter_map("out of range", Timestamp::from_unix_secs)
}

/// Generate a DID-shaped subject identifier.
pub fn subject_id() -> impl Strategy<Value = String> {
    "did:[a-z]{3,8}:[A-Za-z0-9._-]{1,32}".prop_map(String::from)
}

/// Generate an attribute name other than the reserved `id`.
pub fn attribute_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,15}".prop_filter("id is reserved", |name| name != "id")
}

/// Generate an attribute value, including non-ASCII and control characters.
pub fn attribute_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,24}".prop_map(String::from),
        "\\PC{0,24}".prop_map(String::from),
        any::<String>(),
    ]
}

/// Generate a set of attributes with unique names.
pub fn attributes(max_len: usize) -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map(attribute_name(), attribute_value(), 0..=max_len)
        .prop_map(|m| m.into_iter().collect())
}

/// Parameters for generating an unsigned draft.
#[derive(Debug, Clone)]
pub struct CredentialParams {
    pub id: CredentialId,
    pub issued_at: Timestamp,
    pub subject_id: String,
    pub attributes: Vec<(String, String)>,
}

impl Arbitrary for CredentialParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (credential_id(), timestamp(), subject_id(), attributes(8))
            .prop_map(|(id, issued_at, subject_id, attributes)| CredentialParams {
                id,
                issued_at,
                subject_id,
                attributes,
            })
            .boxed()
    }
}

/// Build the unsigned draft described by the parameters.
pub fn draft_from_params(params: &CredentialParams) -> ClaimDocument {
    CredentialBuilder::new(&test_profile(), params.subject_id.clone())
        .id(params.id)
        .issued_at(params.issued_at)
        .attributes(params.attributes.iter().cloned())
        .build()
        .expect("generated params are valid")
}
