//! Golden test vectors for deterministic verification.
//!
//! Each vector pins the canonical document bytes an issuer must produce for
//! fixed inputs. Signatures are checked by verification rather than by value.

use credsign_core::canonical::{document_bytes, proof_bytes};
use credsign_core::{
    sign_document, verify_credential, ClaimDocument, CredentialBuilder, CredentialId,
    SignatureScheme, Timestamp,
};
use serde::Serialize;

use crate::fixtures::{signer_from_seed, test_profile};

/// A golden test vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Signature scheme.
    pub scheme: SignatureScheme,
    /// Seed for deterministic key generation.
    pub seed: [u8; 32],
    /// Subject identifier.
    pub subject_id: &'static str,
    /// Subject attributes, in caller order.
    pub attributes: &'static [(&'static str, &'static str)],
    /// Credential id bytes.
    pub id: [u8; 16],
    /// Issuance time, unix seconds.
    pub issued_at: i64,
    /// Expected canonical document bytes (UTF-8).
    pub expected_document: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "student credential",
            scheme: SignatureScheme::Secp256k1,
            seed: [0x42; 32],
            subject_id: "did:example:holder1",
            attributes: &[("nim", "12345"), ("nama", "Budi")],
            id: [0x11; 16],
            issued_at: 1736870400, // 2025-01-14T16:00:00Z
            expected_document: concat!(
                r#"{"@context":["https://www.w3.org/2018/credentials/v1"],"#,
                r#""credentialSubject":{"id":"did:example:holder1","nama":"Budi","nim":"12345"},"#,
                r#""id":"urn:uuid:11111111-1111-1111-1111-111111111111","#,
                r#""issuanceDate":"2025-01-14T16:00:00Z","#,
                r#""issuer":"did:example:issuer123","#,
                r#""type":["VerifiableCredential","UniversityDegreeCredential"]}"#
            ),
        },
        GoldenVector {
            name: "subject without attributes",
            scheme: SignatureScheme::Ed25519,
            seed: [0x00; 32],
            subject_id: "did:example:holder2",
            attributes: &[],
            id: [0x00; 16],
            issued_at: 0,
            expected_document: concat!(
                r#"{"@context":["https://www.w3.org/2018/credentials/v1"],"#,
                r#""credentialSubject":{"id":"did:example:holder2"},"#,
                r#""id":"urn:uuid:00000000-0000-0000-0000-000000000000","#,
                r#""issuanceDate":"1970-01-01T00:00:00Z","#,
                r#""issuer":"did:example:issuer123","#,
                r#""type":["VerifiableCredential","UniversityDegreeCredential"]}"#
            ),
        },
        GoldenVector {
            name: "escaped attribute values",
            scheme: SignatureScheme::Ed25519,
            seed: [0x07; 32],
            subject_id: "did:example:holder3",
            attributes: &[("nama", "Zoë"), ("catatan", "baris1\nbaris2 \"lulus\"\t\\")],
            id: [0xab; 16],
            issued_at: 1907742600, // 2030-06-15T08:30:00Z
            expected_document: concat!(
                r#"{"@context":["https://www.w3.org/2018/credentials/v1"],"#,
                r#""credentialSubject":{"catatan":"baris1\nbaris2 \"lulus\"\t\\","id":"did:example:holder3","nama":"Zo\u00eb"},"#,
                r#""id":"urn:uuid:abababab-abab-abab-abab-abababababab","#,
                r#""issuanceDate":"2030-06-15T08:30:00Z","#,
                r#""issuer":"did:example:issuer123","#,
                r#""type":["VerifiableCredential","UniversityDegreeCredential"]}"#
            ),
        },
    ]
}

/// Build the unsigned draft for a vector.
pub fn draft_from_vector(vector: &GoldenVector) -> ClaimDocument {
    let issued_at = Timestamp::from_unix_secs(vector.issued_at).expect("vector time in range");
    CredentialBuilder::new(&test_profile(), vector.subject_id)
        .id(CredentialId::from_bytes(vector.id))
        .issued_at(issued_at)
        .attributes(vector.attributes.iter().copied())
        .build()
        .expect("vector inputs are valid")
}

/// Build and sign the document for a vector.
pub fn sign_vector(vector: &GoldenVector) -> ClaimDocument {
    let signer = signer_from_seed(vector.scheme, vector.seed).expect("vector seed is valid");
    sign_document(&draft_from_vector(vector), &test_profile(), signer.as_ref())
        .expect("vector signs")
}

/// Check every vector: document bytes match and the signature verifies.
///
/// Returns `(name, passed, document_bytes)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let signed = sign_vector(v);
            let bytes = document_bytes(&signed)
                .ok()
                .and_then(|b| String::from_utf8(b).ok())
                .unwrap_or_default();

            let signer = signer_from_seed(v.scheme, v.seed).expect("vector seed is valid");
            let passed =
                bytes == v.expected_document && verify_credential(&signed, &signer.public_key()).is_ok();

            (v.name.to_string(), passed, bytes)
        })
        .collect()
}

/// Vectors with their derived proof bytes, as pretty JSON.
pub fn vectors_json() -> serde_json::Value {
    let entries: Vec<_> = all_vectors()
        .iter()
        .map(|v| {
            let signed = sign_vector(v);
            let proof = signed.proof().expect("signed");
            serde_json::json!({
                "vector": v,
                "proof_bytes": String::from_utf8(proof_bytes(proof).unwrap_or_default()).unwrap_or_default(),
                "proof_value": proof.proof_value,
                "public_key": signer_from_seed(v.scheme, v.seed).expect("vector seed is valid").public_key().to_hex(),
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}
