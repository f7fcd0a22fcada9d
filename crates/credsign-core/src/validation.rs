//! Input validation and proof verification.
//!
//! Subject data is checked before anything is hashed. Verification is the
//! mirror of issuance: recompute both digests from the visible fields and
//! check the embedded signature against the issuer key.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::canonical::{document_value_bytes, keys, proof_value_bytes, signing_input};
use crate::credential::{decode_proof_value, ClaimDocument};
use crate::crypto::{PublicKey, Sha256Hash};
use crate::error::{CoreError, VerificationError};

/// Subject attribute key reserved for the subject identifier.
pub const SUBJECT_ID_KEY: &str = "id";

/// Validate caller-supplied subject data.
///
/// The subject id must be non-empty. Attribute names must be non-empty,
/// unique, and must not shadow the subject `id`.
pub fn validate_subject(subject_id: &str, attributes: &[(String, String)]) -> Result<(), CoreError> {
    if subject_id.trim().is_empty() {
        return Err(CoreError::Validation("subject identifier is empty".into()));
    }

    let mut seen = BTreeSet::new();
    for (name, _) in attributes {
        if name.is_empty() {
            return Err(CoreError::Validation("attribute name is empty".into()));
        }
        if name == SUBJECT_ID_KEY {
            return Err(CoreError::Validation(
                "attribute name `id` is reserved for the subject identifier".into(),
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(CoreError::Validation(format!("duplicate attribute: {name}")));
        }
    }

    Ok(())
}

/// Convert a JSON object into string attributes.
///
/// Non-string values (numbers, nested objects, arrays, booleans, null) are
/// rejected.
pub fn attributes_from_json(value: &Value) -> Result<Vec<(String, String)>, CoreError> {
    let map = value
        .as_object()
        .ok_or_else(|| CoreError::Validation("attributes must be a JSON object".into()))?;

    map.iter()
        .map(|(name, v)| match v {
            Value::String(s) => Ok((name.clone(), s.clone())),
            other => Err(CoreError::Validation(format!(
                "attribute {name} must be a string, got {}",
                json_kind(other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Verify the proof on a signed document.
///
/// The document is serialized and checked with [`verify_json`].
pub fn verify_credential(doc: &ClaimDocument, public_key: &PublicKey) -> Result<(), VerificationError> {
    verify_json(&doc.to_json()?, public_key)
}

/// Verify the proof on a raw JSON document.
///
/// Digests are taken over the JSON as given, so fields outside the typed
/// document model are covered by the signature too.
///
/// This performs:
/// - Presence check of the proof and its signature value
/// - Proof type check against the key's scheme
/// - Digest recomputation (document without proof, proof without value)
/// - Signature verification over `proof_digest || document_digest`
pub fn verify_json(doc: &Value, public_key: &PublicKey) -> Result<(), VerificationError> {
    // 1. Proof must be present
    let proof = doc
        .get(keys::PROOF)
        .filter(|p| !p.is_null())
        .ok_or(VerificationError::ProofMissing)?;
    if !proof.is_object() {
        return Err(VerificationError::MalformedProofValue("proof is not an object".into()));
    }

    // 2. Proof type must match the key
    let expected = public_key.scheme.proof_type();
    let found = proof.get("type").and_then(Value::as_str).unwrap_or_default();
    if found != expected {
        return Err(VerificationError::ProofTypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        });
    }

    // 3. Decode signature
    let signature = decode_proof_value(proof.get(keys::PROOF_VALUE).and_then(Value::as_str))?;
    if signature.len() != public_key.scheme.signature_len() {
        return Err(VerificationError::MalformedProofValue(format!(
            "expected {} signature bytes, got {}",
            public_key.scheme.signature_len(),
            signature.len()
        )));
    }

    // 4. Recompute the signing input
    let doc_digest = Sha256Hash::hash(&document_value_bytes(doc)?);
    let options_digest = Sha256Hash::hash(&proof_value_bytes(proof)?);
    let message = signing_input(&options_digest, &doc_digest);

    // 5. Verify signature
    public_key.verify(&message, &signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuance::issue_credential;
    use crate::credential::IssuerProfile;
    use crate::crypto::{Ed25519Keypair, ProofSigner, SignatureScheme};
    use serde_json::json;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn make_signed() -> (ClaimDocument, PublicKey) {
        let profile = IssuerProfile::new("did:example:issuer123", "keys-1");
        let signer = Ed25519Keypair::from_seed(&[0x42; 32]);
        let doc = issue_credential(
            &profile,
            &signer,
            "did:example:holder1",
            attrs(&[("nama", "Budi"), ("nim", "12345")]),
        )
        .unwrap();
        (doc, signer.public_key())
    }

    #[test]
    fn test_validate_subject_ok() {
        assert!(validate_subject("did:example:holder1", &attrs(&[("nama", "Budi")])).is_ok());
        assert!(validate_subject("did:example:holder1", &[]).is_ok());
    }

    #[test]
    fn test_validate_subject_rejects() {
        assert!(matches!(
            validate_subject("", &[]),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            validate_subject("   ", &[]),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            validate_subject("did:x", &attrs(&[("", "v")])),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            validate_subject("did:x", &attrs(&[("id", "other")])),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            validate_subject("did:x", &attrs(&[("a", "1"), ("a", "2")])),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_attributes_from_json() {
        let parsed = attributes_from_json(&json!({"nama": "Budi", "nim": "12345"})).unwrap();
        assert_eq!(parsed, attrs(&[("nama", "Budi"), ("nim", "12345")]));
    }

    #[test]
    fn test_attributes_from_json_rejects_non_strings() {
        for bad in [json!({"nim": 12345}), json!({"x": {"y": "z"}}), json!({"x": null}), json!(["a"])] {
            assert!(matches!(attributes_from_json(&bad), Err(CoreError::Validation(_))));
        }
    }

    #[test]
    fn test_verify_valid_credential() {
        let (doc, pk) = make_signed();
        assert!(verify_credential(&doc, &pk).is_ok());
    }

    #[test]
    fn test_verify_rejects_unsigned() {
        let (doc, pk) = make_signed();
        assert!(matches!(
            verify_credential(&doc.without_proof(), &pk),
            Err(VerificationError::ProofMissing)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let (doc, _) = make_signed();
        let other = Ed25519Keypair::from_seed(&[0x43; 32]).public_key();
        assert!(matches!(
            verify_credential(&doc, &other),
            Err(VerificationError::SignatureFailed)
        ));
    }

    #[test]
    fn test_verify_rejects_scheme_mismatch() {
        let (doc, _) = make_signed();
        let secp = SignatureScheme::Secp256k1.generate().public_key();
        assert!(matches!(
            verify_credential(&doc, &secp),
            Err(VerificationError::ProofTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_verify_rejects_tampered_subject() {
        let (doc, pk) = make_signed();
        let mut json = doc.to_json().unwrap();
        json["credentialSubject"]["nama"] = json!("Budy");
        let tampered: ClaimDocument = serde_json::from_value(json).unwrap();

        assert!(matches!(
            verify_credential(&tampered, &pk),
            Err(VerificationError::SignatureFailed)
        ));
    }

    #[test]
    fn test_verify_rejects_tampered_proof_options() {
        let (doc, pk) = make_signed();
        let mut json = doc.to_json().unwrap();
        json["proof"]["created"] = json!("2000-01-01T00:00:00Z");
        let tampered: ClaimDocument = serde_json::from_value(json).unwrap();

        assert!(matches!(
            verify_credential(&tampered, &pk),
            Err(VerificationError::SignatureFailed)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_proof_value() {
        let (doc, pk) = make_signed();
        let mut json = doc.to_json().unwrap();
        json["proof"]["proofValue"] = json!("!!!not base64!!!");
        let tampered: ClaimDocument = serde_json::from_value(json).unwrap();

        assert!(matches!(
            verify_credential(&tampered, &pk),
            Err(VerificationError::MalformedProofValue(_))
        ));
    }

    #[test]
    fn test_verify_json_accepts_issued_document() {
        let (doc, pk) = make_signed();
        assert!(verify_json(&doc.to_json().unwrap(), &pk).is_ok());
    }

    #[test]
    fn test_verify_json_rejects_added_top_level_field() {
        let (doc, pk) = make_signed();
        let mut json = doc.to_json().unwrap();
        json["expirationDate"] = json!("2030-01-01T00:00:00Z");

        assert!(serde_json::from_value::<ClaimDocument>(json.clone()).is_err());
        assert!(matches!(
            verify_json(&json, &pk),
            Err(VerificationError::SignatureFailed)
        ));
    }

    #[test]
    fn test_verify_json_rejects_added_proof_field() {
        let (doc, pk) = make_signed();
        let mut json = doc.to_json().unwrap();
        json["proof"]["domain"] = json!("example.org");

        assert!(serde_json::from_value::<ClaimDocument>(json.clone()).is_err());
        assert!(matches!(
            verify_json(&json, &pk),
            Err(VerificationError::SignatureFailed)
        ));
    }

    #[test]
    fn test_verify_json_rejects_missing_or_malformed_proof() {
        let (doc, pk) = make_signed();
        let mut json = doc.to_json().unwrap();

        json["proof"] = json!("not an object");
        assert!(matches!(
            verify_json(&json, &pk),
            Err(VerificationError::MalformedProofValue(_))
        ));

        json.as_object_mut().unwrap().remove("proof");
        assert!(matches!(
            verify_json(&json, &pk),
            Err(VerificationError::ProofMissing)
        ));
    }
}
