//! Claim documents: the credential body and its detached proof.
//!
//! A document is built once without a proof, hashed, signed, and then gets
//! exactly one proof attached. A signed document is never edited; signing
//! again means building a new document.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::crypto::SignatureScheme;
use crate::error::{CoreError, VerificationError};
use crate::types::{CredentialId, Timestamp};
use crate::validation::validate_subject;

/// W3C credentials context, the default `@context` entry.
pub const VC_CONTEXT_V1: &str = "https://www.w3.org/2018/credentials/v1";

/// Generic type tag carried by every credential.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// Default domain-specific type tag.
pub const DEFAULT_CREDENTIAL_TYPE: &str = "UniversityDegreeCredential";

/// Proof purpose for issuer assertions.
pub const ASSERTION_METHOD: &str = "assertionMethod";

/// Fixed issuer metadata stamped into every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerProfile {
    /// Opaque issuer identifier (usually a DID).
    pub issuer: String,
    /// Fragment naming the signing key under the issuer identifier.
    pub key_fragment: String,
    /// `@context` entries, in order.
    pub context: Vec<String>,
    /// Domain-specific type tag, placed after `VerifiableCredential`.
    pub credential_type: String,
}

impl IssuerProfile {
    /// Create a profile with the default context and credential type.
    pub fn new(issuer: impl Into<String>, key_fragment: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            key_fragment: key_fragment.into(),
            context: vec![VC_CONTEXT_V1.to_string()],
            credential_type: DEFAULT_CREDENTIAL_TYPE.to_string(),
        }
    }

    /// Replace the `@context` entries.
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }

    /// Replace the domain-specific type tag.
    pub fn with_credential_type(mut self, credential_type: impl Into<String>) -> Self {
        self.credential_type = credential_type.into();
        self
    }

    /// The verification method reference: `<issuer>#<fragment>`.
    pub fn verification_method(&self) -> String {
        format!("{}#{}", self.issuer, self.key_fragment)
    }

    /// Check that every required field is set.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.issuer.trim().is_empty() {
            return Err(CoreError::Configuration("issuer identifier is not set".into()));
        }
        if self.key_fragment.trim().is_empty() {
            return Err(CoreError::Configuration(
                "verification method fragment is not set".into(),
            ));
        }
        if self.context.is_empty() {
            return Err(CoreError::Configuration("at least one @context entry is required".into()));
        }
        if self.credential_type.trim().is_empty() {
            return Err(CoreError::Configuration("credential type is not set".into()));
        }
        Ok(())
    }
}

/// The subject block: the subject identifier plus string attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSubject {
    pub id: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

/// Metadata describing how and when the document was signed.
///
/// Hashed separately from the document, always without `proofValue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProofOptions {
    #[serde(rename = "type")]
    pub proof_type: String,

    pub created: Timestamp,

    #[serde(rename = "verificationMethod")]
    pub verification_method: String,

    #[serde(rename = "proofPurpose")]
    pub proof_purpose: String,

    /// Base64 signature bytes. Absent until signing.
    #[serde(rename = "proofValue", default, skip_serializing_if = "Option::is_none")]
    pub proof_value: Option<String>,
}

impl ProofOptions {
    /// Create unsigned assertion proof options.
    pub fn new(
        scheme: SignatureScheme,
        created: Timestamp,
        verification_method: impl Into<String>,
    ) -> Self {
        Self {
            proof_type: scheme.proof_type().to_string(),
            created,
            verification_method: verification_method.into(),
            proof_purpose: ASSERTION_METHOD.to_string(),
            proof_value: None,
        }
    }

    /// Return a copy carrying the base64 encoding of `signature`.
    pub fn with_signature(&self, signature: &[u8]) -> Self {
        Self {
            proof_value: Some(BASE64.encode(signature)),
            ..self.clone()
        }
    }

    /// Whether a signature value is present.
    pub fn is_signed(&self) -> bool {
        self.proof_value.is_some()
    }

    /// Return a copy with the signature value removed.
    pub fn without_signature(&self) -> Self {
        Self {
            proof_value: None,
            ..self.clone()
        }
    }

    /// Decode the signature bytes.
    pub fn signature_bytes(&self) -> Result<Vec<u8>, VerificationError> {
        decode_proof_value(self.proof_value.as_deref())
    }
}

/// Decode a base64 `proofValue`, failing if it is absent.
pub(crate) fn decode_proof_value(value: Option<&str>) -> Result<Vec<u8>, VerificationError> {
    let value =
        value.ok_or_else(|| VerificationError::MalformedProofValue("proofValue is absent".into()))?;
    BASE64
        .decode(value)
        .map_err(|e| VerificationError::MalformedProofValue(format!("invalid base64: {e}")))
}

/// A claim document, signed or not.
///
/// Fields are read-only from outside this module; the only transition is
/// [`attach_proof`], which returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClaimDocument {
    #[serde(rename = "@context")]
    context: Vec<String>,

    id: CredentialId,

    #[serde(rename = "type")]
    types: Vec<String>,

    issuer: String,

    #[serde(rename = "issuanceDate")]
    issuance_date: Timestamp,

    #[serde(rename = "credentialSubject")]
    credential_subject: CredentialSubject,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    proof: Option<ProofOptions>,
}

impl ClaimDocument {
    /// Get the `@context` entries.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Get the document ID.
    pub fn id(&self) -> &CredentialId {
        &self.id
    }

    /// Get the type tags.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Get the issuer identifier.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Get the issuance timestamp.
    pub fn issuance_date(&self) -> Timestamp {
        self.issuance_date
    }

    /// Get the subject block.
    pub fn credential_subject(&self) -> &CredentialSubject {
        &self.credential_subject
    }

    /// Get the proof, if signed.
    pub fn proof(&self) -> Option<&ProofOptions> {
        self.proof.as_ref()
    }

    /// Check if a proof is attached.
    pub fn is_signed(&self) -> bool {
        self.proof.is_some()
    }

    /// Return a copy without the proof.
    pub fn without_proof(&self) -> Self {
        Self {
            proof: None,
            ..self.clone()
        }
    }

    /// Serialize to a JSON value.
    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Attach a signed proof to an unsigned document.
///
/// Fails with `InvariantViolation` if the document is already signed or the
/// proof carries no signature value. The input document is left untouched.
pub fn attach_proof(doc: &ClaimDocument, proof: ProofOptions) -> Result<ClaimDocument, CoreError> {
    if doc.proof.is_some() {
        return Err(CoreError::InvariantViolation(format!(
            "document {} already carries a proof",
            doc.id
        )));
    }
    if !proof.is_signed() {
        return Err(CoreError::InvariantViolation(
            "proof has no signature value".into(),
        ));
    }
    Ok(ClaimDocument {
        proof: Some(proof),
        ..doc.clone()
    })
}

/// Build an unsigned document with a fresh id and the current time.
pub fn build<K, V>(
    profile: &IssuerProfile,
    subject_id: &str,
    attributes: impl IntoIterator<Item = (K, V)>,
) -> Result<ClaimDocument, CoreError>
where
    K: Into<String>,
    V: Into<String>,
{
    CredentialBuilder::new(profile, subject_id)
        .attributes(attributes)
        .build()
}

/// Builder for unsigned claim documents.
pub struct CredentialBuilder<'a> {
    profile: &'a IssuerProfile,
    subject_id: String,
    attributes: Vec<(String, String)>,
    id: Option<CredentialId>,
    issued_at: Option<Timestamp>,
}

impl<'a> CredentialBuilder<'a> {
    /// Start building a document for `subject_id`.
    pub fn new(profile: &'a IssuerProfile, subject_id: impl Into<String>) -> Self {
        Self {
            profile,
            subject_id: subject_id.into(),
            attributes: Vec::new(),
            id: None,
            issued_at: None,
        }
    }

    /// Add one attribute.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add several attributes.
    pub fn attributes<K, V>(mut self, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Use a fixed document ID instead of a random one.
    pub fn id(mut self, id: CredentialId) -> Self {
        self.id = Some(id);
        self
    }

    /// Use a fixed issuance time instead of the current time.
    pub fn issued_at(mut self, ts: Timestamp) -> Self {
        self.issued_at = Some(ts);
        self
    }

    /// Validate inputs and build the unsigned document.
    pub fn build(self) -> Result<ClaimDocument, CoreError> {
        self.profile.validate()?;
        validate_subject(&self.subject_id, &self.attributes)?;

        let mut types = Vec::with_capacity(2);
        types.push(VERIFIABLE_CREDENTIAL_TYPE.to_string());
        types.push(self.profile.credential_type.clone());

        Ok(ClaimDocument {
            context: self.profile.context.clone(),
            id: self.id.unwrap_or_else(CredentialId::generate),
            types,
            issuer: self.profile.issuer.clone(),
            issuance_date: self.issued_at.unwrap_or_else(Timestamp::now),
            credential_subject: CredentialSubject {
                id: self.subject_id,
                attributes: self.attributes.into_iter().collect(),
            },
            proof: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> IssuerProfile {
        IssuerProfile::new("did:example:issuer123", "keys-1")
    }

    fn fixed_ts() -> Timestamp {
        Timestamp::from_unix_secs(1736870400).unwrap()
    }

    fn signed_proof() -> ProofOptions {
        ProofOptions::new(SignatureScheme::Secp256k1, fixed_ts(), "did:example:issuer123#keys-1")
            .with_signature(&[0xab; 64])
    }

    #[test]
    fn test_build_populates_fixed_fields() {
        let doc = build(&profile(), "did:example:holder1", [("nama", "Budi"), ("nim", "12345")])
            .unwrap();

        assert_eq!(doc.context(), [VC_CONTEXT_V1.to_string()]);
        assert_eq!(doc.types(), ["VerifiableCredential", "UniversityDegreeCredential"]);
        assert_eq!(doc.issuer(), "did:example:issuer123");
        assert_eq!(doc.credential_subject().id, "did:example:holder1");
        assert_eq!(doc.credential_subject().attributes["nama"], "Budi");
        assert!(!doc.is_signed());
    }

    #[test]
    fn test_build_assigns_fresh_ids() {
        let a = build(&profile(), "did:example:holder1", Vec::<(String, String)>::new()).unwrap();
        let b = build(&profile(), "did:example:holder1", Vec::<(String, String)>::new()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_build_rejects_unset_issuer() {
        let result = build(&IssuerProfile::new("", "keys-1"), "did:example:holder1", [("a", "b")]);
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_build_rejects_empty_subject() {
        let result = build(&profile(), "", [("a", "b")]);
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_builder_fixed_id_and_time() {
        let id = CredentialId::from_bytes([0x11; 16]);
        let doc = CredentialBuilder::new(&profile(), "did:example:holder1")
            .id(id)
            .issued_at(fixed_ts())
            .attribute("nama", "Budi")
            .build()
            .unwrap();
        assert_eq!(*doc.id(), id);
        assert_eq!(doc.issuance_date(), fixed_ts());
    }

    #[test]
    fn test_attach_proof() {
        let doc = build(&profile(), "did:example:holder1", [("nama", "Budi")]).unwrap();
        let signed = attach_proof(&doc, signed_proof()).unwrap();

        assert!(signed.is_signed());
        assert!(!doc.is_signed(), "input draft must be left untouched");
        assert_eq!(signed.without_proof(), doc);
    }

    #[test]
    fn test_attach_proof_rejects_signed_document() {
        let doc = build(&profile(), "did:example:holder1", [("nama", "Budi")]).unwrap();
        let signed = attach_proof(&doc, signed_proof()).unwrap();
        let result = attach_proof(&signed, signed_proof());
        assert!(matches!(result, Err(CoreError::InvariantViolation(_))));
    }

    #[test]
    fn test_attach_proof_rejects_unsigned_proof() {
        let doc = build(&profile(), "did:example:holder1", [("nama", "Budi")]).unwrap();
        let unsigned = signed_proof().without_signature();
        let result = attach_proof(&doc, unsigned);
        assert!(matches!(result, Err(CoreError::InvariantViolation(_))));
    }

    #[test]
    fn test_wire_field_names() {
        let doc = CredentialBuilder::new(&profile(), "did:example:holder1")
            .id(CredentialId::from_bytes([0x11; 16]))
            .issued_at(fixed_ts())
            .attribute("nim", "12345")
            .build()
            .unwrap();
        let signed = attach_proof(&doc, signed_proof()).unwrap();
        let json = signed.to_json().unwrap();

        assert_eq!(json["@context"][0], VC_CONTEXT_V1);
        assert_eq!(json["id"], "urn:uuid:11111111-1111-1111-1111-111111111111");
        assert_eq!(json["issuanceDate"], "2025-01-14T16:00:00Z");
        assert_eq!(json["credentialSubject"]["nim"], "12345");
        assert_eq!(json["proof"]["proofPurpose"], "assertionMethod");
        assert_eq!(json["proof"]["type"], "EcdsaSecp256k1Signature2019");
        assert!(json["proof"]["proofValue"].is_string());
    }

    #[test]
    fn test_unsigned_document_omits_proof_key() {
        let doc = build(&profile(), "did:example:holder1", [("nama", "Budi")]).unwrap();
        let json = doc.to_json().unwrap();
        assert!(json.get("proof").is_none());
    }

    #[test]
    fn test_signature_bytes_roundtrip() {
        let proof = signed_proof();
        assert_eq!(proof.signature_bytes().unwrap(), vec![0xab; 64]);
        assert!(proof.without_signature().signature_bytes().is_err());
    }

    #[test]
    fn test_document_json_roundtrip() {
        let doc = build(&profile(), "did:example:holder1", [("nama", "Budi")]).unwrap();
        let signed = attach_proof(&doc, signed_proof()).unwrap();
        let text = serde_json::to_string(&signed).unwrap();
        let back: ClaimDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(back, signed);
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let doc = build(&profile(), "did:example:holder1", [("nama", "Budi")]).unwrap();
        let signed = attach_proof(&doc, signed_proof()).unwrap();

        let mut json = signed.to_json().unwrap();
        json["expirationDate"] = serde_json::json!("2030-01-01T00:00:00Z");
        assert!(serde_json::from_value::<ClaimDocument>(json).is_err());

        let mut json = signed.to_json().unwrap();
        json["proof"]["domain"] = serde_json::json!("example.org");
        assert!(serde_json::from_value::<ClaimDocument>(json).is_err());
    }
}
