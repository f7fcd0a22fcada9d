//! The issuance pipeline: build, hash twice, sign, attach.
//!
//! Every function here is a pure transformation of its inputs. Nothing is
//! retried: the same inputs would fail the same way.

use crate::canonical::{document_digest, proof_digest, signing_input};
use crate::credential::{attach_proof, ClaimDocument, CredentialBuilder, IssuerProfile, ProofOptions};
use crate::crypto::{ProofSigner, Sha256Hash};
use crate::error::CoreError;

/// Sign `proof_digest || document_digest` with the issuer key.
pub fn sign(
    document_digest: &Sha256Hash,
    proof_digest: &Sha256Hash,
    signer: &dyn ProofSigner,
) -> Result<Vec<u8>, CoreError> {
    let message = signing_input(proof_digest, document_digest);
    let signature = signer.try_sign(&message)?;

    let expected = signer.scheme().signature_len();
    if signature.len() != expected {
        return Err(CoreError::Signing(format!(
            "{} signer returned {} bytes, expected {expected}",
            signer.scheme(),
            signature.len()
        )));
    }
    Ok(signature)
}

/// Sign an unsigned document and return the signed copy.
///
/// The proof's `created` time is the document's issuance time.
pub fn sign_document(
    doc: &ClaimDocument,
    profile: &IssuerProfile,
    signer: &dyn ProofSigner,
) -> Result<ClaimDocument, CoreError> {
    if doc.is_signed() {
        return Err(CoreError::InvariantViolation(format!(
            "document {} is already signed",
            doc.id()
        )));
    }

    let options = ProofOptions::new(
        signer.scheme(),
        doc.issuance_date(),
        profile.verification_method(),
    );

    let doc_digest = document_digest(doc)?;
    let options_digest = proof_digest(&options)?;
    let signature = sign(&doc_digest, &options_digest, signer)?;

    attach_proof(doc, options.with_signature(&signature))
}

/// Issue a signed credential for `subject_id` with the given attributes.
///
/// Validation happens before any hashing or signing; any failure returns no
/// document.
pub fn issue_credential<K, V>(
    profile: &IssuerProfile,
    signer: &dyn ProofSigner,
    subject_id: &str,
    attributes: impl IntoIterator<Item = (K, V)>,
) -> Result<ClaimDocument, CoreError>
where
    K: Into<String>,
    V: Into<String>,
{
    let draft = CredentialBuilder::new(profile, subject_id)
        .attributes(attributes)
        .build()?;
    sign_document(&draft, profile, signer)
}
