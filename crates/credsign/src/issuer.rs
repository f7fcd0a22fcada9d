//! The Issuer: a configured issuer identity plus its signing key.
//!
//! An `Issuer` is cheap to clone and safe to share across threads. Every
//! issuance is independent; a batch fans out onto the blocking pool and
//! collects results in request order.

use std::sync::Arc;

use credsign_core::{
    attributes_from_json, issue_credential, sign_document, verify_credential, ClaimDocument,
    CoreError, IssuerProfile, ProofSigner, PublicKey,
};
use serde_json::Value;

use crate::config::IssuerConfig;
use crate::error::{IssuerError, Result};

/// One subject to issue a credential for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    /// Subject identifier, written as `credentialSubject.id`.
    pub subject_id: String,
    /// Named string attributes, in caller order.
    pub attributes: Vec<(String, String)>,
}

impl IssueRequest {
    /// Create a request.
    pub fn new<K, V>(subject_id: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            subject_id: subject_id.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse `{"subjectId": "...", "attributes": {"name": "value", ...}}`.
    ///
    /// `attributes` may be omitted. Attribute values must be strings.
    pub fn from_json(value: &Value) -> std::result::Result<Self, CoreError> {
        let subject_id = value
            .get("subjectId")
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::Validation("subjectId must be a string".into()))?;

        let attributes = match value.get("attributes") {
            Some(attrs) => attributes_from_json(attrs)?,
            None => Vec::new(),
        };

        Ok(Self {
            subject_id: subject_id.to_string(),
            attributes,
        })
    }
}

/// Issues signed credentials for a single issuer identity.
#[derive(Clone)]
pub struct Issuer {
    profile: Arc<IssuerProfile>,
    signer: Arc<dyn ProofSigner>,
}

impl Issuer {
    /// Create an issuer from a profile and a signer.
    ///
    /// The profile is validated here so a misconfigured issuer fails at
    /// startup rather than on the first request.
    pub fn new(profile: IssuerProfile, signer: Arc<dyn ProofSigner>) -> Result<Self> {
        profile.validate()?;
        Ok(Self {
            profile: Arc::new(profile),
            signer,
        })
    }

    /// Create an issuer from a loaded config.
    pub fn from_config(config: &IssuerConfig) -> Result<Self> {
        config.validate()?;
        let signer: Arc<dyn ProofSigner> = Arc::from(config.signer()?);
        let issuer = Self::new(config.profile(), signer)?;

        tracing::info!(
            issuer = %issuer.profile.issuer,
            scheme = %issuer.signer.scheme(),
            verification_method = %issuer.profile.verification_method(),
            "issuer ready"
        );
        Ok(issuer)
    }

    /// The issuer profile.
    pub fn profile(&self) -> &IssuerProfile {
        &self.profile
    }

    /// The public key matching the signing key.
    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    /// Issue a signed credential.
    pub fn issue<K, V>(
        &self,
        subject_id: &str,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) -> Result<ClaimDocument>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let result = issue_credential(&self.profile, self.signer.as_ref(), subject_id, attributes);
        self.record(result)
    }

    /// Issue a signed credential for a request.
    pub fn issue_request(&self, request: &IssueRequest) -> Result<ClaimDocument> {
        self.issue(
            &request.subject_id,
            request
                .attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// Sign a draft built elsewhere, e.g. with a fixed id and timestamp.
    pub fn sign(&self, draft: &ClaimDocument) -> Result<ClaimDocument> {
        let result = sign_document(draft, &self.profile, self.signer.as_ref());
        self.record(result)
    }

    /// Verify a document against this issuer's public key.
    pub fn verify(&self, doc: &ClaimDocument) -> Result<()> {
        verify_credential(doc, &self.public_key())?;
        Ok(())
    }

    /// Issue credentials for many subjects concurrently.
    ///
    /// Results come back in request order. A failing request does not stop
    /// the others.
    pub async fn issue_batch(&self, requests: Vec<IssueRequest>) -> Vec<Result<ClaimDocument>> {
        tracing::debug!(count = requests.len(), "issuing batch");

        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let issuer = self.clone();
                tokio::task::spawn_blocking(move || issuer.issue_request(&request))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(IssuerError::Task(e.to_string())),
            };
            results.push(result);
        }
        results
    }

    fn record(&self, result: std::result::Result<ClaimDocument, CoreError>) -> Result<ClaimDocument> {
        match result {
            Ok(doc) => {
                tracing::info!(
                    credential_id = %doc.id(),
                    issuer = %self.profile.issuer,
                    scheme = %self.signer.scheme(),
                    "issued credential"
                );
                Ok(doc)
            }
            Err(e) => {
                tracing::warn!(error = %e, issuer = %self.profile.issuer, "credential issuance failed");
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for Issuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Issuer")
            .field("profile", &self.profile)
            .field("public_key", &self.signer.public_key().to_hex())
            .finish()
    }
}
