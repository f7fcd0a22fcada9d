//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use credsign::Issuer;
use credsign_core::{
    ClaimDocument, CoreError, Ed25519Keypair, IssuerProfile, ProofSigner, PublicKey,
    Secp256k1Keypair, SignatureScheme,
};

/// Issuer identifier used by every fixture.
pub const TEST_ISSUER: &str = "did:example:issuer123";

/// Key fragment used by every fixture.
pub const TEST_KEY_FRAGMENT: &str = "keys-1";

/// The secp256k1 key the sample issuing setup ships with.
pub const TEST_SECP256K1_KEY: &str =
    "0x2a871d0798f97d79848a013d4936a73bf4cc922c825d33c1cf7073dff6d409c6";

/// The profile used by every fixture.
pub fn test_profile() -> IssuerProfile {
    IssuerProfile::new(TEST_ISSUER, TEST_KEY_FRAGMENT)
}

/// Build a signer for `scheme` from a 32-byte seed.
///
/// Fails for secp256k1 seeds that are not valid scalars (zero, or at least
/// the curve order).
pub fn signer_from_seed(
    scheme: SignatureScheme,
    seed: [u8; 32],
) -> Result<Arc<dyn ProofSigner>, CoreError> {
    let signer: Arc<dyn ProofSigner> = match scheme {
        SignatureScheme::Secp256k1 => Arc::new(Secp256k1Keypair::from_slice(&seed)?),
        SignatureScheme::Ed25519 => Arc::new(Ed25519Keypair::from_seed(&seed)),
    };
    Ok(signer)
}

/// A configured issuer for tests.
pub struct TestFixture {
    pub issuer: Issuer,
}

impl TestFixture {
    /// Issuer with the sample secp256k1 key.
    pub fn new() -> Self {
        let signer = SignatureScheme::Secp256k1
            .signer_from_hex(TEST_SECP256K1_KEY)
            .expect("sample key is valid");
        Self::with_signer(Arc::from(signer))
    }

    /// Issuer with a deterministic key from seed.
    pub fn with_seed(scheme: SignatureScheme, seed: [u8; 32]) -> Self {
        Self::with_signer(signer_from_seed(scheme, seed).expect("seed is a valid key"))
    }

    /// Issuer with a fresh random key.
    pub fn random(scheme: SignatureScheme) -> Self {
        Self::with_signer(Arc::from(scheme.generate()))
    }

    /// Issuer around any signer.
    pub fn with_signer(signer: Arc<dyn ProofSigner>) -> Self {
        Self {
            issuer: Issuer::new(test_profile(), signer).expect("test profile is valid"),
        }
    }

    /// The issuer's public key.
    pub fn public_key(&self) -> PublicKey {
        self.issuer.public_key()
    }

    /// Issue the student credential shape the sample issuing setup produces.
    pub fn issue_student(&self, nama: &str, nim: &str) -> ClaimDocument {
        self.issuer
            .issue("did:example:holder1", [("nama", nama), ("nim", nim)])
            .expect("student credential issues")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create fixtures with distinct deterministic keys.
pub fn multi_issuer_fixtures(scheme: SignatureScheme, count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0x01u8; 32];
            seed[0] = i as u8 + 1;
            TestFixture::with_seed(scheme, seed)
        })
        .collect()
}

/// Wraps a signer and counts how often it is asked to sign.
pub struct CountingSigner {
    inner: Arc<dyn ProofSigner>,
    calls: AtomicUsize,
}

impl CountingSigner {
    pub fn new(inner: Arc<dyn ProofSigner>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `try_sign` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProofSigner for CountingSigner {
    fn scheme(&self) -> SignatureScheme {
        self.inner.scheme()
    }

    fn public_key(&self) -> PublicKey {
        self.inner.public_key()
    }

    fn try_sign(&self, message: &[u8]) -> Result<Vec<u8>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.try_sign(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credsign::{IssueRequest, IssuerError};

    #[test]
    fn test_fixture_student() {
        let fixture = TestFixture::new();
        let doc = fixture.issue_student("Budi", "12345");

        let subject = doc.credential_subject();
        assert_eq!(subject.attributes["nama"], "Budi");
        assert_eq!(subject.attributes["nim"], "12345");
        assert!(fixture.issuer.verify(&doc).is_ok());
    }

    #[test]
    fn test_multi_issuer() {
        let issuers = multi_issuer_fixtures(SignatureScheme::Secp256k1, 3);

        let pks: Vec<_> = issuers.iter().map(|f| f.public_key()).collect();
        assert_ne!(pks[0], pks[1]);
        assert_ne!(pks[1], pks[2]);
        assert_ne!(pks[0], pks[2]);

        let doc = issuers[0].issue_student("Budi", "12345");
        assert!(issuers[1].issuer.verify(&doc).is_err());
    }

    #[test]
    fn test_zero_seed_rejected_for_secp256k1() {
        assert!(signer_from_seed(SignatureScheme::Secp256k1, [0; 32]).is_err());
        assert!(signer_from_seed(SignatureScheme::Ed25519, [0; 32]).is_ok());
    }

    #[test]
    fn test_counting_signer_skips_invalid_subjects() {
        let counting = Arc::new(CountingSigner::new(signer_from_seed(SignatureScheme::Ed25519, [7; 32]).unwrap()));
        let fixture = TestFixture::with_signer(counting.clone());

        assert!(fixture.issuer.issue("", [("nama", "Budi")]).is_err());
        assert!(fixture.issuer.issue("did:x", [("id", "spoof")]).is_err());
        assert_eq!(counting.calls(), 0);

        fixture.issuer.issue("did:x", [("nama", "Budi")]).unwrap();
        assert_eq!(counting.calls(), 1);
    }

    #[tokio::test]
    async fn test_batch_signs_once_per_valid_request() {
        let counting = Arc::new(CountingSigner::new(signer_from_seed(SignatureScheme::Secp256k1, [7; 32]).unwrap()));
        let fixture = TestFixture::with_signer(counting.clone());

        let requests: Vec<_> = (0..8)
            .map(|i| IssueRequest::new(if i == 3 { String::new() } else { format!("did:example:{i}") }, [("n", i.to_string())]))
            .collect();
        let results = fixture.issuer.issue_batch(requests).await;

        assert_eq!(counting.calls(), 7);
        for (i, result) in results.iter().enumerate() {
            match result {
                Ok(doc) => assert_eq!(doc.credential_subject().id, format!("did:example:{i}")),
                Err(e) => {
                    assert_eq!(i, 3);
                    assert!(matches!(e, IssuerError::Core(CoreError::Validation(_))));
                }
            }
        }
    }
}
