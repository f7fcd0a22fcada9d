//! Cryptographic primitives for credsign.
//!
//! Wraps SHA-256 hashing and the supported signature schemes with strong
//! types. Signing goes through the [`ProofSigner`] trait so the pipeline does
//! not depend on a particular curve.

use k256::ecdsa::signature::{Signer as _, Verifier as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, VerificationError};

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Signature schemes an issuer can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScheme {
    /// ECDSA over secp256k1 with SHA-256 and RFC 6979 nonces.
    #[default]
    Secp256k1,
    /// Ed25519.
    Ed25519,
}

impl SignatureScheme {
    /// The proof `type` string written into documents signed with this scheme.
    pub const fn proof_type(self) -> &'static str {
        match self {
            Self::Secp256k1 => "EcdsaSecp256k1Signature2019",
            Self::Ed25519 => "Ed25519Signature2020",
        }
    }

    /// Private key length in bytes.
    pub const fn private_key_len(self) -> usize {
        32
    }

    /// Signature length in bytes.
    pub const fn signature_len(self) -> usize {
        64
    }

    /// Look up a scheme by its proof `type` string.
    pub fn from_proof_type(proof_type: &str) -> Option<Self> {
        [Self::Secp256k1, Self::Ed25519]
            .into_iter()
            .find(|s| s.proof_type() == proof_type)
    }

    /// Build a signer from a hex-encoded private key.
    ///
    /// A leading `0x` is accepted. Errors never echo the key.
    pub fn signer_from_hex(self, private_key_hex: &str) -> Result<Box<dyn ProofSigner>, CoreError> {
        let bytes = decode_private_key(self, private_key_hex)?;
        match self {
            Self::Secp256k1 => Ok(Box::new(Secp256k1Keypair::from_slice(&bytes)?)),
            Self::Ed25519 => Ok(Box::new(Ed25519Keypair::from_slice(&bytes)?)),
        }
    }

    /// Generate a fresh random signer.
    pub fn generate(self) -> Box<dyn ProofSigner> {
        match self {
            Self::Secp256k1 => Box::new(Secp256k1Keypair::generate()),
            Self::Ed25519 => Box::new(Ed25519Keypair::generate()),
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secp256k1 => f.write_str("secp256k1"),
            Self::Ed25519 => f.write_str("ed25519"),
        }
    }
}

impl FromStr for SignatureScheme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "secp256k1" => Ok(Self::Secp256k1),
            "ed25519" => Ok(Self::Ed25519),
            _ => Self::from_proof_type(s).ok_or_else(|| {
                CoreError::Configuration(format!("unknown signature scheme: {s}"))
            }),
        }
    }
}

fn decode_private_key(scheme: SignatureScheme, private_key_hex: &str) -> Result<Vec<u8>, CoreError> {
    let trimmed = private_key_hex.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes =
        hex::decode(digits).map_err(|_| CoreError::InvalidKey("private key is not valid hex".into()))?;
    if bytes.len() != scheme.private_key_len() {
        return Err(CoreError::InvalidKey(format!(
            "{scheme} private key must be {} bytes, got {}",
            scheme.private_key_len(),
            bytes.len()
        )));
    }
    Ok(bytes)
}

/// Produces proof signatures for one issuer key.
///
/// Implementations must not log or retain the message they sign.
pub trait ProofSigner: Send + Sync {
    /// The scheme this signer implements.
    fn scheme(&self) -> SignatureScheme;

    /// The public key matching the private key.
    fn public_key(&self) -> PublicKey;

    /// Sign a message.
    fn try_sign(&self, message: &[u8]) -> Result<Vec<u8>, CoreError>;
}

impl fmt::Debug for dyn ProofSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProofSigner({}, {:?})", self.scheme(), self.public_key())
    }
}

/// A secp256k1 ECDSA keypair.
#[derive(Clone)]
pub struct Secp256k1Keypair {
    signing_key: k256::ecdsa::SigningKey,
}

impl Secp256k1Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let signing_key = k256::ecdsa::SigningKey::random(&mut rand::rngs::OsRng);
        Self { signing_key }
    }

    /// Create from a 32-byte scalar.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let signing_key = k256::ecdsa::SigningKey::from_slice(bytes)
            .map_err(|_| CoreError::InvalidKey("not a valid secp256k1 scalar".into()))?;
        Ok(Self { signing_key })
    }

    /// Get the raw secret scalar (secret key material).
    pub fn secret_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }
}

impl ProofSigner for Secp256k1Keypair {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Secp256k1
    }

    fn public_key(&self) -> PublicKey {
        let point = self.signing_key.verifying_key().to_encoded_point(true);
        PublicKey {
            scheme: SignatureScheme::Secp256k1,
            bytes: point.as_bytes().to_vec(),
        }
    }

    fn try_sign(&self, message: &[u8]) -> Result<Vec<u8>, CoreError> {
        let signature: k256::ecdsa::Signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| CoreError::Signing(e.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    }
}

impl fmt::Debug for Secp256k1Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1Keypair({:?})", self.public_key())
    }
}

/// An Ed25519 keypair.
#[derive(Clone)]
pub struct Ed25519Keypair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Ed25519Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Create from a seed slice; the length must be 32.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidKey("ed25519 seed must be 32 bytes".into()))?;
        Ok(Self::from_seed(&seed))
    }

    /// Get the raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl ProofSigner for Ed25519Keypair {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Ed25519
    }

    fn public_key(&self) -> PublicKey {
        PublicKey {
            scheme: SignatureScheme::Ed25519,
            bytes: self.signing_key.verifying_key().to_bytes().to_vec(),
        }
    }

    fn try_sign(&self, message: &[u8]) -> Result<Vec<u8>, CoreError> {
        let signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| CoreError::Signing(e.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    }
}

impl fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Keypair({:?})", self.public_key())
    }
}

/// An issuer public key tagged with its scheme.
///
/// secp256k1 keys are SEC1 compressed points (33 bytes); Ed25519 keys are the
/// raw 32 bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    pub scheme: SignatureScheme,
    pub bytes: Vec<u8>,
}

impl PublicKey {
    /// Parse from hex, checking that the bytes decode as a key of `scheme`.
    pub fn from_hex(scheme: SignatureScheme, s: &str) -> Result<Self, VerificationError> {
        let bytes = hex::decode(s.trim()).map_err(|_| VerificationError::InvalidPublicKey)?;
        let key = Self { scheme, bytes };
        match scheme {
            SignatureScheme::Secp256k1 => {
                key.secp256k1_key()?;
            }
            SignatureScheme::Ed25519 => {
                key.ed25519_key()?;
            }
        }
        Ok(key)
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), VerificationError> {
        match self.scheme {
            SignatureScheme::Secp256k1 => {
                let key = self.secp256k1_key()?;
                let sig = k256::ecdsa::Signature::from_slice(signature)
                    .map_err(|e| VerificationError::MalformedProofValue(e.to_string()))?;
                key.verify(message, &sig)
                    .map_err(|_| VerificationError::SignatureFailed)
            }
            SignatureScheme::Ed25519 => {
                let key = self.ed25519_key()?;
                let sig = ed25519_dalek::Signature::from_slice(signature)
                    .map_err(|e| VerificationError::MalformedProofValue(e.to_string()))?;
                key.verify(message, &sig)
                    .map_err(|_| VerificationError::SignatureFailed)
            }
        }
    }

    fn secp256k1_key(&self) -> Result<k256::ecdsa::VerifyingKey, VerificationError> {
        k256::ecdsa::VerifyingKey::from_sec1_bytes(&self.bytes)
            .map_err(|_| VerificationError::InvalidPublicKey)
    }

    fn ed25519_key(&self) -> Result<ed25519_dalek::VerifyingKey, VerificationError> {
        let bytes: [u8; 32] = self
            .bytes
            .as_slice()
            .try_into()
            .map_err(|_| VerificationError::InvalidPublicKey)?;
        ed25519_dalek::VerifyingKey::from_bytes(&bytes).map_err(|_| VerificationError::InvalidPublicKey)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "PublicKey({}:{}...)", self.scheme, &hex[..hex.len().min(16)])
    }
}
