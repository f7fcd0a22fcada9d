//! Issuer configuration.
//!
//! The issuer identity and signing key are loaded once at startup, either
//! from a JSON file or from `CREDSIGN_*` environment variables, and passed
//! explicitly into the [`Issuer`](crate::Issuer).

use std::fmt;
use std::path::Path;

use credsign_core::credential::{DEFAULT_CREDENTIAL_TYPE, VC_CONTEXT_V1};
use credsign_core::{CoreError, IssuerProfile, ProofSigner, SignatureScheme};
use serde::{Deserialize, Serialize};

use crate::error::{IssuerError, Result};

/// Environment variable names read by [`IssuerConfig::from_env`].
pub mod env {
    pub const ISSUER: &str = "CREDSIGN_ISSUER";
    pub const KEY_FRAGMENT: &str = "CREDSIGN_KEY_FRAGMENT";
    pub const PRIVATE_KEY: &str = "CREDSIGN_PRIVATE_KEY";
    pub const SCHEME: &str = "CREDSIGN_SCHEME";
    pub const CREDENTIAL_TYPE: &str = "CREDSIGN_CREDENTIAL_TYPE";
}

/// Configuration for an issuer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// Issuer identifier, e.g. `did:example:issuer123`.
    pub issuer: String,
    /// Fragment naming the key inside the issuer's DID document.
    pub key_fragment: String,
    /// Hex private key, optionally `0x`-prefixed. Read but never written.
    #[serde(skip_serializing)]
    pub private_key_hex: String,
    /// Signature scheme.
    #[serde(default)]
    pub scheme: SignatureScheme,
    /// `@context` entries.
    #[serde(default = "default_context")]
    pub context: Vec<String>,
    /// Second entry of the `type` array.
    #[serde(default = "default_credential_type")]
    pub credential_type: String,
}

fn default_context() -> Vec<String> {
    vec![VC_CONTEXT_V1.to_string()]
}

fn default_credential_type() -> String {
    DEFAULT_CREDENTIAL_TYPE.to_string()
}

impl IssuerConfig {
    /// Create a config with the default scheme, context and credential type.
    pub fn new(
        issuer: impl Into<String>,
        key_fragment: impl Into<String>,
        private_key_hex: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            key_fragment: key_fragment.into(),
            private_key_hex: private_key_hex.into(),
            scheme: SignatureScheme::default(),
            context: default_context(),
            credential_type: default_credential_type(),
        }
    }

    /// Set the signature scheme.
    pub fn with_scheme(mut self, scheme: SignatureScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading issuer config from file");

        let raw = std::fs::read_to_string(path).map_err(|source| IssuerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&raw).map_err(|source| IssuerError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from the process environment.
    pub fn from_env() -> Result<Self> {
        tracing::debug!("loading issuer config from environment");
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load a config from any name-to-value lookup.
    ///
    /// Issuer, key fragment and private key are required; scheme and
    /// credential type fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| CoreError::Configuration(format!("{name} is not set")))
        };

        let mut config = Self::new(
            required(env::ISSUER)?,
            required(env::KEY_FRAGMENT)?,
            required(env::PRIVATE_KEY)?,
        );
        if let Some(scheme) = lookup(env::SCHEME) {
            config.scheme = scheme.parse()?;
        }
        if let Some(credential_type) = lookup(env::CREDENTIAL_TYPE) {
            config.credential_type = credential_type;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every required field is present.
    pub fn validate(&self) -> Result<()> {
        self.profile().validate()?;
        if self.private_key_hex.trim().is_empty() {
            return Err(CoreError::Configuration("private key is not set".into()).into());
        }
        Ok(())
    }

    /// The issuer profile described by this config.
    pub fn profile(&self) -> IssuerProfile {
        IssuerProfile::new(&self.issuer, &self.key_fragment)
            .with_context(self.context.clone())
            .with_credential_type(&self.credential_type)
    }

    /// Parse the private key into a signer for the configured scheme.
    pub fn signer(&self) -> Result<Box<dyn ProofSigner>> {
        Ok(self.scheme.signer_from_hex(&self.private_key_hex)?)
    }
}

impl fmt::Debug for IssuerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerConfig")
            .field("issuer", &self.issuer)
            .field("key_fragment", &self.key_fragment)
            .field("private_key_hex", &"<redacted>")
            .field("scheme", &self.scheme)
            .field("context", &self.context)
            .field("credential_type", &self.credential_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const KEY: &str = "0x2a871d0798f97d79848a013d4936a73bf4cc922c825d33c1cf7073dff6d409c6";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = IssuerConfig::from_lookup(lookup(&[
            (env::ISSUER, "did:example:issuer123"),
            (env::KEY_FRAGMENT, "keys-1"),
            (env::PRIVATE_KEY, KEY),
        ]))
        .unwrap();

        assert_eq!(config.scheme, SignatureScheme::Secp256k1);
        assert_eq!(config.context, vec![VC_CONTEXT_V1.to_string()]);
        assert_eq!(config.credential_type, DEFAULT_CREDENTIAL_TYPE);
        assert_eq!(config.profile().verification_method(), "did:example:issuer123#keys-1");
        assert!(config.signer().is_ok());
    }

    #[test]
    fn test_from_lookup_optional_fields() {
        let config = IssuerConfig::from_lookup(lookup(&[
            (env::ISSUER, "did:example:issuer123"),
            (env::KEY_FRAGMENT, "keys-1"),
            (env::PRIVATE_KEY, KEY),
            (env::SCHEME, "ed25519"),
            (env::CREDENTIAL_TYPE, "AlumniCredential"),
        ]))
        .unwrap();

        assert_eq!(config.scheme, SignatureScheme::Ed25519);
        assert_eq!(config.credential_type, "AlumniCredential");
    }

    #[test]
    fn test_missing_values_are_configuration_errors() {
        let err = IssuerConfig::from_lookup(lookup(&[
            (env::ISSUER, "did:example:issuer123"),
            (env::KEY_FRAGMENT, "keys-1"),
        ]))
        .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains(env::PRIVATE_KEY));

        let err = IssuerConfig::from_lookup(lookup(&[
            (env::ISSUER, "  "),
            (env::KEY_FRAGMENT, "keys-1"),
            (env::PRIVATE_KEY, KEY),
        ]))
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        let err = IssuerConfig::from_lookup(lookup(&[
            (env::ISSUER, "did:example:issuer123"),
            (env::KEY_FRAGMENT, "keys-1"),
            (env::PRIVATE_KEY, KEY),
            (env::SCHEME, "rsa"),
        ]))
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_from_file_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"issuer":"did:example:issuer123","key_fragment":"keys-1","private_key_hex":"{KEY}"}}"#
        )
        .unwrap();

        let config = IssuerConfig::from_file(file.path()).unwrap();
        assert_eq!(config, IssuerConfig::new("did:example:issuer123", "keys-1", KEY));
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            IssuerConfig::from_file(&missing),
            Err(IssuerError::ConfigRead { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            IssuerConfig::from_file(&bad),
            Err(IssuerError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = IssuerConfig::new("did:example:issuer123", "keys-1", KEY);
        let debug = format!("{config:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("2a871d07"));
    }

    #[test]
    fn test_serialize_omits_private_key() {
        let config = IssuerConfig::new("did:example:issuer123", "keys-1", KEY);
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("private_key_hex").is_none());
        assert_eq!(json["issuer"], "did:example:issuer123");
        assert!(!json.to_string().contains("2a871d07"));
    }
}
