//! # Keygen Subcommand
//!
//! Generate a fresh issuer key and print it as JSON.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use credsign::core::{Ed25519Keypair, ProofSigner, Secp256k1Keypair};
use credsign::SignatureScheme;
use serde_json::json;

use crate::write_json;

/// Arguments for `credsign keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Signature scheme.
    #[arg(long, default_value_t = SignatureScheme::Secp256k1)]
    pub scheme: SignatureScheme,

    /// Write the key here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Generate a key pair and return `(private key hex, public key hex)`.
pub fn generate(scheme: SignatureScheme) -> (String, String) {
    match scheme {
        SignatureScheme::Secp256k1 => {
            let kp = Secp256k1Keypair::generate();
            (format!("0x{}", hex::encode(kp.secret_bytes())), kp.public_key().to_hex())
        }
        SignatureScheme::Ed25519 => {
            let kp = Ed25519Keypair::generate();
            (format!("0x{}", hex::encode(kp.seed())), kp.public_key().to_hex())
        }
    }
}

/// Execute the keygen subcommand.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let (private_key, public_key) = generate(args.scheme);
    tracing::info!(scheme = %args.scheme, public_key = %public_key, "generated issuer key");

    let out = json!({
        "scheme": args.scheme,
        "private_key_hex": private_key,
        "public_key_hex": public_key,
    });
    write_json(&out, args.output.as_deref())?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_round_trips() {
        for scheme in [SignatureScheme::Secp256k1, SignatureScheme::Ed25519] {
            let (private_key, public_key) = generate(scheme);
            let signer = scheme.signer_from_hex(&private_key).unwrap();
            assert_eq!(signer.public_key().to_hex(), public_key);
        }
    }

    #[test]
    fn test_keygen_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("key.json");
        let args = KeygenArgs {
            scheme: SignatureScheme::Ed25519,
            output: Some(out.clone()),
        };
        assert_eq!(run_keygen(&args).unwrap(), 0);

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["scheme"], "ed25519");
        assert_eq!(written["public_key_hex"].as_str().unwrap().len(), 64);
    }
}
