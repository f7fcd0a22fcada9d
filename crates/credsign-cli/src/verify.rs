//! # Verify Subcommand
//!
//! Check the proof on a signed document against an issuer public key.
//!
//! ```bash
//! credsign verify signed.json --public-key 02ab...
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use credsign::core::verify_json;
use credsign::{PublicKey, SignatureScheme};
use serde_json::Value;

/// Arguments for `credsign verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Signed document to check.
    pub document: PathBuf,

    /// Issuer public key, hex.
    #[arg(long)]
    pub public_key: String,

    /// Key scheme. Defaults to the scheme named by the document's proof type.
    #[arg(long)]
    pub scheme: Option<SignatureScheme>,
}

/// Execute the verify subcommand.
///
/// Returns exit code 0 for a valid proof and 1 for an invalid one.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let raw = std::fs::read_to_string(&args.document)
        .with_context(|| format!("reading {}", args.document.display()))?;
    let doc: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.document.display()))?;
    let id = doc.get("id").and_then(Value::as_str).unwrap_or("<no id>");

    let scheme = args
        .scheme
        .or_else(|| {
            doc.pointer("/proof/type")
                .and_then(Value::as_str)
                .and_then(SignatureScheme::from_proof_type)
        })
        .unwrap_or_default();
    let public_key = PublicKey::from_hex(scheme, &args.public_key).context("parsing public key")?;

    match verify_json(&doc, &public_key) {
        Ok(()) => {
            println!("OK {id} ({})", scheme.proof_type());
            Ok(0)
        }
        Err(e) => {
            println!("INVALID {id}: {e}");
            Ok(1)
        }
    }
}
