//! # credsign-cli
//!
//! The `credsign` command-line interface.
//!
//! ## Subcommands
//!
//! - `credsign issue` - build and sign a credential from flags, a JSON file,
//!   or interactive prompts.
//! - `credsign verify` - check the proof on a signed document.
//! - `credsign keygen` - generate a fresh issuer key.
//!
//! The issuer is configured with `--config <file.json>` or the
//! `CREDSIGN_*` environment variables:
//!
//! ```bash
//! export CREDSIGN_ISSUER=did:example:issuer123
//! export CREDSIGN_KEY_FRAGMENT=keys-1
//! export CREDSIGN_PRIVATE_KEY=0x2a87...
//! credsign issue --subject did:example:holder1 --attr nama=Budi --attr nim=12345
//! ```

pub mod issue;
pub mod keygen;
pub mod source;
pub mod verify;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use credsign::IssuerConfig;

/// Load the issuer config from a file, or from the environment when no file
/// is given.
pub fn load_config(path: Option<&Path>) -> Result<IssuerConfig> {
    match path {
        Some(path) => IssuerConfig::from_file(path)
            .with_context(|| format!("loading issuer config from {}", path.display())),
        None => IssuerConfig::from_env().context("loading issuer config from environment"),
    }
}

/// Write pretty JSON to a file, or to stdout when no file is given.
pub fn write_json(value: &serde_json::Value, output: Option<&Path>) -> Result<()> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');

    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
