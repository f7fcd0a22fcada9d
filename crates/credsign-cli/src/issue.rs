//! # Issue Subcommand
//!
//! Build and sign credentials.
//!
//! ```bash
//! credsign issue --subject did:example:holder1 --attr nama=Budi --attr nim=12345
//! credsign issue --input subjects.json --output signed.json
//! credsign issue --interactive
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use credsign::{IssueRequest, Issuer, IssuerConfig};
use serde_json::Value;

use crate::source::{ArgsSource, JsonFileSource, PromptSource, SubjectSource};
use crate::write_json;

/// Arguments for `credsign issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Subject identifier (the holder's DID).
    #[arg(long, conflicts_with_all = ["input", "interactive"])]
    pub subject: Option<String>,

    /// Subject attribute, repeatable.
    #[arg(long = "attr", value_name = "NAME=VALUE", value_parser = parse_attribute, requires = "subject")]
    pub attributes: Vec<(String, String)>,

    /// JSON file with one request or an array of requests.
    #[arg(long, conflicts_with = "interactive")]
    pub input: Option<PathBuf>,

    /// Prompt for holder DID, name and student number.
    #[arg(long)]
    pub interactive: bool,

    /// Write the signed document(s) here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Parse `name=value`. The value may itself contain `=`.
pub fn parse_attribute(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got `{raw}`")),
    }
}

impl IssueArgs {
    fn source(&self) -> Result<Box<dyn SubjectSource>> {
        if let Some(subject) = &self.subject {
            return Ok(Box::new(ArgsSource {
                subject_id: subject.clone(),
                attributes: self.attributes.clone(),
            }));
        }
        if let Some(path) = &self.input {
            return Ok(Box::new(JsonFileSource { path: path.clone() }));
        }
        if self.interactive {
            return Ok(Box::new(PromptSource::new(
                std::io::stdin().lock(),
                std::io::stderr(),
            )));
        }
        bail!("one of --subject, --input or --interactive is required")
    }
}

/// Execute the issue subcommand.
///
/// Returns exit code 0 when every request was issued, 2 when some requests
/// in a batch failed.
pub fn run_issue(args: &IssueArgs, config: &IssuerConfig) -> Result<u8> {
    let requests = args.source()?.requests()?;
    let issuer = Issuer::from_config(config)?;

    if args.input.is_none() {
        let [request] = requests.as_slice() else {
            bail!("expected exactly one subject, got {}", requests.len());
        };
        let doc = issue_one(&issuer, request)?;
        write_json(&doc, args.output.as_deref())?;
        return Ok(0);
    }

    let (docs, failures) = issue_many(&issuer, requests)?;
    write_json(&Value::Array(docs), args.output.as_deref())?;
    Ok(if failures == 0 { 0 } else { 2 })
}

fn issue_one(issuer: &Issuer, request: &IssueRequest) -> Result<Value> {
    eprintln!("Issuing credential for {}", request.subject_id);
    eprintln!("   Issuer: {}", issuer.profile().issuer);

    let doc = issuer
        .issue_request(request)
        .with_context(|| format!("issuing credential for {}", request.subject_id))?;
    Ok(doc.to_json()?)
}

fn issue_many(issuer: &Issuer, requests: Vec<IssueRequest>) -> Result<(Vec<Value>, usize)> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;

    let subjects: Vec<String> = requests.iter().map(|r| r.subject_id.clone()).collect();
    let results = runtime.block_on(issuer.issue_batch(requests));

    let mut docs = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (i, (result, subject)) in results.into_iter().zip(subjects).enumerate() {
        match result {
            Ok(doc) => docs.push(doc.to_json()?),
            Err(e) => {
                failures += 1;
                tracing::error!(index = i, subject = %subject, "{e}");
            }
        }
    }

    tracing::info!(issued = docs.len(), failed = failures, "batch complete");
    Ok((docs, failures))
}
