//! Where subject data comes from.
//!
//! A [`SubjectSource`] yields the issuance requests for one `issue` run:
//! from command-line flags, from a JSON file, or from interactive prompts.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use credsign::IssueRequest;
use serde_json::Value;

/// A producer of `(subject id, attributes)` pairs.
pub trait SubjectSource {
    /// Collect every request this source provides.
    fn requests(&mut self) -> Result<Vec<IssueRequest>>;
}

/// Subject id and attributes given as flags.
#[derive(Debug, Clone)]
pub struct ArgsSource {
    pub subject_id: String,
    pub attributes: Vec<(String, String)>,
}

impl SubjectSource for ArgsSource {
    fn requests(&mut self) -> Result<Vec<IssueRequest>> {
        Ok(vec![IssueRequest::new(
            self.subject_id.clone(),
            self.attributes.iter().cloned(),
        )])
    }
}

/// A JSON file holding one request object or an array of them.
///
/// Each request is `{"subjectId": "...", "attributes": {...}}`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    pub path: PathBuf,
}

impl SubjectSource for JsonFileSource {
    fn requests(&mut self) -> Result<Vec<IssueRequest>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        parse_requests(&value)
    }
}

/// Parse a single request object or an array of request objects.
pub fn parse_requests(value: &Value) -> Result<Vec<IssueRequest>> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                IssueRequest::from_json(item).with_context(|| format!("request {i}"))
            })
            .collect(),
        Value::Object(_) => Ok(vec![IssueRequest::from_json(value)?]),
        _ => bail!("expected a request object or an array of requests"),
    }
}

/// Prompts for a holder id, name and student number.
pub struct PromptSource<R, W> {
    input: R,
    output: W,
}

/// Attribute names collected by [`PromptSource`].
pub const NAME_ATTRIBUTE: &str = "nama";
pub const STUDENT_NUMBER_ATTRIBUTE: &str = "nim";

impl<R: BufRead, W: Write> PromptSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed before {prompt} was entered");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> SubjectSource for PromptSource<R, W> {
    fn requests(&mut self) -> Result<Vec<IssueRequest>> {
        writeln!(self.output, "--- Enter the holder details from the credential request ---")?;
        let subject_id = self.ask("Holder DID")?;
        let name = self.ask("Holder name")?;
        let student_number = self.ask("Holder student number (NIM)")?;

        Ok(vec![IssueRequest::new(
            subject_id,
            [(NAME_ATTRIBUTE, name), (STUDENT_NUMBER_ATTRIBUTE, student_number)],
        )])
    }
}
