//! Canonical JSON encoding for deterministic hashing.
//!
//! Values are encoded as compact JSON with deterministic rules:
//! - Object keys sorted by UTF-8 byte order, at every nesting level
//! - No insignificant whitespace (`,` and `:` separators only)
//! - Arrays keep their order
//! - Integers in plain decimal; non-integer numbers are rejected
//! - Strings ASCII-escaped: non-printable and non-ASCII characters as `\uXXXX`
//!
//! The output matches `json.dumps(value, sort_keys=True, separators=(',', ':'))`
//! for every value this crate produces, so digests agree with existing
//! issuers and verifiers.
//!
//! **CRITICAL**: This encoding is FROZEN. Changes break all existing signatures.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::credential::{ClaimDocument, ProofOptions};
use crate::crypto::Sha256Hash;
use crate::error::CoreError;

/// Maximum nesting depth accepted by the encoder.
pub const MAX_DEPTH: usize = 32;

/// Field names excluded from the hashed forms.
pub(crate) mod keys {
    pub const PROOF: &str = "proof";
    pub const PROOF_VALUE: &str = "proofValue";
}

/// Encode a JSON value to canonical bytes.
pub fn canonicalize(value: &Value) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    encode_value(&mut buf, value, 0)?;
    Ok(buf)
}

/// Serialize any value through serde and encode it canonically.
pub fn canonicalize_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CoreError> {
    canonicalize(&serde_json::to_value(value)?)
}

/// SHA-256 of the canonical encoding.
pub fn hash<T: Serialize + ?Sized>(value: &T) -> Result<Sha256Hash, CoreError> {
    Ok(Sha256Hash::hash(&canonicalize_serialize(value)?))
}

/// Canonical bytes of a document with `proof` removed.
pub fn document_bytes(doc: &ClaimDocument) -> Result<Vec<u8>, CoreError> {
    document_value_bytes(&serde_json::to_value(doc)?)
}

/// Canonical bytes of proof options with `proofValue` removed.
pub fn proof_bytes(options: &ProofOptions) -> Result<Vec<u8>, CoreError> {
    proof_value_bytes(&serde_json::to_value(options)?)
}

/// Canonical bytes of a raw JSON document with `proof` removed.
///
/// Every other field is kept, including ones the typed model does not know.
pub fn document_value_bytes(doc: &Value) -> Result<Vec<u8>, CoreError> {
    encode_without(doc, keys::PROOF)
}

/// Canonical bytes of a raw JSON proof with `proofValue` removed.
pub fn proof_value_bytes(proof: &Value) -> Result<Vec<u8>, CoreError> {
    encode_without(proof, keys::PROOF_VALUE)
}

/// Digest of the document body, never covering its own proof.
pub fn document_digest(doc: &ClaimDocument) -> Result<Sha256Hash, CoreError> {
    Ok(Sha256Hash::hash(&document_bytes(doc)?))
}

/// Digest of the proof options, never covering the signature value.
pub fn proof_digest(options: &ProofOptions) -> Result<Sha256Hash, CoreError> {
    Ok(Sha256Hash::hash(&proof_bytes(options)?))
}

/// Build the message to sign: `proof_digest || document_digest`.
pub fn signing_input(proof_digest: &Sha256Hash, document_digest: &Sha256Hash) -> [u8; 64] {
    let mut msg = [0u8; 64];
    msg[..32].copy_from_slice(proof_digest.as_bytes());
    msg[32..].copy_from_slice(document_digest.as_bytes());
    msg
}

/// Encode a top-level object minus one key.
fn encode_without(value: &Value, key: &str) -> Result<Vec<u8>, CoreError> {
    let Value::Object(map) = value else {
        return canonicalize(value);
    };
    let entries = map
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| (k.as_str(), v))
        .collect();

    let mut buf = Vec::new();
    encode_entries(&mut buf, entries, 0)?;
    Ok(buf)
}

/// Recursively encode a JSON value.
fn encode_value(buf: &mut Vec<u8>, value: &Value, depth: usize) -> Result<(), CoreError> {
    if depth > MAX_DEPTH {
        return Err(CoreError::Serialization(format!(
            "value nested deeper than {MAX_DEPTH} levels"
        )));
    }
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(b) => buf.extend_from_slice(if *b { b"true" } else { b"false" }),
        Value::Number(n) => encode_number(buf, n)?,
        Value::String(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr, depth)?,
        Value::Object(map) => encode_object(buf, map, depth)?,
    }
    Ok(())
}

fn encode_number(buf: &mut Vec<u8>, n: &Number) -> Result<(), CoreError> {
    if let Some(i) = n.as_i64() {
        buf.extend_from_slice(i.to_string().as_bytes());
    } else if let Some(u) = n.as_u64() {
        buf.extend_from_slice(u.to_string().as_bytes());
    } else {
        return Err(CoreError::Serialization(format!(
            "non-integer number {n} has no canonical form"
        )));
    }
    Ok(())
}

/// Encode a string with ASCII-only escaping.
///
/// `"` and `\` are backslash-escaped, `\b \f \n \r \t` use their short forms,
/// printable ASCII passes through, and everything else becomes `\uXXXX`
/// (lowercase hex, UTF-16 surrogate pairs above U+FFFF).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for c in s.chars() {
        match c {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\u{08}' => buf.extend_from_slice(b"\\b"),
            '\u{0c}' => buf.extend_from_slice(b"\\f"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            ' '..='~' => buf.push(c as u8),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    buf.extend_from_slice(format!("\\u{unit:04x}").as_bytes());
                }
            }
        }
    }
    buf.push(b'"');
}

fn encode_array(buf: &mut Vec<u8>, arr: &[Value], depth: usize) -> Result<(), CoreError> {
    buf.push(b'[');
    for (i, item) in arr.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        encode_value(buf, item, depth + 1)?;
    }
    buf.push(b']');
    Ok(())
}

fn encode_object(buf: &mut Vec<u8>, map: &Map<String, Value>, depth: usize) -> Result<(), CoreError> {
    let entries: Vec<(&str, &Value)> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
    encode_entries(buf, entries, depth)
}

/// Encode object entries sorted by key bytes, whatever order they arrive in.
fn encode_entries(
    buf: &mut Vec<u8>,
    mut entries: Vec<(&str, &Value)>,
    depth: usize,
) -> Result<(), CoreError> {
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    buf.push(b'{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        encode_text(buf, key);
        buf.push(b':');
        encode_value(buf, value, depth + 1)?;
    }
    buf.push(b'}');
    Ok(())
}
