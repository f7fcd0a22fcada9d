//! Strong type definitions for credsign.
//!
//! Identifiers and timestamps are newtypes so their textual form is fixed in
//! one place: the canonical bytes depend on it.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Textual timestamp form shared by `issuanceDate` and `proof.created`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// URN prefix of credential identifiers.
pub const CREDENTIAL_ID_PREFIX: &str = "urn:uuid:";

/// A credential identifier: 128 random bits rendered as `urn:uuid:<uuid>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialId(pub Uuid);

impl CredentialId {
    /// Generate a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from raw UUID bytes.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Get the inner UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Render as `urn:uuid:<uuid>`.
    pub fn to_urn(&self) -> String {
        format!("{CREDENTIAL_ID_PREFIX}{}", self.0.hyphenated())
    }
}

impl fmt::Debug for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialId({})", self.0)
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_urn())
    }
}

impl FromStr for CredentialId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .strip_prefix(CREDENTIAL_ID_PREFIX)
            .ok_or_else(|| format!("credential id must start with {CREDENTIAL_ID_PREFIX}"))?;
        Uuid::parse_str(raw).map(Self).map_err(|e| e.to_string())
    }
}

impl Serialize for CredentialId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_urn())
    }
}

impl<'de> Deserialize<'de> for CredentialId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A UTC instant with whole-second precision.
///
/// Sub-second parts are dropped on construction, so two timestamps that
/// render identically also compare equal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current time, truncated to seconds.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Truncate a `DateTime` to seconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        // Seconds since the epoch always map back to a single UTC instant.
        let secs = dt.timestamp();
        match Utc.timestamp_opt(secs, 0).single() {
            Some(truncated) => Self(truncated),
            None => Self(dt),
        }
    }

    /// Create from Unix seconds. Returns `None` when out of range.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Unix seconds.
    pub fn unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Get the inner `DateTime`.
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_rfc3339_secs(&self) -> String {
        self.0.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.to_rfc3339_secs())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339_secs())
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let naive = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)?;
        Ok(Self(Utc.from_utc_datetime(&naive)))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339_secs())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
