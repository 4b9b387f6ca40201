//! DNS record model and challenge record-set transforms
//!
//! Registrars expose a domain's records as one ordered list that can only be
//! replaced as a whole. The functions here derive the next list from the
//! current one without doing any I/O.

use crate::hook::HookName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label that prefixes every ACME DNS-01 challenge record
pub const ACME_CHALLENGE_PREFIX: &str = "_acme-challenge";

/// TTL given to challenge records, in seconds
pub const CHALLENGE_TTL: u32 = 3600;

/// DNS record type
///
/// Types this crate does not know by name are kept verbatim in
/// [`DnsEntryType::Other`] so they are written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DnsEntryType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Txt,
    Srv,
    Sshfp,
    Tlsa,
    Caa,
    Naptr,
    Ds,
    Alias,
    Other(String),
}

impl DnsEntryType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &str {
        match self {
            DnsEntryType::A => "A",
            DnsEntryType::Aaaa => "AAAA",
            DnsEntryType::Cname => "CNAME",
            DnsEntryType::Mx => "MX",
            DnsEntryType::Ns => "NS",
            DnsEntryType::Txt => "TXT",
            DnsEntryType::Srv => "SRV",
            DnsEntryType::Sshfp => "SSHFP",
            DnsEntryType::Tlsa => "TLSA",
            DnsEntryType::Caa => "CAA",
            DnsEntryType::Naptr => "NAPTR",
            DnsEntryType::Ds => "DS",
            DnsEntryType::Alias => "ALIAS",
            DnsEntryType::Other(other) => other,
        }
    }
}

impl From<String> for DnsEntryType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "A" => DnsEntryType::A,
            "AAAA" => DnsEntryType::Aaaa,
            "CNAME" => DnsEntryType::Cname,
            "MX" => DnsEntryType::Mx,
            "NS" => DnsEntryType::Ns,
            "TXT" => DnsEntryType::Txt,
            "SRV" => DnsEntryType::Srv,
            "SSHFP" => DnsEntryType::Sshfp,
            "TLSA" => DnsEntryType::Tlsa,
            "CAA" => DnsEntryType::Caa,
            "NAPTR" => DnsEntryType::Naptr,
            "DS" => DnsEntryType::Ds,
            "ALIAS" => DnsEntryType::Alias,
            _ => DnsEntryType::Other(value),
        }
    }
}

impl From<DnsEntryType> for String {
    fn from(value: DnsEntryType) -> Self {
        match value {
            DnsEntryType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for DnsEntryType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DnsEntryType::from(s.to_string()))
    }
}

impl fmt::Display for DnsEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single DNS record as the registrar stores it
///
/// Entries have no identity beyond their field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsEntry {
    /// Record name, e.g. `www` or `_acme-challenge.example.com`
    pub name: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: DnsEntryType,
    /// Record value
    pub content: String,
}

impl DnsEntry {
    /// Create a new entry
    pub fn new(
        name: impl Into<String>,
        ttl: u32,
        record_type: DnsEntryType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ttl,
            record_type,
            content: content.into(),
        }
    }

    /// Whether this entry's name starts with `prefix`
    pub fn is_challenge(&self, prefix: &str) -> bool {
        self.name.starts_with(prefix)
    }
}

/// Registrar view of a domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    /// Domain name the entries belong to
    pub name: String,
    /// The domain's full, ordered record set
    pub dns_entries: Vec<DnsEntry>,
}

impl DomainInfo {
    /// Create domain info from a record set
    pub fn new(name: impl Into<String>, dns_entries: Vec<DnsEntry>) -> Self {
        Self {
            name: name.into(),
            dns_entries,
        }
    }
}

/// Append `entry` after every existing record
pub fn append_challenge(mut entries: Vec<DnsEntry>, entry: DnsEntry) -> Vec<DnsEntry> {
    entries.push(entry);
    entries
}

/// Drop every record whose name starts with `prefix`, keeping the rest in order
///
/// Removing from a set with no matching records returns it unchanged.
pub fn remove_challenges(entries: Vec<DnsEntry>, prefix: &str) -> Vec<DnsEntry> {
    entries
        .into_iter()
        .filter(|entry| !entry.is_challenge(prefix))
        .collect()
}

/// Derive the record set to submit for a hook
pub fn apply_hook(
    hook: HookName,
    entries: Vec<DnsEntry>,
    challenge: DnsEntry,
    prefix: &str,
) -> Vec<DnsEntry> {
    match hook {
        HookName::ChallengeDnsStart => append_challenge(entries, challenge),
        HookName::ChallengeDnsStop => remove_challenges(entries, prefix),
    }
}
