//! TransIP REST API v6 wire types

use dnshook_core::{DnsEntry, DnsEntryType};
use serde::{Deserialize, Serialize};

/// Body of `POST /auth`
///
/// Field order is part of the signed payload; the exact serialized bytes are
/// what gets signed and sent.
#[derive(Debug, Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub login: &'a str,
    pub nonce: String,
    pub read_only: bool,
    pub expiration_time: &'a str,
    pub label: String,
    pub global_key: bool,
}

/// Response of `POST /auth`
#[derive(Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
}

/// A DNS entry as TransIP represents it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransipDnsEntry {
    /// Record name
    pub name: String,
    /// TTL in seconds
    pub expire: u32,
    /// Record type
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Record value
    pub content: String,
}

impl From<TransipDnsEntry> for DnsEntry {
    fn from(entry: TransipDnsEntry) -> Self {
        DnsEntry::new(
            entry.name,
            entry.expire,
            DnsEntryType::from(entry.entry_type),
            entry.content,
        )
    }
}

impl From<&DnsEntry> for TransipDnsEntry {
    fn from(entry: &DnsEntry) -> Self {
        Self {
            name: entry.name.clone(),
            expire: entry.ttl,
            entry_type: entry.record_type.to_string(),
            content: entry.content.clone(),
        }
    }
}

/// Body of `GET` and `PUT /domains/{domain}/dns`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DnsEntriesBody {
    pub dns_entries: Vec<TransipDnsEntry>,
}

/// Error body returned with non-2xx responses
#[derive(Deserialize)]
pub(crate) struct ApiError {
    pub error: String,
}
