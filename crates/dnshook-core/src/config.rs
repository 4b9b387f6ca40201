//! Configuration types for the DNS hook
//!
//! Credentials and registrar selection are deployment configuration. They are
//! injected into [`crate::HookRunner`] rather than read from the command line,
//! which stays reserved for the four positional hook arguments.

use crate::records::{ACME_CHALLENGE_PREFIX, CHALLENGE_TTL, DnsEntry, DnsEntryType};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main hook configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookConfig {
    /// Registrar client configuration
    pub registrar: RegistrarConfig,

    /// Shape of the challenge record
    #[serde(default)]
    pub challenge: ChallengeConfig,
}

impl HookConfig {
    /// Create a configuration for the given registrar with default challenge settings
    pub fn new(registrar: RegistrarConfig) -> Self {
        Self {
            registrar,
            challenge: ChallengeConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.registrar.validate()?;
        self.challenge.validate()?;
        Ok(())
    }
}

/// Registrar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistrarConfig {
    /// TransIP REST API
    Transip {
        /// Account (login) name
        account_name: String,
        /// Path to the PEM private key registered with the account
        private_key_path: PathBuf,
        /// API base URL override (defaults to the public endpoint)
        #[serde(default)]
        api_url: Option<String>,
        /// Fetch records but never submit changes
        #[serde(default)]
        dry_run: bool,
    },

    /// Custom registrar
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl RegistrarConfig {
    /// Validate the registrar configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            RegistrarConfig::Transip {
                account_name,
                private_key_path,
                api_url,
                ..
            } => {
                if account_name.is_empty() {
                    return Err(crate::Error::config("TransIP account name cannot be empty"));
                }
                if private_key_path.as_os_str().is_empty() {
                    return Err(crate::Error::config(
                        "TransIP private key path cannot be empty",
                    ));
                }
                if let Some(url) = api_url
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "TransIP API URL must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                Ok(())
            }
            RegistrarConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom registrar factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom registrar config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the registrar type name
    pub fn type_name(&self) -> &str {
        match self {
            RegistrarConfig::Transip { .. } => "transip",
            RegistrarConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        RegistrarConfig::Transip {
            account_name: String::new(),
            private_key_path: PathBuf::from("transip-priv.key"),
            api_url: None,
            dry_run: false,
        }
    }
}

/// Challenge record settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeConfig {
    /// Name prefix of challenge records; also the removal match on stop
    #[serde(default = "default_record_prefix")]
    pub record_prefix: String,

    /// TTL of the published TXT record, in seconds
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl ChallengeConfig {
    /// Validate the challenge settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.record_prefix.is_empty() {
            // An empty prefix would make stop wipe the whole zone.
            return Err(crate::Error::config("Challenge record prefix cannot be empty"));
        }
        if self.ttl == 0 {
            return Err(crate::Error::config("Challenge record TTL must be > 0"));
        }
        Ok(())
    }

    /// Build the TXT entry published for `host_name`
    pub fn entry_for(&self, host_name: &str, value: impl Into<String>) -> DnsEntry {
        DnsEntry::new(
            format!("{}.{}", self.record_prefix, host_name),
            self.ttl,
            DnsEntryType::Txt,
            value,
        )
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            record_prefix: default_record_prefix(),
            ttl: default_ttl(),
        }
    }
}

fn default_record_prefix() -> String {
    ACME_CHALLENGE_PREFIX.to_string()
}

fn default_ttl() -> u32 {
    CHALLENGE_TTL
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transip(account_name: &str) -> RegistrarConfig {
        RegistrarConfig::Transip {
            account_name: account_name.to_string(),
            private_key_path: PathBuf::from("transip-priv.key"),
            api_url: None,
            dry_run: false,
        }
    }

    #[test]
    fn test_default_challenge_matches_constants() {
        let entry = ChallengeConfig::default().entry_for("example.com", "abc123");
        assert_eq!(
            entry,
            DnsEntry::new("_acme-challenge.example.com", 3600, DnsEntryType::Txt, "abc123")
        );
    }

    #[test]
    fn test_transip_requires_account() {
        assert!(transip("").validate().is_err());
        assert!(transip("HELP").validate().is_ok());
    }

    #[test]
    fn test_transip_rejects_bad_url_scheme() {
        let config = RegistrarConfig::Transip {
            account_name: "HELP".to_string(),
            private_key_path: PathBuf::from("key.pem"),
            api_url: Some("ftp://api.example".to_string()),
            dry_run: false,
        };
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_custom_requires_factory() {
        let config = RegistrarConfig::Custom {
            factory: String::new(),
            config: serde_json::json!({}),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(transip("HELP").type_name(), "transip");
        let custom = RegistrarConfig::Custom {
            factory: "fake".to_string(),
            config: serde_json::json!({}),
        };
        assert_eq!(custom.type_name(), "fake");
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let challenge = ChallengeConfig {
            record_prefix: String::new(),
            ttl: 3600,
        };
        assert!(challenge.validate().is_err());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: HookConfig = serde_json::from_value(serde_json::json!({
            "registrar": {
                "type": "transip",
                "account_name": "HELP",
                "private_key_path": "/etc/dnshook/transip.key",
            }
        }))
        .unwrap();

        assert_eq!(config.challenge, ChallengeConfig::default());
        assert!(config.validate().is_ok());
    }
}
