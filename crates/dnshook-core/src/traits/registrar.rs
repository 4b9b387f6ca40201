// # Registrar Trait
//
// Defines the interface for reading and replacing a domain's DNS records
// through a registrar API.
//
// ## Implementations
//
// - TransIP: `dnshook-registrar-transip` crate
//
// ## Usage
//
// ```rust,ignore
// use dnshook_core::{ChallengeConfig, Registrar};
//
// async fn publish(mut registrar: Box<dyn Registrar>) -> dnshook_core::Result<()> {
//     registrar.authenticate().await?;
//
//     let mut info = registrar.get_domain_info("example.com").await?;
//     let challenge = ChallengeConfig::default().entry_for("example.com", "abc123");
//     info.dns_entries.push(challenge);
//
//     registrar.set_dns_entries("example.com", &info.dns_entries).await
// }
// ```

use crate::config::RegistrarConfig;
use crate::records::{DnsEntry, DomainInfo};
use async_trait::async_trait;

/// Trait for registrar client implementations
///
/// The registrar stores a domain's records as one list. Replacing that list
/// with [`Registrar::set_dns_entries`] is the only mutation available; there
/// is no per-record update or delete.
///
/// # Single-Shot
///
/// Every method performs one exchange with the registrar and reports the
/// result. Implementations must not retry, back off or cache record sets.
/// The ACME client that invoked the hook is the retry boundary.
#[async_trait]
pub trait Registrar: Send + Sync {
    /// Establish an authenticated session
    ///
    /// Must succeed before any other call. Failures cover bad credentials,
    /// unreadable key material and an unreachable service alike.
    async fn authenticate(&mut self) -> Result<(), crate::Error>;

    /// Fetch the domain's current record set
    ///
    /// # Parameters
    ///
    /// - `domain`: The domain name as registered (e.g., "example.com")
    ///
    /// # Returns
    ///
    /// - `Ok(DomainInfo)`: The domain with its ordered DNS entries
    /// - `Err(Error)`: If the domain is unknown or the request failed
    async fn get_domain_info(&self, domain: &str) -> Result<DomainInfo, crate::Error>;

    /// Replace the domain's entire record set with `entries`
    ///
    /// # Parameters
    ///
    /// - `domain`: The domain name as registered
    /// - `entries`: The complete new record set, in order
    async fn set_dns_entries(&self, domain: &str, entries: &[DnsEntry])
    -> Result<(), crate::Error>;

    /// Get the registrar name (for logging/debugging)
    fn registrar_name(&self) -> &'static str;
}

/// Helper trait for constructing registrar clients from configuration
pub trait RegistrarFactory: Send + Sync {
    /// Create a Registrar instance from configuration
    ///
    /// Construction must not touch the network; that happens in
    /// [`Registrar::authenticate`].
    fn create(&self, config: &RegistrarConfig) -> Result<Box<dyn Registrar>, crate::Error>;
}
