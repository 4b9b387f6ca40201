//! Hook runner
//!
//! The HookRunner carries one invocation through its fixed sequence:
//!
//! ```text
//! arguments ──▶ hook gate ──▶ authenticate ──▶ fetch ──▶ transform ──▶ submit
//!     │             │              │             │                      │
//!     ▼             ▼              ▼             ▼                      ▼
//!   Usage    UnsupportedHook  ClientFailed  FetchFailed           SubmitFailed
//!   (255)         (42)            (1)           (2)                    (3)
//! ```
//!
//! Every step either succeeds or ends the run with a [`HookOutcome`]. Exit
//! codes are assigned in exactly one place, [`HookOutcome::exit_code`], so
//! nothing below the binary's `main` terminates the process.

use crate::config::HookConfig;
use crate::error::Error;
use crate::hook::{Invocation, InvocationError};
use crate::records;
use crate::registry::RegistrarRegistry;
use std::process::ExitCode;
use tracing::{debug, info, warn};

/// Process exit codes understood by the calling ACME client
///
/// These values are an external contract:
/// - 0: Hook ran successfully
/// - 42: Hook type not supported (not a failure)
/// - any other value: failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HookExitCode {
    /// Record set submitted
    Success = 0,
    /// Registrar client could not be created or authenticated
    ClientError = 1,
    /// Domain records could not be fetched
    FetchError = 2,
    /// Updated records could not be submitted
    SubmitError = 3,
    /// Hook name not recognized
    UnsupportedHook = 42,
    /// Wrong number of arguments (the status a `-1` exit produces on POSIX)
    Usage = 255,
}

impl HookExitCode {
    /// Numeric process status
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<HookExitCode> for ExitCode {
    fn from(code: HookExitCode) -> Self {
        ExitCode::from(code.code())
    }
}

/// Result of one hook run
#[derive(Debug)]
pub enum HookOutcome {
    /// New record set submitted
    Success {
        /// Number of entries in the submitted set
        submitted: usize,
    },
    /// Wrong number of arguments
    Usage(InvocationError),
    /// Hook name is not a DNS challenge hook
    UnsupportedHook(String),
    /// Registrar client creation or authentication failed
    ClientFailed(Error),
    /// Fetching the domain's records failed
    FetchFailed(Error),
    /// Submitting the new record set failed
    SubmitFailed(Error),
}

impl HookOutcome {
    /// The exit code this outcome maps to
    pub fn exit_code(&self) -> HookExitCode {
        match self {
            HookOutcome::Success { .. } => HookExitCode::Success,
            HookOutcome::Usage(_) => HookExitCode::Usage,
            HookOutcome::UnsupportedHook(_) => HookExitCode::UnsupportedHook,
            HookOutcome::ClientFailed(_) => HookExitCode::ClientError,
            HookOutcome::FetchFailed(_) => HookExitCode::FetchError,
            HookOutcome::SubmitFailed(_) => HookExitCode::SubmitError,
        }
    }

    /// Human-readable diagnostic for standard error
    ///
    /// `None` for outcomes the ACME client must not see as errors.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            HookOutcome::Success { .. } | HookOutcome::UnsupportedHook(_) => None,
            HookOutcome::Usage(err) => Some(err.to_string()),
            HookOutcome::ClientFailed(err) => Some(format!("error creating client\n{}", err)),
            HookOutcome::FetchFailed(err) => {
                Some(format!("error obtaining domain information\n{}", err))
            }
            HookOutcome::SubmitFailed(err) => Some(format!("error updating DNS entries\n{}", err)),
        }
    }

    /// Whether the ACME client should treat this run as successful
    pub fn is_success(&self) -> bool {
        matches!(self, HookOutcome::Success { .. })
    }
}

/// Runs DNS-01 challenge hooks against a registrar
pub struct HookRunner {
    /// Registered registrar factories
    registry: RegistrarRegistry,

    /// Registrar and challenge settings
    config: HookConfig,
}

impl HookRunner {
    /// Create a new runner
    pub fn new(registry: RegistrarRegistry, config: HookConfig) -> Self {
        Self { registry, config }
    }

    /// Run one invocation from raw process arguments (program name excluded)
    ///
    /// The argument count and hook name are checked before any registrar is
    /// created, so usage errors and unsupported hooks never reach the network.
    pub async fn run<I, S>(&self, args: I) -> HookOutcome
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match Invocation::from_args(args) {
            Ok(invocation) => self.execute(&invocation).await,
            Err(InvocationError::UnsupportedHook(name)) => {
                debug!("Ignoring unsupported hook: '{}'", name);
                HookOutcome::UnsupportedHook(name)
            }
            Err(err) => HookOutcome::Usage(err),
        }
    }

    /// Run a validated invocation
    ///
    /// Each registrar call is attempted exactly once.
    pub async fn execute(&self, invocation: &Invocation) -> HookOutcome {
        let host_name = invocation.host_name.as_str();
        info!("Running {} for {}", invocation.hook, host_name);

        if let Err(e) = self.config.validate() {
            warn!("Invalid hook configuration: {}", e);
            return HookOutcome::ClientFailed(e);
        }

        // Step 1: Create and authenticate the registrar client
        let mut registrar = match self.registry.create_registrar(&self.config.registrar) {
            Ok(registrar) => registrar,
            Err(e) => {
                warn!("Failed to create registrar client: {}", e);
                return HookOutcome::ClientFailed(e);
            }
        };

        if let Err(e) = registrar.authenticate().await {
            warn!(
                "Authentication with {} failed: {}",
                registrar.registrar_name(),
                e
            );
            return HookOutcome::ClientFailed(e);
        }

        // Step 2: Fetch the current record set
        let domain = match registrar.get_domain_info(host_name).await {
            Ok(domain) => domain,
            Err(e) => {
                warn!("Failed to fetch DNS entries for {}: {}", host_name, e);
                return HookOutcome::FetchFailed(e);
            }
        };

        let existing = domain.dns_entries.len();
        debug!("{} has {} DNS entries", host_name, existing);

        // Step 3: Derive the new record set
        let challenge = &self.config.challenge;
        let entries = records::apply_hook(
            invocation.hook,
            domain.dns_entries,
            challenge.entry_for(host_name, &invocation.dns_challenge_value),
            &challenge.record_prefix,
        );

        info!(
            "Submitting {} DNS entries for {} (was {})",
            entries.len(),
            host_name,
            existing
        );

        // Step 4: Replace the record set
        if let Err(e) = registrar.set_dns_entries(host_name, &entries).await {
            warn!("Failed to submit DNS entries for {}: {}", host_name, e);
            return HookOutcome::SubmitFailed(e);
        }

        info!("{} completed for {}", invocation.hook, host_name);
        HookOutcome::Success {
            submitted: entries.len(),
        }
    }
}
