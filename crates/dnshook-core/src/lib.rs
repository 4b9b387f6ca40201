// # dnshook-core
//
// Core library for the ACME DNS-01 challenge hook.
//
// ## Architecture Overview
//
// An ACME client invokes the hook with four positional arguments. This
// library turns those arguments into a DNS record change at a registrar:
// - **Invocation**: Validated arguments plus the hook-type gate
// - **Registrar**: Trait for fetching and replacing a domain's DNS entries
// - **RegistrarRegistry**: Plugin-based registry for registrar clients
// - **HookRunner**: Runs one invocation end to end and reports a `HookOutcome`
// - **records**: Pure record-set transforms for challenge start/stop
//
// ## Design Principles
//
// 1. **Exit code is the API**: every outcome maps to one stable exit code
// 2. **Whole-set replacement**: the registrar only ever receives a full record set
// 3. **Single-shot**: every registrar call is attempted exactly once
// 4. **Library-First**: the binary is a thin layer over `HookRunner`

pub mod config;
pub mod error;
pub mod hook;
pub mod records;
pub mod registry;
pub mod runner;
pub mod traits;

// Re-export core types for convenience
pub use config::{ChallengeConfig, HookConfig, RegistrarConfig};
pub use error::{Error, Result};
pub use hook::{HookName, Invocation, InvocationError};
pub use records::{DnsEntry, DnsEntryType, DomainInfo};
pub use registry::RegistrarRegistry;
pub use runner::{HookExitCode, HookOutcome, HookRunner};
pub use traits::{Registrar, RegistrarFactory};
