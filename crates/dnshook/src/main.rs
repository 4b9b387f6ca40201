// # dnshook - ACME DNS-01 challenge hook
//
// This binary is a THIN integration layer. All hook logic lives in
// dnshook-core; this file only:
// 1. Reads deployment configuration from environment variables
// 2. Initializes logging and a single-threaded runtime
// 3. Registers registrar clients
// 4. Runs the HookRunner and turns its outcome into an exit code
//
// ## Invocation
//
// ```bash
// dnshook <hookName> <hostName> <verificationFilename> <dnsChallengeValue>
// ```
//
// ## Configuration
//
// - `DNSHOOK_REGISTRAR`: Registrar type (default: transip)
// - `DNSHOOK_ACCOUNT_NAME`: Registrar account name
// - `DNSHOOK_PRIVATE_KEY_PATH`: PEM private key (default: transip-priv.key)
// - `DNSHOOK_API_URL`: API base URL override (optional)
// - `DNSHOOK_MODE`: `dry-run` to skip submitting changes
// - `DNSHOOK_LOG_LEVEL`: trace, debug, info, warn, error (default: warn)
//
// ## Example
//
// ```bash
// export DNSHOOK_ACCOUNT_NAME=myaccount
// export DNSHOOK_PRIVATE_KEY_PATH=/etc/dnshook/transip.key
//
// dnshook challenge-dns-start example.com ignored abc123
// ```
//
// Reading the environment never fails. Configuration is validated when the
// registrar client is created, so a bad setting exits with 1 and can never
// mask the usage (255) or unsupported-hook (42) exits.

use anyhow::{Context, Result};
use dnshook_core::{HookConfig, HookExitCode, HookRunner, RegistrarConfig, RegistrarRegistry};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
struct Config {
    registrar: String,
    account_name: String,
    private_key_path: PathBuf,
    api_url: Option<String>,
    dry_run: bool,
    log_level: Level,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            registrar: lookup("DNSHOOK_REGISTRAR")
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "transip".to_string()),
            account_name: lookup("DNSHOOK_ACCOUNT_NAME").unwrap_or_default(),
            private_key_path: lookup("DNSHOOK_PRIVATE_KEY_PATH")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("transip-priv.key")),
            api_url: lookup("DNSHOOK_API_URL").filter(|s| !s.is_empty()),
            dry_run: lookup("DNSHOOK_MODE")
                .unwrap_or_default()
                .eq_ignore_ascii_case("dry-run"),
            log_level: parse_log_level(&lookup("DNSHOOK_LOG_LEVEL").unwrap_or_default()),
        }
    }

    /// Build the hook configuration handed to the runner
    fn hook_config(&self) -> HookConfig {
        let registrar = match self.registrar.as_str() {
            "transip" => RegistrarConfig::Transip {
                account_name: self.account_name.clone(),
                private_key_path: self.private_key_path.clone(),
                api_url: self.api_url.clone(),
                dry_run: self.dry_run,
            },
            other => RegistrarConfig::Custom {
                factory: other.to_string(),
                config: serde_json::json!({
                    "account_name": self.account_name,
                    "private_key_path": self.private_key_path,
                    "api_url": self.api_url,
                    "dry_run": self.dry_run,
                }),
            },
        };

        HookConfig::new(registrar)
    }
}

fn parse_log_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Send all log output to stderr; stdout stays clean for the ACME client
fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")
}

/// Decode hook arguments without panicking on non-UTF-8 input
///
/// Undecodable bytes become U+FFFD, so such a hook name is simply unsupported
/// and the argument count is still checked.
fn hook_args(args: impl IntoIterator<Item = OsString>) -> Vec<String> {
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

fn build_registry() -> RegistrarRegistry {
    let registry = RegistrarRegistry::new();

    #[cfg(feature = "transip")]
    dnshook_registrar_transip::register(&registry);

    registry
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")
}

fn main() -> ExitCode {
    let config = Config::from_env();

    if let Err(e) = init_tracing(config.log_level) {
        eprintln!("{:#}", e);
    }

    debug!(
        "Registrar: {} (dry-run: {})",
        config.registrar, config.dry_run
    );

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error creating client\n{:#}", e);
            return HookExitCode::ClientError.into();
        }
    };

    let runner = HookRunner::new(build_registry(), config.hook_config());
    let outcome = runtime.block_on(runner.run(hook_args(env::args_os().skip(1))));

    if let Some(diagnostic) = outcome.diagnostic() {
        eprintln!("{}", diagnostic);
    }

    outcome.exit_code().into()
}
