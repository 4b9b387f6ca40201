//! Hook invocation parsing
//!
//! An ACME client calls the hook with exactly four positional arguments:
//!
//! ```text
//! <hookName> <hostName> <verificationFilename> <dnsChallengeValue>
//! ```
//!
//! Parsing happens in two gates. The argument count is checked first, then
//! the hook name. Only `challenge-dns-start` and `challenge-dns-stop` pass;
//! every other name is reported as [`InvocationError::UnsupportedHook`],
//! which the ACME client reads as "event type not supported" rather than
//! as a failure.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of positional arguments expected after the program name
pub const EXPECTED_ARGS: usize = 4;

/// Errors produced while validating an invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// Wrong number of positional arguments
    #[error(
        "Wrong number of arguments supplied ({supplied}/{expected}). Please supply:\n\
         > Hook name, e.g. 'challenge-dns-start'\n\
         > Hostname, e.g. example.com\n\
         > Filename that causes the verification to happen\n\
         > DNS TXT value that should be set",
        expected = EXPECTED_ARGS
    )]
    WrongArgumentCount {
        /// Number of arguments actually supplied
        supplied: usize,
    },

    /// Hook name is not one of the DNS challenge hooks
    #[error("Unsupported hook: '{0}'")]
    UnsupportedHook(String),
}

/// The hook types this program acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookName {
    /// Publish the challenge record
    ChallengeDnsStart,
    /// Remove the challenge record
    ChallengeDnsStop,
}

impl HookName {
    /// The name the ACME client passes on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            HookName::ChallengeDnsStart => "challenge-dns-start",
            HookName::ChallengeDnsStop => "challenge-dns-stop",
        }
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookName {
    type Err = InvocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "challenge-dns-start" => Ok(HookName::ChallengeDnsStart),
            "challenge-dns-stop" => Ok(HookName::ChallengeDnsStop),
            other => Err(InvocationError::UnsupportedHook(other.to_string())),
        }
    }
}

/// A validated hook invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Which hook the ACME client fired
    pub hook: HookName,
    /// Domain name, used both as registrar lookup key and record suffix
    pub host_name: String,
    /// Accepted for positional compatibility; never read
    pub verification_filename: String,
    /// TXT value to publish on start
    pub dns_challenge_value: String,
}

impl Invocation {
    /// Build an invocation from the process arguments, program name excluded
    ///
    /// # Errors
    ///
    /// - [`InvocationError::WrongArgumentCount`] unless exactly four arguments are given
    /// - [`InvocationError::UnsupportedHook`] if the first argument is not a DNS challenge hook
    pub fn from_args<I, S>(args: I) -> Result<Self, InvocationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        let [hook, host_name, verification_filename, dns_challenge_value]: [String; EXPECTED_ARGS] =
            args.try_into()
                .map_err(|args: Vec<String>| InvocationError::WrongArgumentCount {
                    supplied: args.len(),
                })?;

        Ok(Self {
            hook: hook.parse()?,
            host_name,
            verification_filename,
            dns_challenge_value,
        })
    }
}
