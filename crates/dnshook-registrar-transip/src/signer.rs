//! Request signing for TransIP authentication
//!
//! TransIP issues access tokens in exchange for a request body signed with
//! the account's RSA private key (PKCS#1 v1.5 padding, SHA-512 digest). The
//! signature travels base64-encoded in the `Signature` header.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ring::rand::SystemRandom;
use ring::signature::{KeyPair, RSA_PKCS1_SHA512, RsaKeyPair};
use std::path::Path;
use thiserror::Error;

/// PEM tag of a PKCS#8 private key, as the TransIP control panel hands it out
const PKCS8_TAG: &str = "PRIVATE KEY";

/// PEM tag of a traditional PKCS#1 RSA key
const PKCS1_TAG: &str = "RSA PRIVATE KEY";

/// Errors loading or using the signing key
#[derive(Error, Debug)]
pub enum KeyError {
    /// Key file could not be read
    #[error("failed to read private key {path}: {source}")]
    Read {
        /// Key file path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Key file is not PEM
    #[error("private key is not valid PEM: {0}")]
    Pem(String),

    /// PEM block is not an RSA private key
    #[error("unsupported private key type '{0}' (expected 'PRIVATE KEY' or 'RSA PRIVATE KEY')")]
    UnsupportedType(String),

    /// Key material was rejected
    #[error("private key rejected: {0}")]
    Rejected(String),

    /// Signing failed
    #[error("failed to sign request")]
    Sign,
}

impl From<KeyError> for dnshook_core::Error {
    fn from(err: KeyError) -> Self {
        dnshook_core::Error::auth(err.to_string())
    }
}

/// Signs authentication requests with the account's private key
///
/// The Debug implementation intentionally does NOT expose key material.
pub struct RequestSigner {
    key_pair: RsaKeyPair,
    rng: SystemRandom,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key_pair", &"<REDACTED>")
            .field("modulus_bits", &(self.key_pair.public().modulus_len() * 8))
            .finish()
    }
}

impl RequestSigner {
    /// Load a signer from a PEM key file
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, KeyError> {
        let path = path.as_ref();
        let pem_bytes = std::fs::read(path).map_err(|source| KeyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_pem(&pem_bytes)
    }

    /// Load a signer from PEM text
    ///
    /// Accepts PKCS#8 (`PRIVATE KEY`) and PKCS#1 (`RSA PRIVATE KEY`) blocks.
    pub fn from_pem(pem_bytes: &[u8]) -> Result<Self, KeyError> {
        let block = pem::parse(pem_bytes).map_err(|e| KeyError::Pem(e.to_string()))?;

        let key_pair = match block.tag() {
            PKCS8_TAG => RsaKeyPair::from_pkcs8(block.contents()),
            PKCS1_TAG => RsaKeyPair::from_der(block.contents()),
            other => return Err(KeyError::UnsupportedType(other.to_string())),
        }
        .map_err(|e| KeyError::Rejected(e.to_string()))?;

        Ok(Self {
            key_pair,
            rng: SystemRandom::new(),
        })
    }

    /// Sign `body` and return the base64-encoded signature
    pub fn sign(&self, body: &[u8]) -> Result<String, KeyError> {
        let mut signature = vec![0u8; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(&RSA_PKCS1_SHA512, &self.rng, body, &mut signature)
            .map_err(|_| KeyError::Sign)?;
        Ok(STANDARD.encode(signature))
    }

    /// DER-encoded public key matching the signing key
    pub fn public_key_der(&self) -> &[u8] {
        self.key_pair.public_key().as_ref()
    }
}
