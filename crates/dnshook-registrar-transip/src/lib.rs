// # TransIP Registrar
//
// This crate provides a TransIP registrar client for the DNS hook.
//
// ## Behaviour
//
// - One HTTP request per trait call; no retry, no backoff, no caching
// - Signed-nonce authentication, token kept for the lifetime of the client
// - Specific error handling for HTTP status codes (401/403, 404, 406/409, 429, 5xx)
// - Dry-run mode: records are fetched, the replacement is only logged
// - 30 second HTTP timeout
//
// ## Security Requirements
//
// - Access token and key material NEVER appear in logs or Debug output
// - The key is read from a file path supplied by deployment configuration
//
// ## API Reference
//
// - TransIP REST API v6: https://api.transip.nl/rest/docs.html
// - Authenticate: POST `/auth` (body signed, `Signature` header)
// - List DNS entries: GET `/domains/:domain/dns`
// - Replace DNS entries: PUT `/domains/:domain/dns`

pub mod signer;
pub mod types;

use async_trait::async_trait;
use dnshook_core::config::RegistrarConfig;
use dnshook_core::traits::{Registrar, RegistrarFactory};
use dnshook_core::{DnsEntry, DomainInfo, Error, Result};
use std::path::Path;
use std::time::Duration;

pub use signer::{KeyError, RequestSigner};
pub use types::TransipDnsEntry;

use types::{ApiError, AuthRequest, AuthResponse, DnsEntriesBody};

/// TransIP API base URL
pub const TRANSIP_API_BASE: &str = "https://api.transip.nl/v6";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Lifetime requested for access tokens; one hook run needs a few seconds
const TOKEN_EXPIRATION: &str = "30 minutes";

/// Registrar name used in logs and errors
const REGISTRAR_NAME: &str = "transip";

/// TransIP registrar client
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Authenticate and fetch DNS entries as usual
/// - Log the record set it would submit
/// - **NOT** replace the domain's DNS entries
pub struct TransipRegistrar {
    /// Account (login) name
    account_name: String,

    /// Signs the authentication request
    signer: RequestSigner,

    /// API base URL without trailing slash
    api_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Access token obtained by `authenticate`
    /// ⚠️ NEVER log this value
    token: Option<String>,

    /// Dry-run mode: if true, skip the PUT that replaces entries
    dry_run: bool,
}

// Custom Debug implementation that hides the access token
impl std::fmt::Debug for TransipRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransipRegistrar")
            .field("account_name", &self.account_name)
            .field("signer", &self.signer)
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<REDACTED>"))
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl TransipRegistrar {
    /// Create a new TransIP client
    ///
    /// # Parameters
    ///
    /// - `account_name`: TransIP login name
    /// - `signer`: Signer holding the account's private key
    /// - `api_url`: API base URL, `None` for the public endpoint
    /// - `dry_run`: If true, fetch entries but never replace them
    pub fn new(
        account_name: impl Into<String>,
        signer: RequestSigner,
        api_url: Option<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let account_name = account_name.into();
        if account_name.is_empty() {
            return Err(Error::config("TransIP account name cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        let api_url = api_url
            .unwrap_or_else(|| TRANSIP_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            account_name,
            signer,
            api_url,
            client,
            token: None,
            dry_run,
        })
    }

    /// Create a client whose signer is loaded from a PEM key file
    pub fn from_key_file(
        account_name: impl Into<String>,
        private_key_path: impl AsRef<Path>,
        api_url: Option<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let signer = RequestSigner::from_pem_file(private_key_path)?;
        Self::new(account_name, signer, api_url, dry_run)
    }

    /// Whether the client is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Whether `authenticate` has succeeded
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// API base URL in use
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// URL of the domain's DNS entry collection
    ///
    /// The domain is percent-encoded as a single path segment.
    fn dns_url(&self, domain: &str) -> Result<reqwest::Url> {
        if matches!(domain, "" | "." | "..") {
            return Err(Error::invalid_input(format!("Invalid domain name: '{}'", domain)));
        }

        let mut url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| Error::config(format!("Invalid TransIP API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("Invalid TransIP API URL: {}", self.api_url)))?
            .pop_if_empty()
            .extend(["domains", domain, "dns"]);

        Ok(url)
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| Error::auth("Not authenticated with TransIP"))
    }

    /// Label identifying the access token in the TransIP control panel
    ///
    /// Labels must be unique per account, so a timestamp and nonce fragment
    /// are included.
    fn token_label(nonce: &str) -> String {
        format!(
            "dnshook-{}-{}",
            chrono::Utc::now().format("%Y%m%d%H%M%S"),
            &nonce[..8]
        )
    }
}

/// Map a non-success response to an error
///
/// `subject` names what was requested, for 404 messages.
async fn error_for_status(response: reqwest::Response, subject: &str) -> Error {
    let status = response.status();
    let error_text = match response.text().await {
        Ok(body) => serde_json::from_str::<ApiError>(&body)
            .map(|e| e.error)
            .unwrap_or(body),
        Err(_) => "Unable to read error response".to_string(),
    };

    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "TransIP rejected the credentials: {} - {}",
            status, error_text
        )),
        404 => Error::not_found(format!("{}: {}", subject, error_text)),
        406 | 409 => Error::provider(
            REGISTRAR_NAME,
            format!("Request not accepted: {} - {}", status, error_text),
        ),
        429 => Error::rate_limited(format!(
            "TransIP rate limit exceeded: {} - {}",
            status, error_text
        )),
        500..=599 => Error::provider(
            REGISTRAR_NAME,
            format!("TransIP server error (transient): {} - {}", status, error_text),
        ),
        _ => Error::provider(
            REGISTRAR_NAME,
            format!("Unexpected response: {} - {}", status, error_text),
        ),
    }
}

fn request_failed(e: reqwest::Error) -> Error {
    Error::provider(REGISTRAR_NAME, format!("HTTP request failed: {}", e))
}

fn parse_failed(e: reqwest::Error) -> Error {
    Error::provider(REGISTRAR_NAME, format!("Failed to parse response: {}", e))
}

#[async_trait]
impl Registrar for TransipRegistrar {
    /// Obtain an access token
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /auth
    /// Signature: <base64 RSA-SHA512 signature of the body>
    /// {"login": "...", "nonce": "...", "read_only": false,
    ///  "expiration_time": "30 minutes", "label": "...", "global_key": true}
    /// ```
    async fn authenticate(&mut self) -> Result<()> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let request = AuthRequest {
            login: &self.account_name,
            label: Self::token_label(&nonce),
            nonce,
            read_only: false,
            expiration_time: TOKEN_EXPIRATION,
            global_key: true,
        };

        // The signature covers these exact bytes, so they are sent as-is.
        let body = serde_json::to_vec(&request)?;
        let signature = self.signer.sign(&body)?;

        tracing::debug!("Requesting TransIP access token for {}", self.account_name);

        let response = self
            .client
            .post(format!("{}/auth", self.api_url))
            .header("Content-Type", "application/json")
            .header("Signature", signature)
            .body(body)
            .send()
            .await
            .map_err(request_failed)?;

        if !response.status().is_success() {
            return Err(error_for_status(response, "Authentication endpoint").await);
        }

        let auth: AuthResponse = response
            .json()
            .await
            .map_err(parse_failed)?;

        self.token = Some(auth.token);
        tracing::debug!("Obtained TransIP access token");
        Ok(())
    }

    /// Fetch the domain's DNS entries
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /domains/:domain/dns
    /// Authorization: Bearer <token>
    /// ```
    async fn get_domain_info(&self, domain: &str) -> Result<DomainInfo> {
        let url = self.dns_url(domain)?;
        tracing::debug!("Fetching DNS entries: GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(self.token()?)
            .send()
            .await
            .map_err(request_failed)?;

        if !response.status().is_success() {
            return Err(error_for_status(response, domain).await);
        }

        let body: DnsEntriesBody = response
            .json()
            .await
            .map_err(parse_failed)?;

        tracing::debug!("{} has {} DNS entries", domain, body.dns_entries.len());

        Ok(DomainInfo::new(
            domain,
            body.dns_entries.into_iter().map(DnsEntry::from).collect(),
        ))
    }

    /// Replace all DNS entries of the domain
    ///
    /// # API Call (skipped in dry-run mode)
    ///
    /// ```http
    /// PUT /domains/:domain/dns
    /// Authorization: Bearer <token>
    /// {"dnsEntries": [{"name": "...", "expire": 3600, "type": "TXT", "content": "..."}]}
    /// ```
    async fn set_dns_entries(&self, domain: &str, entries: &[DnsEntry]) -> Result<()> {
        let url = self.dns_url(domain)?;
        let token = self.token()?;
        let payload = DnsEntriesBody {
            dns_entries: entries.iter().map(TransipDnsEntry::from).collect(),
        };

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(&payload)?
            );
            return Ok(());
        }

        tracing::info!("Replacing {} DNS entries for {}", entries.len(), domain);

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(request_failed)?;

        if !response.status().is_success() {
            return Err(error_for_status(response, domain).await);
        }

        tracing::info!("DNS entries replaced successfully for {}", domain);
        Ok(())
    }

    fn registrar_name(&self) -> &'static str {
        REGISTRAR_NAME
    }
}

/// Factory for creating TransIP clients
pub struct TransipFactory;

impl RegistrarFactory for TransipFactory {
    fn create(&self, config: &RegistrarConfig) -> Result<Box<dyn Registrar>> {
        match config {
            RegistrarConfig::Transip {
                account_name,
                private_key_path,
                api_url,
                dry_run,
            } => {
                if *dry_run {
                    tracing::warn!(
                        "TransIP registrar running in DRY-RUN mode - no changes will be made"
                    );
                }

                Ok(Box::new(TransipRegistrar::from_key_file(
                    account_name.clone(),
                    private_key_path,
                    api_url.clone(),
                    *dry_run,
                )?))
            }
            _ => Err(Error::config("Invalid config for TransIP registrar")),
        }
    }
}

/// Register the TransIP registrar with a registry
///
/// # Example
///
/// ```rust
/// use dnshook_core::RegistrarRegistry;
///
/// let registry = RegistrarRegistry::new();
/// dnshook_registrar_transip::register(&registry);
/// assert!(registry.has_registrar("transip"));
/// ```
pub fn register(registry: &dnshook_core::RegistrarRegistry) {
    registry.register_registrar(REGISTRAR_NAME, Box::new(TransipFactory));
}
