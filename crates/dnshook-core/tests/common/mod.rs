//! Test doubles and common utilities for hook contract tests
//!
//! The fake registrar keeps its record set in shared state, so consecutive
//! runs observe what earlier runs submitted, just as the real registrar would.

#![allow(dead_code)]

use dnshook_core::config::{ChallengeConfig, HookConfig, RegistrarConfig};
use dnshook_core::error::{Error, Result};
use dnshook_core::traits::{Registrar, RegistrarFactory};
use dnshook_core::{DnsEntry, DnsEntryType, DomainInfo, HookRunner, RegistrarRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Which registrar call should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Create,
    Authenticate,
    Fetch,
    Submit,
}

/// Registrar-side state shared between the test and every fake client
#[derive(Clone, Default)]
pub struct FakeRegistrarState {
    entries: Arc<Mutex<Vec<DnsEntry>>>,
    submissions: Arc<Mutex<Vec<Vec<DnsEntry>>>>,
    fail_at: Arc<Mutex<Option<FailAt>>>,
    create_calls: Arc<AtomicUsize>,
    authenticate_calls: Arc<AtomicUsize>,
    fetch_calls: Arc<AtomicUsize>,
    submit_calls: Arc<AtomicUsize>,
}

impl FakeRegistrarState {
    pub fn with_entries(entries: Vec<DnsEntry>) -> Self {
        let state = Self::default();
        *state.entries.lock().unwrap() = entries;
        state
    }

    pub fn fail_at(&self, step: FailAt) {
        *self.fail_at.lock().unwrap() = Some(step);
    }

    pub fn entries(&self) -> Vec<DnsEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<Vec<DnsEntry>> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn authenticate_calls(&self) -> usize {
        self.authenticate_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// Total number of registrar interactions of any kind
    pub fn total_calls(&self) -> usize {
        self.create_calls() + self.authenticate_calls() + self.fetch_calls() + self.submit_calls()
    }

    fn should_fail(&self, step: FailAt) -> bool {
        *self.fail_at.lock().unwrap() == Some(step)
    }
}

/// A fake registrar client backed by [`FakeRegistrarState`]
pub struct FakeRegistrar {
    state: FakeRegistrarState,
    authenticated: bool,
}

#[async_trait::async_trait]
impl Registrar for FakeRegistrar {
    async fn authenticate(&mut self) -> Result<()> {
        self.state.authenticate_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.should_fail(FailAt::Authenticate) {
            return Err(Error::auth("signature rejected"));
        }
        self.authenticated = true;
        Ok(())
    }

    async fn get_domain_info(&self, domain: &str) -> Result<DomainInfo> {
        assert!(self.authenticated, "fetch before authenticate");
        self.state.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.should_fail(FailAt::Fetch) {
            return Err(Error::not_found(format!("Domain not found: {}", domain)));
        }
        Ok(DomainInfo::new(domain, self.state.entries()))
    }

    async fn set_dns_entries(&self, _domain: &str, entries: &[DnsEntry]) -> Result<()> {
        assert!(self.authenticated, "submit before authenticate");
        self.state.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.should_fail(FailAt::Submit) {
            return Err(Error::provider("fake", "Registrar unavailable"));
        }
        self.state.submissions.lock().unwrap().push(entries.to_vec());
        *self.state.entries.lock().unwrap() = entries.to_vec();
        Ok(())
    }

    fn registrar_name(&self) -> &'static str {
        "fake"
    }
}

/// Factory handing out fake clients over one shared state
pub struct FakeRegistrarFactory {
    state: FakeRegistrarState,
}

impl RegistrarFactory for FakeRegistrarFactory {
    fn create(&self, _config: &RegistrarConfig) -> Result<Box<dyn Registrar>> {
        self.state.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.should_fail(FailAt::Create) {
            return Err(Error::auth("Failed to read private key"));
        }
        Ok(Box::new(FakeRegistrar {
            state: self.state.clone(),
            authenticated: false,
        }))
    }
}

/// Build a runner wired to the fake registrar
pub fn fake_runner(state: &FakeRegistrarState) -> HookRunner {
    let registry = RegistrarRegistry::new();
    registry.register_registrar(
        "fake",
        Box::new(FakeRegistrarFactory {
            state: state.clone(),
        }),
    );

    HookRunner::new(
        registry,
        HookConfig::new(RegistrarConfig::Custom {
            factory: "fake".to_string(),
            config: serde_json::json!({}),
        }),
    )
}

pub fn www() -> DnsEntry {
    DnsEntry::new("www", 300, DnsEntryType::A, "1.2.3.4")
}

pub fn challenge(host: &str, value: impl Into<String>) -> DnsEntry {
    ChallengeConfig::default().entry_for(host, value)
}

pub fn mx() -> DnsEntry {
    DnsEntry::new("@", 86400, DnsEntryType::Mx, "10 mail.example.com.")
}

pub fn start_args(host: &str, value: &str) -> [String; 4] {
    [
        "challenge-dns-start".to_string(),
        host.to_string(),
        "ignored".to_string(),
        value.to_string(),
    ]
}

pub fn stop_args(host: &str) -> [String; 4] {
    [
        "challenge-dns-stop".to_string(),
        host.to_string(),
        "ignored".to_string(),
        "abc123".to_string(),
    ]
}
