//! Plugin-based registrar registry
//!
//! The registry allows registrar clients to be registered dynamically at
//! startup, avoiding hardcoded if-else chains in the binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dnshook_core::registry::RegistrarRegistry;
//! use dnshook_core::config::RegistrarConfig;
//!
//! // Create a registry
//! let registry = RegistrarRegistry::new();
//!
//! // Register registrars
//! registry.register_registrar("transip", Box::new(transip_factory));
//!
//! // Create a registrar client from config
//! let config = RegistrarConfig::Transip { ... };
//! let registrar = registry.create_registrar(&config)?;
//! ```
//!
//! ## Registration
//!
//! Implementations should register themselves during initialization:
//!
//! ```rust,ignore
//! // In dnshook-registrar-transip crate
//! pub fn register(registry: &RegistrarRegistry) {
//!     registry.register_registrar("transip", Box::new(TransipFactory));
//! }
//! ```

use crate::config::RegistrarConfig;
use crate::error::{Error, Result};
use crate::traits::{Registrar, RegistrarFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Registry for plugin-based registrar creation
///
/// Maps registrar type names to factory objects, so the client is picked by
/// configuration at runtime.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct RegistrarRegistry {
    /// Registered registrar factories
    registrars: RwLock<HashMap<String, Box<dyn RegistrarFactory>>>,
}

impl RegistrarRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a registrar factory
    ///
    /// # Parameters
    ///
    /// - `name`: Registrar type name (e.g., "transip")
    /// - `factory`: Factory object for creating registrar clients
    ///
    /// Registering a name twice replaces the earlier factory.
    pub fn register_registrar(
        &self,
        name: impl Into<String>,
        factory: Box<dyn RegistrarFactory>,
    ) {
        let name = name.into();
        tracing::debug!("Registering registrar: {}", name);
        self.registrars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, factory);
    }

    /// Create a registrar client from configuration
    ///
    /// The configuration is validated before the factory is consulted.
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Registrar>)`: Created client, not yet authenticated
    /// - `Err(Error)`: If the config is invalid, the type is not registered or creation fails
    pub fn create_registrar(&self, config: &RegistrarConfig) -> Result<Box<dyn Registrar>> {
        config.validate()?;

        let registrar_type = config.type_name();
        let registrars = self
            .registrars
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = registrars
            .get(registrar_type)
            .ok_or_else(|| Error::config(format!("Unknown registrar type: {}", registrar_type)))?;

        factory.create(config)
    }

    /// List all registered registrar types
    pub fn list_registrars(&self) -> Vec<String> {
        let registrars = self
            .registrars
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        registrars.keys().cloned().collect()
    }

    /// Check if a registrar type is registered
    pub fn has_registrar(&self, name: &str) -> bool {
        let registrars = self
            .registrars
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        registrars.contains_key(name)
    }
}
