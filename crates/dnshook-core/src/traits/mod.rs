//! Core traits for the DNS hook
//!
//! - [`Registrar`]: Fetch and replace a domain's DNS record set

pub mod registrar;

pub use registrar::{Registrar, RegistrarFactory};
