//! # Shared Module for AWS IoT Thing Provisioning
//!
//! Common types, errors, and configuration used by the provisioner crate.
//!
//! A provisioning run creates:
//! - a **thing** record with a random UUID name
//! - a **certificate** and key pair, stored under `certificates/<thing>/`
//! - a **principal attachment** from the thing to the certificate
//! - a **policy attachment** from the certificate to a named policy

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use config::*;
pub use constants::*;
pub use error::*;
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
