//! # AWS IoT Thing Provisioner
//!
//! Provisions one AWS IoT thing per run:
//! - Creates a thing record with a random UUID name
//! - Issues an active key pair and certificate
//! - Stores the PEM files under `certificates/<thing-name>/`
//! - Attaches the certificate to the thing and to a policy
//!
//! All remote calls go through [`IotApi`]; [`AwsIotClient`] is the
//! production implementation.

pub mod credential;
pub mod iot;
pub mod linking;
pub mod registration;
pub mod storage;
pub mod workflow;

// Re-export commonly used types
pub use credential::{CredentialIssuer, IssuedCredentials};
pub use iot::{AwsIotClient, IotApi};
pub use linking::PrincipalLinker;
pub use registration::ThingRegistrar;
pub use storage::CredentialStore;
pub use workflow::Provisioner;
