//! # IoT Control Plane Access
//!
//! The four remote operations a provisioning run needs, behind the
//! [`IotApi`] trait. [`AwsIotClient`] talks to AWS IoT; tests use an
//! in-memory recorder.

mod aws;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

use shared::{
    error::RemoteError,
    types::{CreatedThing, CredentialBundle, ThingRegistration},
};

pub use aws::AwsIotClient;

/// Remote IoT management operations
#[async_trait]
pub trait IotApi: Send + Sync {
    /// Create a thing record
    async fn create_thing(&self, request: &ThingRegistration) -> Result<CreatedThing, RemoteError>;

    /// Issue a new key pair and certificate
    async fn create_keys_and_certificate(
        &self,
        set_as_active: bool,
    ) -> Result<CredentialBundle, RemoteError>;

    /// Attach a principal (certificate ARN) to a thing
    async fn attach_thing_principal(&self, thing_name: &str, principal: &str) -> Result<(), RemoteError>;

    /// Attach a policy to a principal (certificate ARN)
    async fn attach_policy(&self, policy_name: &str, principal: &str) -> Result<(), RemoteError>;
}
