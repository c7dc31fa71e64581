//! # Principal Linking
//!
//! Attaches the issued certificate (the principal) to the thing record and
//! to an existing policy. The certificate ARN is passed through unchanged.

use std::sync::Arc;
use tracing::info;

use shared::error::{ProvisionError, ProvisionResult};

use crate::iot::IotApi;

/// Links certificates to things and policies
pub struct PrincipalLinker {
    api: Arc<dyn IotApi>,
}

impl PrincipalLinker {
    /// Create a new PrincipalLinker
    pub fn new(api: Arc<dyn IotApi>) -> Self {
        Self { api }
    }

    /// Attach the certificate to the thing
    pub async fn attach_thing_to_certificate(
        &self,
        thing_name: &str,
        certificate_arn: &str,
    ) -> ProvisionResult<()> {
        self.api
            .attach_thing_principal(thing_name, certificate_arn)
            .await
            .map_err(ProvisionError::AttachThingPrincipal)?;

        info!(
            thing_name = %thing_name,
            principal = %certificate_arn,
            "Thing and certificate attached"
        );
        Ok(())
    }

    /// Attach the certificate to a pre-existing policy
    pub async fn attach_certificate_to_policy(
        &self,
        policy_name: &str,
        certificate_arn: &str,
    ) -> ProvisionResult<()> {
        self.api
            .attach_policy(policy_name, certificate_arn)
            .await
            .map_err(|source| ProvisionError::AttachPolicy {
                policy_name: policy_name.to_string(),
                source,
            })?;

        info!(
            policy_name = %policy_name,
            principal = %certificate_arn,
            "Certificate and policy attached"
        );
        Ok(())
    }
}
