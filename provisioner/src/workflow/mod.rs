//! # Provisioning Workflow
//!
//! Runs the four steps in order, each feeding the next:
//!
//! 1. Register the thing
//! 2. Issue and store its certificate
//! 3. Attach the certificate to the thing
//! 4. Attach the certificate to the policy
//!
//! The first failure ends the run. Nothing created by earlier steps is
//! rolled back; the leftovers are logged so an operator can clean up.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use shared::{
    config::ProvisionerConfig,
    error::{ProvisionError, ProvisionResult},
    types::ProvisioningReport,
};

use crate::credential::CredentialIssuer;
use crate::iot::IotApi;
use crate::linking::PrincipalLinker;
use crate::registration::ThingRegistrar;
use crate::storage::CredentialStore;

/// Drives a single provisioning run
pub struct Provisioner {
    config: ProvisionerConfig,
    registrar: ThingRegistrar,
    issuer: CredentialIssuer,
    linker: PrincipalLinker,
}

impl Provisioner {
    /// Create a new Provisioner
    pub fn new(api: Arc<dyn IotApi>, config: ProvisionerConfig) -> Self {
        let store = CredentialStore::new(config.certificates_dir.clone());

        Self {
            registrar: ThingRegistrar::new(api.clone()),
            issuer: CredentialIssuer::new(api.clone(), store),
            linker: PrincipalLinker::new(api),
            config,
        }
    }

    /// Run, honouring the configured deadline if any
    pub async fn run_with_deadline(&self) -> ProvisionResult<ProvisioningReport> {
        match self.config.timeout_secs {
            Some(secs) => self.run_within(Duration::from_secs(secs)).await,
            None => self.run().await,
        }
    }

    /// Run, abandoning the in-flight request once `timeout` elapses
    pub async fn run_within(&self, timeout: Duration) -> ProvisionResult<ProvisioningReport> {
        tokio::time::timeout(timeout, self.run())
            .await
            .map_err(|_| ProvisionError::Timeout { timeout })?
    }

    /// Run all four steps
    pub async fn run(&self) -> ProvisionResult<ProvisioningReport> {
        self.config.validate()?;

        info!(
            thing_type = %self.config.thing_type,
            policy_name = %self.config.policy_name,
            "Provisioning thing"
        );

        let thing = self
            .registrar
            .register(&self.config.thing_type, self.config.attributes.clone())
            .await
            .map_err(|e| log_failure(e, &[]))?;

        let issued = self
            .issuer
            .issue(&thing.thing_name)
            .await
            .map_err(|e| log_failure(e, &[("thing", thing.thing_name.as_str())]))?;

        let certificate_arn = issued.bundle.certificate_arn.as_str();
        let leftovers = [
            ("thing", thing.thing_name.as_str()),
            ("certificate", certificate_arn),
        ];

        self.linker
            .attach_thing_to_certificate(&thing.thing_name, certificate_arn)
            .await
            .map_err(|e| log_failure(e, &leftovers))?;

        self.linker
            .attach_certificate_to_policy(&self.config.policy_name, certificate_arn)
            .await
            .map_err(|e| log_failure(e, &leftovers))?;

        info!(
            thing_name = %thing.thing_name,
            certificate_id = %issued.bundle.certificate_id,
            "Thing provisioned"
        );

        Ok(ProvisioningReport {
            thing_name: thing.thing_name,
            thing_arn: thing.thing_arn,
            thing_id: thing.thing_id,
            thing_type: self.config.thing_type.clone(),
            certificate_id: issued.bundle.certificate_id.clone(),
            certificate_arn: issued.bundle.certificate_arn.clone(),
            credential_dir: issued.dir,
            policy_name: self.config.policy_name.clone(),
            provisioned_at: Utc::now(),
        })
    }
}

fn log_failure(err: ProvisionError, leftovers: &[(&str, &str)]) -> ProvisionError {
    error!(category = err.category(), error = %err, "Provisioning step failed");
    for (kind, id) in leftovers {
        warn!(resource = %kind, id = %id, "Left in place, remove manually if unwanted");
    }
    err
}
