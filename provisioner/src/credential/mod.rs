//! # Credential Issuance
//!
//! Requests an active key pair and certificate and persists it under the
//! thing's credential directory. The directory is checked before the
//! remote call and created only after it succeeds, so an existing
//! directory costs no certificate and a failed request leaves no directory.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use shared::{
    error::{ProvisionError, ProvisionResult},
    types::CredentialBundle,
};

use crate::iot::IotApi;
use crate::storage::CredentialStore;

/// Credentials issued for a thing and where they were written
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    pub bundle: CredentialBundle,
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Issues and stores certificates
pub struct CredentialIssuer {
    api: Arc<dyn IotApi>,
    store: CredentialStore,
}

impl CredentialIssuer {
    /// Create a new CredentialIssuer
    pub fn new(api: Arc<dyn IotApi>, store: CredentialStore) -> Self {
        Self { api, store }
    }

    /// Issue an active certificate for `thing_name` and write it to disk
    pub async fn issue(&self, thing_name: &str) -> ProvisionResult<IssuedCredentials> {
        self.store.ensure_available(thing_name).await?;

        let bundle = self
            .api
            .create_keys_and_certificate(true)
            .await
            .map_err(ProvisionError::KeysAndCertificate)?;

        info!(
            certificate_id = %bundle.certificate_id,
            "Keys and certificate created"
        );

        let written = async {
            let dir = self.store.create_thing_dir(thing_name).await?;
            let files = self.store.write_credentials(thing_name, &dir, &bundle).await?;
            Ok::<_, ProvisionError>((dir, files))
        }
        .await;

        match written {
            Ok((dir, files)) => Ok(IssuedCredentials { bundle, dir, files }),
            Err(e) => {
                warn!(
                    certificate_id = %bundle.certificate_id,
                    "Certificate is active but its credentials were not stored"
                );
                Err(e)
            }
        }
    }
}
