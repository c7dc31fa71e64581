//! # Shared Data Types for AWS IoT Thing Provisioning
//!
//! Inputs and outputs of the four provisioning steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::constants::*;

// =============================================================================
// THING RECORD
// =============================================================================

/// Request to create a thing record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThingRegistration {
    /// Randomly generated unique name (UUID v4, hyphenated)
    pub thing_name: String,

    /// Thing type the record is created under
    pub thing_type: String,

    /// Attribute payload
    pub attributes: BTreeMap<String, String>,

    /// Merge the payload with any attributes already stored
    pub merge: bool,
}

impl ThingRegistration {
    /// Create a registration with a fresh random name and the given attributes
    pub fn with_attributes(
        thing_type: impl Into<String>,
        attributes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            thing_name: Uuid::new_v4().to_string(),
            thing_type: thing_type.into(),
            attributes,
            merge: true,
        }
    }
}

/// Attribute set applied when the caller supplies none
pub fn default_attributes() -> BTreeMap<String, String> {
    BTreeMap::from([(
        DEFAULT_ATTRIBUTE_KEY.to_string(),
        DEFAULT_ATTRIBUTE_VALUE.to_string(),
    )])
}

/// What the service returned for a created thing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedThing {
    pub thing_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_id: Option<String>,
}

// =============================================================================
// CREDENTIAL BUNDLE
// =============================================================================

/// Key pair and certificate issued by the service
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    /// Certificate ID
    pub certificate_id: String,

    /// Certificate ARN, the principal used for linking
    pub certificate_arn: String,

    /// PEM encoded certificate
    pub certificate_pem: String,

    /// PEM encoded public key
    pub public_key: String,

    /// PEM encoded private key
    pub private_key: String,
}

impl CredentialBundle {
    /// Files to write, in write order
    pub fn files(&self) -> [(&'static str, &str); 3] {
        [
            (CERTIFICATE_FILE, self.certificate_pem.as_str()),
            (PUBLIC_KEY_FILE, self.public_key.as_str()),
            (PRIVATE_KEY_FILE, self.private_key.as_str()),
        ]
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("certificate_id", &self.certificate_id)
            .field("certificate_arn", &self.certificate_arn)
            .field("certificate_pem", &format_args!("<{} bytes>", self.certificate_pem.len()))
            .field("public_key", &format_args!("<{} bytes>", self.public_key.len()))
            .field("private_key", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// PROVISIONING REPORT
// =============================================================================

/// Summary of a successful provisioning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningReport {
    pub thing_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_id: Option<String>,
    pub thing_type: String,
    pub certificate_id: String,
    pub certificate_arn: String,
    pub credential_dir: PathBuf,
    pub policy_name: String,
    pub provisioned_at: DateTime<Utc>,
}
