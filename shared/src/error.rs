//! # Error Types for AWS IoT Thing Provisioning
//!
//! Every step of a provisioning run returns a [`ProvisionError`]. Failures of
//! the remote IoT service are first classified into a [`RemoteError`] so that
//! the service's error code survives into the final message.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// REMOTE SERVICE ERRORS
// =============================================================================

/// A failure reported by (or on the way to) the remote IoT service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The service answered with a recognised error code
    #[error("{code} - {message}")]
    Service {
        code: String,
        message: String,
        /// Full text of the underlying SDK error
        origin: Option<String>,
    },

    /// Anything else: dispatch failure, timeout, malformed response
    #[error("{message}")]
    Opaque { message: String },
}

impl RemoteError {
    /// Build a classified service error
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        RemoteError::Service {
            code: code.into(),
            message: message.into(),
            origin: None,
        }
    }

    /// Attach the underlying error's full text to a service error
    pub fn with_origin(self, text: impl Into<String>) -> Self {
        match self {
            RemoteError::Service { code, message, .. } => RemoteError::Service {
                code,
                message,
                origin: Some(text.into()),
            },
            opaque => opaque,
        }
    }

    /// Build an unclassified error
    pub fn opaque(message: impl Into<String>) -> Self {
        RemoteError::Opaque {
            message: message.into(),
        }
    }

    /// Service error code, if the error was classifiable
    pub fn code(&self) -> Option<&str> {
        match self {
            RemoteError::Service { code, .. } => Some(code),
            RemoteError::Opaque { .. } => None,
        }
    }

    /// Underlying error text kept alongside a classified error
    pub fn origin(&self) -> Option<&str> {
        match self {
            RemoteError::Service { origin, .. } => origin.as_deref(),
            RemoteError::Opaque { .. } => None,
        }
    }

    /// Code, message, and underlying error joined for reporting
    pub fn detailed(&self) -> String {
        match self.origin() {
            Some(origin) => format!("{} - {}", self, origin),
            None => self.to_string(),
        }
    }

    /// Human readable message
    pub fn message(&self) -> &str {
        match self {
            RemoteError::Service { message, .. } | RemoteError::Opaque { message } => message,
        }
    }
}

// =============================================================================
// PROVISIONING ERRORS
// =============================================================================

/// Main error type for a provisioning run
#[derive(Error, Debug)]
pub enum ProvisionError {
    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// The thing record could not be created
    #[error("failed to create thing: {0}")]
    ThingCreation(RemoteError),

    // =========================================================================
    // CREDENTIALS
    // =========================================================================

    /// The service refused to issue keys and a certificate
    #[error("failed to create keys and certificate w/ context: {0}")]
    KeysAndCertificate(RemoteError),

    /// A credential directory for this thing is already on disk
    #[error("credential directory {} already exists", path.display())]
    CredentialDirExists { path: PathBuf },

    /// The per-thing credential directory could not be created
    #[error("failed to create certificate folder {thing_name}: {reason}")]
    CertificateFolder { thing_name: String, reason: String },

    /// One of the PEM files could not be written
    #[error("failed to write certificate for thing {thing_name}: {reason}")]
    CertificateWrite { thing_name: String, reason: String },

    // =========================================================================
    // LINKING
    // =========================================================================

    /// The certificate could not be attached to the thing
    #[error("failed to attach thing principal w/ context: {0}")]
    AttachThingPrincipal(RemoteError),

    /// The certificate could not be attached to the policy
    #[error("failed to attach certificate to policy {policy_name} w/ context: {}", source.detailed())]
    AttachPolicy {
        policy_name: String,
        source: RemoteError,
    },

    // =========================================================================
    // CONFIGURATION / INPUT
    // =========================================================================

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid value passed to an operation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The caller-imposed deadline elapsed
    #[error("provisioning timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Result type alias using ProvisionError
pub type ProvisionResult<T> = Result<T, ProvisionError>;

// =============================================================================
// ERROR CATEGORIES (for logging)
// =============================================================================

impl ProvisionError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ProvisionError::ThingCreation(_) => "registration",

            ProvisionError::KeysAndCertificate(_) => "credential",

            ProvisionError::CredentialDirExists { .. }
            | ProvisionError::CertificateFolder { .. }
            | ProvisionError::CertificateWrite { .. } => "storage",

            ProvisionError::AttachThingPrincipal(_)
            | ProvisionError::AttachPolicy { .. } => "linking",

            ProvisionError::Configuration(_)
            | ProvisionError::InvalidRequest(_) => "config",

            ProvisionError::Timeout { .. } => "internal",
        }
    }

    /// The remote error behind this failure, if any
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            ProvisionError::ThingCreation(e)
            | ProvisionError::KeysAndCertificate(e)
            | ProvisionError::AttachThingPrincipal(e)
            | ProvisionError::AttachPolicy { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::service("ResourceAlreadyExistsException", "thing exists");
        assert_eq!(err.to_string(), "ResourceAlreadyExistsException - thing exists");
        assert_eq!(err.code(), Some("ResourceAlreadyExistsException"));

        let err = RemoteError::opaque("dispatch failure");
        assert_eq!(err.to_string(), "dispatch failure");
        assert_eq!(err.code(), None);
        assert_eq!(err.message(), "dispatch failure");
    }

    #[test]
    fn test_attach_policy_reports_origin() {
        let source = RemoteError::service("UnauthorizedException", "not allowed")
            .with_origin("UnauthorizedException: not allowed (request id: 7f3c)");
        assert_eq!(source.origin(), Some("UnauthorizedException: not allowed (request id: 7f3c)"));
        assert_eq!(source.to_string(), "UnauthorizedException - not allowed");

        let err = ProvisionError::AttachPolicy {
            policy_name: "SensorPolicy".into(),
            source,
        };
        assert_eq!(
            err.to_string(),
            "failed to attach certificate to policy SensorPolicy w/ context: \
             UnauthorizedException - not allowed - \
             UnauthorizedException: not allowed (request id: 7f3c)"
        );

        let opaque = RemoteError::opaque("timeout").with_origin("ignored");
        assert_eq!(opaque.origin(), None);
        assert_eq!(opaque.detailed(), "timeout");
    }

    #[test]
    fn test_keys_and_certificate_message() {
        let err = ProvisionError::KeysAndCertificate(RemoteError::service(
            "ThrottlingException",
            "Rate exceeded",
        ));
        let msg = err.to_string();
        assert!(msg.contains("failed to create keys and certificate"));
        assert!(msg.contains("ThrottlingException - Rate exceeded"));
    }

    #[test]
    fn test_attach_policy_keeps_source() {
        let err = ProvisionError::AttachPolicy {
            policy_name: "SensorPolicy".into(),
            source: RemoteError::service("ResourceNotFoundException", "no such policy"),
        };
        assert!(err.to_string().contains("SensorPolicy"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.remote().and_then(|e| e.code()), Some("ResourceNotFoundException"));
    }

    #[test]
    fn test_error_category() {
        let err = ProvisionError::ThingCreation(RemoteError::opaque("boom"));
        assert_eq!(err.category(), "registration");

        let err = ProvisionError::CredentialDirExists { path: "certificates/x".into() };
        assert_eq!(err.category(), "storage");
        assert!(err.remote().is_none());

        let err = ProvisionError::AttachThingPrincipal(RemoteError::opaque("boom"));
        assert_eq!(err.category(), "linking");
    }
}
