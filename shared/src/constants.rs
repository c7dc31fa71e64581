//! # Constants for AWS IoT Thing Provisioning
//!
//! Defaults, file names, and service limits used by the provisioner.

// =============================================================================
// SERVICE DEFAULTS
// =============================================================================

/// AWS region used when none is configured
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Thing type used when the caller does not supply one
pub const DEFAULT_THING_TYPE: &str = "FooType";

/// Policy the certificate is attached to when none is supplied
pub const DEFAULT_POLICY_NAME: &str = "FooPolicy";

/// Attribute set on every new thing record
pub const DEFAULT_ATTRIBUTE_KEY: &str = "Key";

/// Value of [`DEFAULT_ATTRIBUTE_KEY`]
pub const DEFAULT_ATTRIBUTE_VALUE: &str = "AttributeValue";

// =============================================================================
// SERVICE LIMITS
// =============================================================================

/// Maximum length of a thing type name
pub const MAX_THING_TYPE_LEN: usize = 128;

/// Maximum length of a policy name
pub const MAX_POLICY_NAME_LEN: usize = 128;

/// Maximum number of attributes in a thing's attribute payload
pub const MAX_THING_ATTRIBUTES: usize = 50;

// =============================================================================
// LOCAL CREDENTIAL STORAGE
// =============================================================================

/// Base directory holding one sub-directory per provisioned thing
pub const DEFAULT_CERTIFICATES_DIR: &str = "certificates";

/// PEM certificate file name
pub const CERTIFICATE_FILE: &str = "certificate.pem.crt";

/// PEM public key file name
pub const PUBLIC_KEY_FILE: &str = "public.pem.key";

/// PEM private key file name
pub const PRIVATE_KEY_FILE: &str = "private.pem.key";

/// Unix mode of a per-thing credential directory
pub const CREDENTIAL_DIR_MODE: u32 = 0o770;

/// Unix mode of the certificate and public key files (before umask)
pub const CREDENTIAL_FILE_MODE: u32 = 0o644;

/// Unix mode of the private key file
pub const PRIVATE_KEY_FILE_MODE: u32 = 0o600;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// Overrides the AWS region
pub const ENV_REGION: &str = "THING_PROVISIONER_REGION";

/// Overrides the certificates base directory
pub const ENV_CERTIFICATES_DIR: &str = "THING_PROVISIONER_CERTS_DIR";

/// Overrides the default thing type
pub const ENV_THING_TYPE: &str = "THING_PROVISIONER_TYPE";

/// Overrides the default policy name
pub const ENV_POLICY_NAME: &str = "THING_PROVISIONER_POLICY";

/// Deadline for the whole provisioning run, in seconds
pub const ENV_TIMEOUT_SECS: &str = "THING_PROVISIONER_TIMEOUT_SECS";
