//! # Configuration for AWS IoT Thing Provisioning
//!
//! Defaults are overlaid by environment variables, which the CLI in turn
//! overrides flag by flag.

use crate::constants::*;
use crate::error::{ProvisionError, ProvisionResult};
use crate::types::default_attributes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

// =============================================================================
// PROVISIONER CONFIGURATION
// =============================================================================

/// Configuration for a provisioning run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvisionerConfig {
    /// AWS region of the IoT control plane
    pub region: String,

    /// Base directory for per-thing credential directories
    pub certificates_dir: PathBuf,

    /// Thing type for the new record
    pub thing_type: String,

    /// Policy the certificate is attached to
    pub policy_name: String,

    /// Attribute payload for the new record
    pub attributes: BTreeMap<String, String>,

    /// Deadline for the whole run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.into(),
            certificates_dir: PathBuf::from(DEFAULT_CERTIFICATES_DIR),
            thing_type: DEFAULT_THING_TYPE.into(),
            policy_name: DEFAULT_POLICY_NAME.into(),
            attributes: default_attributes(),
            timeout_secs: None,
        }
    }
}

impl ProvisionerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ProvisionResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> ProvisionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(region) = lookup(ENV_REGION) {
            config.region = region;
        }

        if let Some(dir) = lookup(ENV_CERTIFICATES_DIR) {
            config.certificates_dir = PathBuf::from(dir);
        }

        if let Some(thing_type) = lookup(ENV_THING_TYPE) {
            config.thing_type = thing_type;
        }

        if let Some(policy) = lookup(ENV_POLICY_NAME) {
            config.policy_name = policy;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            let secs = timeout.trim().parse::<u64>().map_err(|e| {
                ProvisionError::Configuration(format!("{}={}: {}", ENV_TIMEOUT_SECS, timeout, e))
            })?;
            config.timeout_secs = Some(secs);
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ProvisionResult<()> {
        if self.region.trim().is_empty() {
            return Err(ProvisionError::Configuration("region must not be empty".into()));
        }

        if self.certificates_dir.as_os_str().is_empty() {
            return Err(ProvisionError::Configuration(
                "certificates directory must not be empty".into(),
            ));
        }

        validate_thing_type(&self.thing_type)?;
        validate_policy_name(&self.policy_name)?;
        validate_attributes(&self.attributes)?;

        if self.timeout_secs == Some(0) {
            return Err(ProvisionError::Configuration(
                "timeout must be at least one second".into(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Thing type names: `[a-zA-Z0-9:_-]{1,128}`
pub fn validate_thing_type(name: &str) -> ProvisionResult<()> {
    validate_name("thing type", name, MAX_THING_TYPE_LEN, |c| {
        c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-')
    })
}

/// Policy names: `[\w+=,.@-]{1,128}`
pub fn validate_policy_name(name: &str) -> ProvisionResult<()> {
    validate_name("policy name", name, MAX_POLICY_NAME_LEN, |c| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '=' | ',' | '.' | '@' | '-')
    })
}

fn validate_attributes(attributes: &BTreeMap<String, String>) -> ProvisionResult<()> {
    if attributes.len() > MAX_THING_ATTRIBUTES {
        return Err(ProvisionError::Configuration(format!(
            "at most {} attributes are allowed, got {}",
            MAX_THING_ATTRIBUTES,
            attributes.len()
        )));
    }

    if attributes.keys().any(|k| k.is_empty()) {
        return Err(ProvisionError::Configuration("attribute keys must not be empty".into()));
    }

    Ok(())
}

fn validate_name(what: &str, name: &str, max_len: usize, allowed: impl Fn(char) -> bool) -> ProvisionResult<()> {
    if name.is_empty() || name.len() > max_len {
        return Err(ProvisionError::Configuration(format!(
            "{} must be 1-{} characters, got {}",
            what,
            max_len,
            name.len()
        )));
    }

    if let Some(bad) = name.chars().find(|c| !allowed(*c)) {
        return Err(ProvisionError::Configuration(format!(
            "{} '{}' contains invalid character '{}'",
            what, name, bad
        )));
    }

    Ok(())
}

/// Parse a `KEY=VALUE` attribute argument
pub fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = ProvisionerConfig::default();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.thing_type, "FooType");
        assert_eq!(config.policy_name, "FooPolicy");
        assert_eq!(config.certificates_dir, PathBuf::from("certificates"));
        assert_eq!(config.attributes.len(), 1);
        assert!(config.timeout_secs.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_env_overrides() {
        let config = ProvisionerConfig::from_lookup(lookup_from(&[
            (ENV_REGION, "us-east-1"),
            (ENV_THING_TYPE, "SensorA"),
            (ENV_POLICY_NAME, "SensorPolicy"),
            (ENV_CERTIFICATES_DIR, "/var/lib/certs"),
            (ENV_TIMEOUT_SECS, "30"),
        ]))
        .unwrap();

        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.thing_type, "SensorA");
        assert_eq!(config.policy_name, "SensorPolicy");
        assert_eq!(config.certificates_dir, PathBuf::from("/var/lib/certs"));
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn test_bad_timeout_env() {
        let err = ProvisionerConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_validate_names() {
        validate_thing_type("Sensor_A:v2-x").unwrap();
        assert!(validate_thing_type("").is_err());
        assert!(validate_thing_type("has space").is_err());
        assert!(validate_thing_type(&"a".repeat(129)).is_err());

        validate_policy_name("Sensor.Policy+1@eu=x,y").unwrap();
        assert!(validate_policy_name("bad/policy").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ProvisionerConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_attribute() {
        assert_eq!(
            parse_attribute("room=kitchen").unwrap(),
            ("room".to_string(), "kitchen".to_string())
        );
        assert_eq!(parse_attribute("k=").unwrap(), ("k".to_string(), String::new()));
        assert!(parse_attribute("novalue").is_err());
        assert!(parse_attribute("=x").is_err());
    }
}
