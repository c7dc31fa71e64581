//! # Thing Registration
//!
//! Creates the thing record for a provisioning run:
//! 1. Generate a random UUID name
//! 2. Call CreateThing with the type and attribute payload (merge = true)
//! 3. Return the created record

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use shared::{
    config::validate_thing_type,
    error::{ProvisionError, ProvisionResult},
    types::{CreatedThing, ThingRegistration},
};

use crate::iot::IotApi;

/// Registers new thing records
pub struct ThingRegistrar {
    api: Arc<dyn IotApi>,
}

impl ThingRegistrar {
    /// Create a new ThingRegistrar
    pub fn new(api: Arc<dyn IotApi>) -> Self {
        Self { api }
    }

    /// Register a thing of `thing_type` under a freshly generated name
    pub async fn register(
        &self,
        thing_type: &str,
        attributes: BTreeMap<String, String>,
    ) -> ProvisionResult<CreatedThing> {
        validate_thing_type(thing_type)?;

        let request = ThingRegistration::with_attributes(thing_type, attributes);

        info!(
            thing_name = %request.thing_name,
            thing_type = %request.thing_type,
            "Creating thing"
        );

        let created = self
            .api
            .create_thing(&request)
            .await
            .map_err(ProvisionError::ThingCreation)?;

        info!(
            thing_name = %created.thing_name,
            thing_arn = created.thing_arn.as_deref().unwrap_or("-"),
            "Thing created"
        );

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iot::mock::{Call, MockIot, Op};
    use shared::{error::RemoteError, types::default_attributes};
    use std::collections::HashSet;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_register_sends_type_and_attributes() {
        let mock = Arc::new(MockIot::new());
        let registrar = ThingRegistrar::new(mock.clone());

        let created = registrar.register("SensorA", default_attributes()).await.unwrap();
        assert!(Uuid::parse_str(&created.thing_name).is_ok());

        match mock.calls().as_slice() {
            [Call::CreateThing(request)] => {
                assert_eq!(request.thing_name, created.thing_name);
                assert_eq!(request.thing_type, "SensorA");
                assert!(request.merge);
                assert_eq!(request.attributes, default_attributes());
            }
            other => panic!("unexpected calls: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_names_are_unique() {
        let mock = Arc::new(MockIot::new());
        let registrar = ThingRegistrar::new(mock.clone());

        let mut names = HashSet::new();
        for _ in 0..100 {
            let created = registrar.register("SensorA", default_attributes()).await.unwrap();
            names.insert(created.thing_name);
        }
        assert_eq!(names.len(), 100);
        assert_eq!(mock.count(Op::CreateThing), 100);
    }

    #[tokio::test]
    async fn test_register_failure_is_returned() {
        let mock = Arc::new(MockIot::failing(
            Op::CreateThing,
            RemoteError::service("ResourceNotFoundException", "thing type FooType not found"),
        ));
        let registrar = ThingRegistrar::new(mock);

        let err = registrar.register("FooType", default_attributes()).await.unwrap_err();
        assert!(matches!(err, ProvisionError::ThingCreation(_)));
        assert!(err.to_string().contains("ResourceNotFoundException"));
    }

    #[tokio::test]
    async fn test_invalid_type_skips_remote_call() {
        let mock = Arc::new(MockIot::new());
        let registrar = ThingRegistrar::new(mock.clone());

        assert!(registrar.register("bad type", default_attributes()).await.is_err());
        assert!(mock.calls().is_empty());
    }
}
