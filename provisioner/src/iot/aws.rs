//! AWS IoT implementation of [`IotApi`] on top of `aws-sdk-iot`.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_iot::config::Region;
use aws_sdk_iot::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_iot::types::AttributePayload;
use tracing::{debug, info};

use shared::{
    config::ProvisionerConfig,
    error::RemoteError,
    types::{CreatedThing, CredentialBundle, ThingRegistration},
};

use super::IotApi;

/// AWS IoT control plane client
#[derive(Clone)]
pub struct AwsIotClient {
    client: aws_sdk_iot::Client,
}

impl AwsIotClient {
    /// Build a client from ambient credentials and the configured region
    pub async fn new(config: &ProvisionerConfig) -> Self {
        info!(region = %config.region, "Initializing AWS IoT client");

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self::from_client(aws_sdk_iot::Client::new(&sdk_config))
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: aws_sdk_iot::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IotApi for AwsIotClient {
    async fn create_thing(&self, request: &ThingRegistration) -> Result<CreatedThing, RemoteError> {
        let payload = AttributePayload::builder()
            .set_attributes(Some(request.attributes.clone().into_iter().collect()))
            .merge(request.merge)
            .build();

        let output = self
            .client
            .create_thing()
            .thing_name(&request.thing_name)
            .thing_type_name(&request.thing_type)
            .attribute_payload(payload)
            .send()
            .await
            .map_err(classify)?;

        debug!(output = ?output, "CreateThing succeeded");

        Ok(CreatedThing {
            thing_name: output
                .thing_name()
                .unwrap_or(request.thing_name.as_str())
                .to_string(),
            thing_arn: output.thing_arn().map(str::to_string),
            thing_id: output.thing_id().map(str::to_string),
        })
    }

    async fn create_keys_and_certificate(
        &self,
        set_as_active: bool,
    ) -> Result<CredentialBundle, RemoteError> {
        let output = self
            .client
            .create_keys_and_certificate()
            .set_as_active(set_as_active)
            .send()
            .await
            .map_err(classify)?;

        let key_pair = output
            .key_pair()
            .ok_or_else(|| RemoteError::opaque("response is missing the key pair"))?;

        Ok(CredentialBundle {
            certificate_id: required(output.certificate_id(), "certificate id")?,
            certificate_arn: required(output.certificate_arn(), "certificate ARN")?,
            certificate_pem: required(output.certificate_pem(), "certificate PEM")?,
            public_key: required(key_pair.public_key(), "public key")?,
            private_key: required(key_pair.private_key(), "private key")?,
        })
    }

    async fn attach_thing_principal(&self, thing_name: &str, principal: &str) -> Result<(), RemoteError> {
        self.client
            .attach_thing_principal()
            .thing_name(thing_name)
            .principal(principal)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn attach_policy(&self, policy_name: &str, principal: &str) -> Result<(), RemoteError> {
        self.client
            .attach_policy()
            .policy_name(policy_name)
            .target(principal)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }
}

/// Split SDK failures into coded service errors and everything else
fn classify<E, R>(err: SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some(code) => RemoteError::service(code, err.message().unwrap_or_default())
            .with_origin(DisplayErrorContext(&err).to_string()),
        None => RemoteError::opaque(DisplayErrorContext(&err).to_string()),
    }
}

fn required(value: Option<&str>, field: &str) -> Result<String, RemoteError> {
    value
        .map(str::to_string)
        .ok_or_else(|| RemoteError::opaque(format!("response is missing the {}", field)))
}
