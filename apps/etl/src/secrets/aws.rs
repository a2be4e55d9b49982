use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;
use tracing::debug;

use stockflow_core::{errors::Error, secrets::SecretStore, Result};

/// [`SecretStore`] backed by AWS Secrets Manager.
///
/// Only string secrets are supported; a binary secret is a format error.
#[derive(Clone, Debug)]
pub struct AwsSecretsManagerStore {
    client: Client,
}

impl AwsSecretsManagerStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl SecretStore for AwsSecretsManagerStore {
    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        let output = match self.client.get_secret_value().secret_id(name).send().await {
            Ok(output) => output,
            Err(e) => {
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception())
                {
                    return Ok(None);
                }
                return Err(Error::SecretAccess {
                    name: name.to_string(),
                    message: DisplayErrorContext(e).to_string(),
                });
            }
        };

        debug!("Fetched secret '{}' from Secrets Manager", name);
        match output.secret_string() {
            Some(raw) => Ok(Some(raw.to_string())),
            None => Err(Error::SecretFormat {
                name: name.to_string(),
                message: "secret has no string value".to_string(),
            }),
        }
    }
}
