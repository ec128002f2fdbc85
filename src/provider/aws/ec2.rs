use async_trait::async_trait;
use aws_sdk_ec2::Client;
use aws_sdk_ec2::types::{Instance, InstanceType};

use crate::provider::aws::{load_config, provider_error};
use crate::provider::{Connector, InstanceApi, LaunchedInstance, ProviderError, RunInstancesRequest};

/// Builds [`Ec2Client`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ec2Connector;

#[async_trait]
impl Connector for Ec2Connector {
    type Client = Ec2Client;

    async fn connect(&self, region: &str) -> color_eyre::Result<Ec2Client> {
        let config = load_config(region).await?;
        Ok(Ec2Client {
            client: Client::new(&config),
        })
    }
}

#[derive(Clone, Debug)]
pub struct Ec2Client {
    client: Client,
}

#[async_trait]
impl InstanceApi for Ec2Client {
    async fn run_instances(
        &self,
        request: RunInstancesRequest,
    ) -> Result<Vec<LaunchedInstance>, ProviderError> {
        let output = self
            .client
            .run_instances()
            .image_id(request.image_id)
            .instance_type(InstanceType::from(request.instance_type.as_str()))
            .key_name(request.key_name)
            .min_count(request.min_count)
            .max_count(request.max_count)
            .send()
            .await
            .map_err(|e| provider_error(&e))?;

        Ok(output.instances().iter().map(launched_instance).collect())
    }
}

fn launched_instance(instance: &Instance) -> LaunchedInstance {
    LaunchedInstance {
        instance_id: instance.instance_id().unwrap_or_default().to_string(),
        state: instance
            .state()
            .and_then(|s| s.name())
            .map(|name| name.as_str().to_string())
            .unwrap_or_default(),
        image_id: instance.image_id().unwrap_or_default().to_string(),
        instance_type: instance
            .instance_type()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        key_name: instance.key_name().unwrap_or_default().to_string(),
    }
}
