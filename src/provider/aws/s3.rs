use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};

use crate::provider::aws::{load_config, provider_error};
use crate::provider::{BucketApi, Connector, CreateBucketRequest, ProviderError};

/// Builds [`S3Client`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct S3Connector;

#[async_trait]
impl Connector for S3Connector {
    type Client = S3Client;

    async fn connect(&self, region: &str) -> color_eyre::Result<S3Client> {
        let config = load_config(region).await?;
        Ok(S3Client {
            client: Client::new(&config),
        })
    }
}

#[derive(Clone, Debug)]
pub struct S3Client {
    client: Client,
}

#[async_trait]
impl BucketApi for S3Client {
    async fn create_bucket(
        &self,
        request: CreateBucketRequest,
    ) -> Result<Option<String>, ProviderError> {
        let configuration = request.location_constraint.map(|region| {
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region.as_str()))
                .build()
        });

        let output = self
            .client
            .create_bucket()
            .bucket(request.bucket)
            .set_create_bucket_configuration(configuration)
            .send()
            .await
            .map_err(|e| provider_error(&e))?;

        Ok(output.location().map(str::to_string))
    }
}
