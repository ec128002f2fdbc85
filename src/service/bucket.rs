//! S3 bucket creation.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::provider::aws::DEFAULT_REGION;
use crate::provider::{BucketApi, Connector, CreateBucketRequest, ProviderError};
use crate::service::{
    ErrorKind, ResourceResult, ResourceService, effective_region, validate_required,
};

/// Parameters for creating one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BucketParams {
    pub bucket_name: String,
    /// Overrides the service's bound region for this call.
    pub region: Option<String>,
}

impl BucketParams {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            region: None,
        }
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Creates S3 buckets through a [`BucketApi`] client bound to one region.
pub struct BucketService<C: Connector> {
    region: String,
    connector: C,
    client: C::Client,
}

impl<C> BucketService<C>
where
    C: Connector,
    C::Client: BucketApi,
{
    /// Build the service with a client bound to `region`.
    ///
    /// # Errors
    /// Returns an error if the client cannot be constructed.
    pub async fn connect(connector: C, region: impl Into<String>) -> color_eyre::Result<Self> {
        let region = region.into();
        let client = connector.connect(&region).await?;
        Ok(Self {
            region,
            connector,
            client,
        })
    }

    async fn rebind(&mut self, region: &str) -> color_eyre::Result<()> {
        self.client = self.connector.connect(region).await?;
        self.region = region.to_string();
        Ok(())
    }
}

/// The location constraint for a bucket in `region`. The default region must
/// not be named explicitly.
fn location_constraint(region: &str) -> Option<String> {
    (region != DEFAULT_REGION).then(|| region.to_string())
}

fn classify(err: &ProviderError) -> Option<ErrorKind> {
    match err.code()? {
        "BucketAlreadyExists" => Some(ErrorKind::BucketAlreadyExists),
        "BucketAlreadyOwnedByYou" => Some(ErrorKind::BucketAlreadyOwnedByYou),
        _ => None,
    }
}

fn failure_result(bucket: &str, err: &ProviderError) -> ResourceResult {
    match classify(err) {
        Some(kind @ ErrorKind::BucketAlreadyExists) => ResourceResult::failure(
            kind,
            format!("Bucket '{bucket}' already exists and is owned by another account"),
        ),
        Some(kind @ ErrorKind::BucketAlreadyOwnedByYou) => ResourceResult::failure(
            kind,
            format!("Bucket '{bucket}' already exists and is owned by you"),
        ),
        _ => ResourceResult::failure(
            ErrorKind::UnknownError,
            format!("Failed to create bucket: {}", err.message),
        ),
    }
}

#[async_trait]
impl<C> ResourceService for BucketService<C>
where
    C: Connector,
    C::Client: BucketApi,
{
    type Params = BucketParams;

    fn region(&self) -> &str {
        &self.region
    }

    #[instrument(name = "create_bucket", skip_all)]
    async fn create_resource(&mut self, params: BucketParams) -> ResourceResult {
        let target_region = effective_region(&self.region, params.region.as_deref()).to_string();

        if let Err(missing) = validate_required([("bucket_name", Some(params.bucket_name.as_str()))])
        {
            return ResourceResult::failure(ErrorKind::ValidationError, missing.to_string());
        }

        if target_region != self.region
            && let Err(e) = self.rebind(&target_region).await
        {
            return ResourceResult::failure(
                ErrorKind::ConfigurationError,
                format!("Failed to configure AWS client for region {target_region}: {e}"),
            );
        }

        let request = CreateBucketRequest {
            bucket: params.bucket_name.clone(),
            location_constraint: location_constraint(&target_region),
        };

        info!(bucket = %params.bucket_name, region = %target_region, "Creating S3 bucket");
        match self.client.create_bucket(request).await {
            Ok(location) => {
                info!(bucket = %params.bucket_name, "S3 bucket created");
                let data = Map::from_iter([
                    ("bucket_name".to_string(), Value::from(params.bucket_name.clone())),
                    ("region".to_string(), Value::from(target_region.clone())),
                    ("location".to_string(), Value::from(location.unwrap_or_default())),
                ]);
                ResourceResult::success(
                    format!(
                        "Successfully created S3 bucket '{}' in region '{target_region}'",
                        params.bucket_name
                    ),
                    data,
                )
            }
            Err(err) => {
                warn!(bucket = %params.bucket_name, code = ?err.code, "S3 bucket creation failed: {err}");
                failure_result(&params.bucket_name, &err)
            }
        }
    }
}
