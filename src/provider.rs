//! Provider seam.
//!
//! Resource services talk to the cloud only through the traits in this
//! module. [`aws`] holds the AWS SDK implementations; tests substitute
//! in-memory fakes.

pub mod aws;

use std::fmt;

use async_trait::async_trait;

/// A failed provider call.
///
/// `code` is the provider's structured error code when one was returned
/// (e.g. `BucketAlreadyExists`, `InvalidAMIID.NotFound`); `message` is the
/// raw provider text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub code: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderError {}

/// Builds provider clients bound to a region.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Client: Send + Sync;

    /// Build a client for `region`.
    ///
    /// # Errors
    /// Returns an error when no usable client can be built for the region.
    async fn connect(&self, region: &str) -> color_eyre::Result<Self::Client>;
}

/// Outgoing bucket creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBucketRequest {
    pub bucket: String,
    /// `None` for the provider's default region.
    pub location_constraint: Option<String>,
}

#[async_trait]
pub trait BucketApi: Send + Sync {
    /// Create a bucket, returning the provider's location value.
    async fn create_bucket(&self, request: CreateBucketRequest)
    -> Result<Option<String>, ProviderError>;
}

/// Outgoing instance launch request. `min_count == max_count` always.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInstancesRequest {
    pub image_id: String,
    pub instance_type: String,
    pub key_name: String,
    pub min_count: i32,
    pub max_count: i32,
}

/// An instance as reported by the provider after launch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchedInstance {
    pub instance_id: String,
    pub state: String,
    pub image_id: String,
    pub instance_type: String,
    pub key_name: String,
}

#[async_trait]
pub trait InstanceApi: Send + Sync {
    async fn run_instances(
        &self,
        request: RunInstancesRequest,
    ) -> Result<Vec<LaunchedInstance>, ProviderError>;
}
