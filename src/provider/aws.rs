//! AWS SDK implementations of the provider seam.
//!
//! Credentials and region discovery follow the SDK's default chain
//! (profile files, environment variables, instance metadata). The region
//! passed to [`load_config`] always wins over the discovered one.

mod ec2;
mod s3;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use color_eyre::eyre::eyre;
use tracing::debug;

use crate::provider::ProviderError;

pub use ec2::{Ec2Client, Ec2Connector};
pub use s3::{S3Client, S3Connector};

/// Region where S3 rejects an explicit location constraint.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Load the shared SDK configuration for `region`.
///
/// Credentials are not resolved here. The default chain is installed lazily
/// and a missing credential only shows up as a provider error on the first
/// request.
///
/// # Errors
/// Fails when the region is blank.
pub async fn load_config(region: &str) -> color_eyre::Result<SdkConfig> {
    let region = region.trim();
    if region.is_empty() {
        return Err(eyre!("region must not be empty"));
    }

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;

    debug!(region, "Loaded AWS SDK config");
    Ok(config)
}

/// Convert an SDK error into a [`ProviderError`], keeping the structured
/// error code and the full error chain as text.
fn provider_error<E>(err: &E) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    ProviderError::new(
        err.code().map(str::to_string),
        DisplayErrorContext(err).to_string(),
    )
}
