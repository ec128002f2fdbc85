//! Resource services.
//!
//! A resource service binds one cloud resource type to exactly one creation
//! operation. Every service:
//!
//! 1. validates its typed parameters,
//! 2. issues a single provider call,
//! 3. folds the outcome into a [`ResourceResult`].
//!
//! Provider failures never escape as `Err`; the only hard failure is being
//! unable to build the service in the first place (`connect`).

pub mod bucket;
pub mod instance;
mod result;
mod validate;

use async_trait::async_trait;

pub use bucket::{BucketParams, BucketService};
pub use instance::{InstanceParams, InstanceService};
pub use result::{ErrorKind, ResourceResult};
pub use validate::{MissingFields, validate_required};

/// Common contract of every resource service.
#[async_trait]
pub trait ResourceService: Send {
    /// Typed parameters for one create call.
    type Params: Send + 'static;

    /// The region the service is currently bound to.
    fn region(&self) -> &str;

    /// Create the resource described by `params`.
    async fn create_resource(&mut self, params: Self::Params) -> ResourceResult;
}

/// The region a call should target: a non-blank override, else the bound one.
fn effective_region<'a>(bound: &'a str, requested: Option<&'a str>) -> &'a str {
    requested
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_region() {
        assert_eq!(effective_region("us-east-1", None), "us-east-1");
        assert_eq!(effective_region("us-east-1", Some("")), "us-east-1");
        assert_eq!(effective_region("us-east-1", Some(" eu-west-1 ")), "eu-west-1");
    }
}
