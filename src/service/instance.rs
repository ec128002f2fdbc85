//! EC2 instance launches.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{info, instrument, warn};

use crate::provider::{Connector, InstanceApi, LaunchedInstance, ProviderError, RunInstancesRequest};
use crate::service::{
    ErrorKind, ResourceResult, ResourceService, effective_region, validate_required,
};

const DEFAULT_COUNT: i64 = 1;

/// Parameters for launching instances.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstanceParams {
    pub image_id: String,
    pub instance_type: String,
    pub key_name: String,
    /// Number of instances; `None` launches one.
    pub count: Option<i64>,
    /// Overrides the service's bound region and rebinds its client.
    pub region: Option<String>,
}

impl InstanceParams {
    pub fn new(
        image_id: impl Into<String>,
        instance_type: impl Into<String>,
        key_name: impl Into<String>,
    ) -> Self {
        Self {
            image_id: image_id.into(),
            instance_type: instance_type.into(),
            key_name: key_name.into(),
            count: None,
            region: None,
        }
    }

    #[must_use]
    pub const fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Parse a count typed as text.
    ///
    /// Text that is not an integer yields `None`, so the launch falls back to
    /// a single instance instead of failing.
    pub fn count_from_text(text: &str) -> Option<i64> {
        let parsed = text.trim().parse().ok();
        if parsed.is_none() {
            warn!(count = text, "Ignoring non-numeric instance count, defaulting to 1");
        }
        parsed
    }

    fn required_fields(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("image_id", Some(self.image_id.as_str())),
            ("instance_type", Some(self.instance_type.as_str())),
            ("key_name", Some(self.key_name.as_str())),
        ]
    }
}

/// Launches EC2 instances through an [`InstanceApi`] client bound to one region.
pub struct InstanceService<C: Connector> {
    region: String,
    connector: C,
    client: C::Client,
}

impl<C> InstanceService<C>
where
    C: Connector,
    C::Client: InstanceApi,
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

fn classify(err: &ProviderError) -> Option<ErrorKind> {
    let code = err.code()?;
    if code.starts_with("InvalidAMIID") {
        Some(ErrorKind::InvalidAmiId)
    } else if code.starts_with("InvalidKeyPair") {
        Some(ErrorKind::InvalidKeyPair)
    } else {
        match code {
            "InvalidInstanceType" => Some(ErrorKind::InvalidInstanceType),
            "InsufficientInstanceCapacity" => Some(ErrorKind::InsufficientCapacity),
            "UnauthorizedOperation" => Some(ErrorKind::UnauthorizedOperation),
            _ => None,
        }
    }
}

fn failure_result(params: &InstanceParams, region: &str, err: &ProviderError) -> ResourceResult {
    match classify(err) {
        Some(kind @ ErrorKind::InvalidAmiId) => {
            ResourceResult::failure(kind, format!("Invalid AMI ID: {}", params.image_id))
        }
        Some(kind @ ErrorKind::InvalidKeyPair) => {
            ResourceResult::failure(kind, format!("Invalid key pair: {}", params.key_name))
        }
        Some(kind @ ErrorKind::InvalidInstanceType) => ResourceResult::failure(
            kind,
            format!(
                "Instance type '{}' is not valid or not available in region '{region}'",
                params.instance_type
            ),
        ),
        Some(kind @ ErrorKind::InsufficientCapacity) => ResourceResult::failure(
            kind,
            format!(
                "Insufficient capacity for instance type '{}' in region '{region}'",
                params.instance_type
            ),
        ),
        Some(kind @ ErrorKind::UnauthorizedOperation) => ResourceResult::failure(
            kind,
            "You are not authorized to perform this operation. Check your AWS permissions.",
        ),
        _ => ResourceResult::failure(
            ErrorKind::UnknownError,
            format!("Failed to launch instances: {}", err.message),
        ),
    }
}

fn instance_entry(instance: &LaunchedInstance) -> Value {
    json!({
        "instance_id": instance.instance_id,
        "state": instance.state,
        "image_id": instance.image_id,
        "instance_type": instance.instance_type,
        "key_name": instance.key_name,
    })
}

#[async_trait]
impl<C> ResourceService for InstanceService<C>
where
    C: Connector,
    C::Client: InstanceApi,
{
    type Params = InstanceParams;

    fn region(&self) -> &str {
        &self.region
    }

    #[instrument(name = "launch_instances", skip_all)]
    async fn create_resource(&mut self, params: InstanceParams) -> ResourceResult {
        let count = params.count.unwrap_or(DEFAULT_COUNT);
        if count < 1 {
            return ResourceResult::failure(ErrorKind::ValidationError, "Count must be at least 1");
        }
        let Ok(request_count) = i32::try_from(count) else {
            return ResourceResult::failure(
                ErrorKind::ValidationError,
                format!("Count must be at most {}", i32::MAX),
            );
        };

        let target_region = effective_region(&self.region, params.region.as_deref()).to_string();
        if target_region != self.region
            && let Err(e) = self.rebind(&target_region).await
        {
            return ResourceResult::failure(
                ErrorKind::ConfigurationError,
                format!("Failed to configure AWS client for region {target_region}: {e}"),
            );
        }

        if let Err(missing) = validate_required(params.required_fields()) {
            return ResourceResult::failure(ErrorKind::ValidationError, missing.to_string());
        }

        let request = RunInstancesRequest {
            image_id: params.image_id.clone(),
            instance_type: params.instance_type.clone(),
            key_name: params.key_name.clone(),
            min_count: request_count,
            max_count: request_count,
        };

        info!(
            image_id = %params.image_id,
            instance_type = %params.instance_type,
            count,
            region = %target_region,
            "Launching EC2 instances"
        );
        match self.client.run_instances(request).await {
            Ok(instances) => {
                info!(launched = instances.len(), "EC2 instances launched");
                let data = Map::from_iter([
                    (
                        "instances".to_string(),
                        Value::Array(instances.iter().map(instance_entry).collect()),
                    ),
                    ("region".to_string(), Value::from(target_region.clone())),
                    ("image_id".to_string(), Value::from(params.image_id.clone())),
                    (
                        "instance_type".to_string(),
                        Value::from(params.instance_type.clone()),
                    ),
                    ("key_name".to_string(), Value::from(params.key_name.clone())),
                    ("count".to_string(), Value::from(count)),
                ]);
                ResourceResult::success(
                    format!(
                        "Successfully launched {count} EC2 instance(s) in region '{target_region}'"
                    ),
                    data,
                )
            }
            Err(err) => {
                warn!(code = ?err.code, "EC2 launch failed: {err}");
                failure_result(&params, &target_region, &err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Recorder {
        connects: Arc<Mutex<Vec<String>>>,
        requests: Arc<Mutex<Vec<RunInstancesRequest>>>,
    }

    #[derive(Clone)]
    enum Response {
        /// Report exactly this many launched instances.
        Launched(usize),
        Fail(ProviderError),
    }

    struct MockConnector {
        recorder: Recorder,
        response: Response,
        fail_regions: Vec<&'static str>,
    }

    impl MockConnector {
        fn new(response: Response) -> (Self, Recorder) {
            let recorder = Recorder::default();
            let connector = Self {
                recorder: recorder.clone(),
                response,
                fail_regions: Vec::new(),
            };
            (connector, recorder)
        }
    }

    struct MockClient {
        recorder: Recorder,
        response: Response,
    }

    #[async_trait]
    impl Connector for MockConnector {
        type Client = MockClient;

        async fn connect(&self, region: &str) -> color_eyre::Result<MockClient> {
            self.recorder.connects.lock().unwrap().push(region.to_string());
            if self.fail_regions.iter().any(|r| *r == region) {
                return Err(color_eyre::eyre::eyre!("invalid region"));
            }
            Ok(MockClient {
                recorder: self.recorder.clone(),
                response: self.response.clone(),
            })
        }
    }

    #[async_trait]
    impl InstanceApi for MockClient {
        async fn run_instances(
            &self,
            request: RunInstancesRequest,
        ) -> Result<Vec<LaunchedInstance>, ProviderError> {
            let launched = match &self.response {
                Response::Launched(n) => (0..*n)
                    .map(|i| LaunchedInstance {
                        instance_id: format!("i-{i:017}"),
                        state: "pending".to_string(),
                        image_id: request.image_id.clone(),
                        instance_type: request.instance_type.clone(),
                        key_name: request.key_name.clone(),
                    })
                    .collect(),
                Response::Fail(err) => return Err(err.clone()),
            };
            self.recorder.requests.lock().unwrap().push(request);
            Ok(launched)
        }
    }

    fn params() -> InstanceParams {
        InstanceParams::new("ami-x", "t2.micro", "k")
    }

    async fn connected_service(response: Response) -> (InstanceService<MockConnector>, Recorder) {
        let (connector, recorder) = MockConnector::new(response);
        let service = InstanceService::connect(connector, "us-east-1").await.unwrap();
        (service, recorder)
    }

    #[tokio::test]
    async fn test_launch_three_instances() {
        let (mut service, recorder) = connected_service(Response::Launched(3)).await;

        let result = service.create_resource(params().with_count(3)).await;

        assert!(result.is_success());
        assert_eq!(
            result.message(),
            "Successfully launched 3 EC2 instance(s) in region 'us-east-1'"
        );
        let data = result.data().unwrap();
        assert_eq!(data["count"], json!(3));
        assert_eq!(data["instances"].as_array().unwrap().len(), 3);
        assert_eq!(data["instances"][0]["key_name"], json!("k"));
        assert_eq!(data["region"], json!("us-east-1"));

        let requests = recorder.requests.lock().unwrap();
        assert_eq!(requests[0].min_count, 3);
        assert_eq!(requests[0].max_count, 3);
    }

    #[tokio::test]
    async fn test_instances_reflect_reported_launches() {
        let (mut service, _) = connected_service(Response::Launched(2)).await;

        let result = service.create_resource(params().with_count(3)).await;

        let data = result.data().unwrap();
        assert_eq!(data["instances"].as_array().unwrap().len(), 2);
        assert_eq!(data["count"], json!(3));
    }

    #[tokio::test]
    async fn test_count_defaults_to_one() {
        let (mut service, recorder) = connected_service(Response::Launched(1)).await;

        let result = service.create_resource(params()).await;

        assert!(result.is_success());
        assert_eq!(result.data().unwrap()["count"], json!(1));
        assert_eq!(recorder.requests.lock().unwrap()[0].min_count, 1);
    }

    #[tokio::test]
    async fn test_zero_and_negative_counts_rejected() {
        for count in [0, -2] {
            let (mut service, recorder) = connected_service(Response::Launched(1)).await;

            let result = service.create_resource(params().with_count(count)).await;

            assert_eq!(result.error(), Some(ErrorKind::ValidationError));
            assert_eq!(result.message(), "Count must be at least 1");
            assert!(recorder.requests.lock().unwrap().is_empty());
        }
    }

    #[test]
    fn test_count_from_text() {
        assert_eq!(InstanceParams::count_from_text("4"), Some(4));
        assert_eq!(InstanceParams::count_from_text(" 2 "), Some(2));
        assert_eq!(InstanceParams::count_from_text("-1"), Some(-1));
        assert_eq!(InstanceParams::count_from_text("abc"), None);
        assert_eq!(InstanceParams::count_from_text(""), None);
    }

    #[tokio::test]
    async fn test_non_numeric_count_falls_back_to_one() {
        let (mut service, recorder) = connected_service(Response::Launched(1)).await;
        let mut params = params();
        params.count = InstanceParams::count_from_text("abc");

        let result = service.create_resource(params).await;

        assert!(result.is_success());
        assert_eq!(result.data().unwrap()["count"], json!(1));
        assert_eq!(recorder.requests.lock().unwrap()[0].max_count, 1);
    }

    #[tokio::test]
    async fn test_missing_fields_reported_together() {
        let (mut service, recorder) = connected_service(Response::Launched(1)).await;

        let result = service
            .create_resource(InstanceParams::new("", "t2.micro", " "))
            .await;

        assert_eq!(result.error(), Some(ErrorKind::ValidationError));
        assert_eq!(
            result.message(),
            "missing required parameters: [image_id key_name]"
        );
        assert!(recorder.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_checked_before_required_fields() {
        let (mut service, _) = connected_service(Response::Launched(1)).await;

        let result = service
            .create_resource(InstanceParams::new("", "", "").with_count(0))
            .await;

        assert_eq!(result.message(), "Count must be at least 1");
    }

    #[tokio::test]
    async fn test_region_override_rebinds_client() {
        let (mut service, recorder) = connected_service(Response::Launched(1)).await;

        let result = service
            .create_resource(params().with_region("eu-central-1"))
            .await;

        assert!(result.is_success());
        assert_eq!(result.data().unwrap()["region"], json!("eu-central-1"));
        assert_eq!(
            *recorder.connects.lock().unwrap(),
            vec!["us-east-1".to_string(), "eu-central-1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_rebind_failure_is_configuration_error() {
        let (mut connector, recorder) = MockConnector::new(Response::Launched(1));
        connector.fail_regions.push("nowhere-1");
        let mut service = InstanceService::connect(connector, "us-east-1").await.unwrap();

        let result = service.create_resource(params().with_region("nowhere-1")).await;

        assert_eq!(result.error(), Some(ErrorKind::ConfigurationError));
        assert!(
            result
                .message()
                .starts_with("Failed to configure AWS client for region nowhere-1")
        );
        assert!(recorder.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_ami() {
        let err = ProviderError::new(
            Some("InvalidAMIID.NotFound".to_string()),
            "The image id '[ami-x]' does not exist",
        );
        let (mut service, _) = connected_service(Response::Fail(err)).await;

        let result = service.create_resource(params()).await;

        assert_eq!(result.error(), Some(ErrorKind::InvalidAmiId));
        assert_eq!(result.message(), "Invalid AMI ID: ami-x");
    }

    #[tokio::test]
    async fn test_invalid_key_pair() {
        let err = ProviderError::new(
            Some("InvalidKeyPair.NotFound".to_string()),
            "The key pair 'k' does not exist",
        );
        let (mut service, _) = connected_service(Response::Fail(err)).await;

        let result = service.create_resource(params()).await;

        assert_eq!(result.error(), Some(ErrorKind::InvalidKeyPair));
        assert_eq!(result.message(), "Invalid key pair: k");
    }

    #[tokio::test]
    async fn test_unrecognized_error() {
        let err = ProviderError::new(
            Some("InternalError".to_string()),
            "An internal error has occurred",
        );
        let (mut service, _) = connected_service(Response::Fail(err)).await;

        let result = service.create_resource(params()).await;

        assert_eq!(result.error(), Some(ErrorKind::UnknownError));
        assert_eq!(
            result.message(),
            "Failed to launch instances: An internal error has occurred"
        );
    }

    #[tokio::test]
    async fn test_invalid_instance_type() {
        let err = ProviderError::new(
            Some("InvalidInstanceType".to_string()),
            "The instance type 't9.huge' does not exist",
        );
        let (mut service, _) = connected_service(Response::Fail(err)).await;

        let result = service
            .create_resource(InstanceParams::new("ami-x", "t9.huge", "k"))
            .await;

        assert_eq!(result.error(), Some(ErrorKind::InvalidInstanceType));
        assert_eq!(
            result.message(),
            "Instance type 't9.huge' is not valid or not available in region 'us-east-1'"
        );
    }

    #[tokio::test]
    async fn test_insufficient_capacity() {
        let err = ProviderError::new(
            Some("InsufficientInstanceCapacity".to_string()),
            "We currently do not have sufficient capacity",
        );
        let (mut service, _) = connected_service(Response::Fail(err)).await;

        let result = service
            .create_resource(params().with_region("eu-west-1"))
            .await;

        assert_eq!(result.error(), Some(ErrorKind::InsufficientCapacity));
        assert_eq!(
            result.message(),
            "Insufficient capacity for instance type 't2.micro' in region 'eu-west-1'"
        );
    }

    #[tokio::test]
    async fn test_unauthorized_operation() {
        let err = ProviderError::new(
            Some("UnauthorizedOperation".to_string()),
            "You are not authorized to perform this operation.",
        );
        let (mut service, _) = connected_service(Response::Fail(err)).await;

        let result = service.create_resource(params()).await;

        assert_eq!(result.error(), Some(ErrorKind::UnauthorizedOperation));
        assert_eq!(
            result.message(),
            "You are not authorized to perform this operation. Check your AWS permissions."
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap()["error"],
            json!("UnauthorizedOperation")
        );
    }
}
