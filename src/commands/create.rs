use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

use crate::commands::Command;
use crate::console::Msg;
use crate::provider::{BucketApi, Connector, InstanceApi};
use crate::service::{
    BucketParams, BucketService, ErrorKind, InstanceParams, InstanceService, ResourceResult,
    ResourceService,
};

/// Build a bucket service for `region` and create one bucket.
pub struct CreateBucketCmd<C> {
    connector: C,
    region: String,
    params: BucketParams,
    tx: UnboundedSender<Msg>,
}

impl<C> CreateBucketCmd<C> {
    pub const fn new(
        connector: C,
        region: String,
        params: BucketParams,
        tx: UnboundedSender<Msg>,
    ) -> Self {
        Self {
            connector,
            region,
            params,
            tx,
        }
    }
}

#[async_trait]
impl<C> Command for CreateBucketCmd<C>
where
    C: Connector,
    C::Client: BucketApi,
{
    fn name(&self) -> &'static str {
        "Creating bucket"
    }

    async fn execute(self: Box<Self>) -> color_eyre::Result<()> {
        let result = match BucketService::connect(self.connector, &self.region).await {
            Ok(mut service) => service.create_resource(self.params).await,
            Err(e) => {
                error!("Failed to build S3 service: {e:?}");
                ResourceResult::failure(
                    ErrorKind::ServiceError,
                    format!("Failed to create S3 service: {e}"),
                )
            }
        };
        self.tx.send(Msg::ResourceCreated(result))?;
        Ok(())
    }
}

/// Build an instance service for `region` and launch instances.
pub struct LaunchInstancesCmd<C> {
    connector: C,
    region: String,
    params: InstanceParams,
    tx: UnboundedSender<Msg>,
}

impl<C> LaunchInstancesCmd<C> {
    pub const fn new(
        connector: C,
        region: String,
        params: InstanceParams,
        tx: UnboundedSender<Msg>,
    ) -> Self {
        Self {
            connector,
            region,
            params,
            tx,
        }
    }
}

#[async_trait]
impl<C> Command for LaunchInstancesCmd<C>
where
    C: Connector,
    C::Client: InstanceApi,
{
    fn name(&self) -> &'static str {
        "Launching instances"
    }

    async fn execute(self: Box<Self>) -> color_eyre::Result<()> {
        let result = match InstanceService::connect(self.connector, &self.region).await {
            Ok(mut service) => service.create_resource(self.params).await,
            Err(e) => {
                error!("Failed to build EC2 service: {e:?}");
                ResourceResult::failure(
                    ErrorKind::ServiceError,
                    format!("Failed to create EC2 service: {e}"),
                )
            }
        };
        self.tx.send(Msg::ResourceCreated(result))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use color_eyre::eyre::eyre;
    use tokio::sync::mpsc;

    use super::*;
    use crate::provider::{
        CreateBucketRequest, LaunchedInstance, ProviderError, RunInstancesRequest,
    };

    struct FakeConnector {
        fail: bool,
    }

    struct FakeClient;

    #[async_trait]
    impl Connector for FakeConnector {
        type Client = FakeClient;

        async fn connect(&self, _region: &str) -> color_eyre::Result<FakeClient> {
            if self.fail {
                Err(eyre!("no credentials provider found"))
            } else {
                Ok(FakeClient)
            }
        }
    }

    #[async_trait]
    impl BucketApi for FakeClient {
        async fn create_bucket(
            &self,
            request: CreateBucketRequest,
        ) -> Result<Option<String>, ProviderError> {
            Ok(Some(format!("/{}", request.bucket)))
        }
    }

    #[async_trait]
    impl InstanceApi for FakeClient {
        async fn run_instances(
            &self,
            request: RunInstancesRequest,
        ) -> Result<Vec<LaunchedInstance>, ProviderError> {
            let count = usize::try_from(request.max_count).unwrap_or_default();
            Ok(vec![LaunchedInstance::default(); count])
        }
    }

    #[tokio::test]
    async fn test_create_bucket_posts_result() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = CreateBucketCmd::new(
            FakeConnector { fail: false },
            "us-east-1".to_string(),
            BucketParams::new("logs-2024").with_region("us-east-1"),
            tx,
        );

        Box::new(cmd).execute().await.unwrap();

        let Some(Msg::ResourceCreated(result)) = rx.recv().await else {
            panic!("expected a result message");
        };
        assert!(result.is_success());
        assert_eq!(result.data().unwrap()["location"], "/logs-2024");
    }

    #[tokio::test]
    async fn test_connect_failure_is_service_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = LaunchInstancesCmd::new(
            FakeConnector { fail: true },
            "us-east-1".to_string(),
            InstanceParams::new("ami-1", "t2.micro", "k"),
            tx,
        );

        Box::new(cmd).execute().await.unwrap();

        let Some(Msg::ResourceCreated(result)) = rx.recv().await else {
            panic!("expected a result message");
        };
        assert_eq!(result.error(), Some(ErrorKind::ServiceError));
        assert_eq!(
            result.message(),
            "Failed to create EC2 service: no credentials provider found"
        );
    }

    #[tokio::test]
    async fn test_launch_posts_result() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = LaunchInstancesCmd::new(
            FakeConnector { fail: false },
            "eu-west-1".to_string(),
            InstanceParams::new("ami-1", "t3.small", "k").with_count(2),
            tx,
        );

        Box::new(cmd).execute().await.unwrap();

        let Some(Msg::ResourceCreated(result)) = rx.recv().await else {
            panic!("expected a result message");
        };
        assert_eq!(
            result.message(),
            "Successfully launched 2 EC2 instance(s) in region 'eu-west-1'"
        );
    }

    #[tokio::test]
    async fn test_closed_channel_is_an_error() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let cmd = CreateBucketCmd::new(
            FakeConnector { fail: false },
            "us-east-1".to_string(),
            BucketParams::new("logs"),
            tx,
        );

        assert!(Box::new(cmd).execute().await.is_err());
    }
}
