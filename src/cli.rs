use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use crate::output::format_result;
use crate::provider::{BucketApi, Connector, InstanceApi};
use crate::service::{
    BucketParams, BucketService, InstanceParams, InstanceService, ResourceResult, ResourceService,
};

#[derive(Parser, Debug)]
#[command(
    name = "aws-resources",
    version,
    about = "A CLI tool for creating AWS resources",
    long_about = "Create S3 buckets and EC2 instances from the command line, or run \
                  without a subcommand to open the interactive console.\n\n\
                  Credentials are resolved through the standard AWS provider chain."
)]
pub struct Cli {
    /// AWS region, used when the action does not set its own
    #[arg(short, long)]
    pub region: Option<String>,

    /// Print the full result as JSON
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage S3 buckets
    Bucket {
        #[command(subcommand)]
        action: BucketAction,
    },
    /// Manage EC2 instances
    Instance {
        #[command(subcommand)]
        action: InstanceAction,
    },
    /// Open the interactive console
    Console,
}

#[derive(Subcommand, Debug)]
pub enum BucketAction {
    /// Create an S3 bucket
    #[command(after_help = "Example:\n  aws-resources bucket create --bucket-name my-app-logs-2024 --region us-east-1")]
    Create(BucketCreateArgs),
}

#[derive(Subcommand, Debug)]
pub enum InstanceAction {
    /// Launch EC2 instances
    #[command(after_help = "Example:\n  aws-resources instance create --image-id ami-0abcdef1234567890 \
                            --instance-type t3.small --key-name production-key --count 3 --region eu-west-1")]
    Create(InstanceCreateArgs),
}

#[derive(Args, Debug)]
pub struct BucketCreateArgs {
    /// Name of the bucket to create
    #[arg(long)]
    pub bucket_name: String,

    /// Region for the bucket (overrides the global region)
    #[arg(short, long)]
    pub region: Option<String>,
}

#[derive(Args, Debug)]
pub struct InstanceCreateArgs {
    /// AMI id to launch the instances from
    #[arg(long)]
    pub image_id: String,

    /// Instance type (e.g. t2.micro, t3.small)
    #[arg(long)]
    pub instance_type: String,

    /// Name of the key pair for SSH access
    #[arg(long)]
    pub key_name: String,

    /// Number of instances to launch
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub count: i64,

    /// Region to launch in (overrides the global region)
    #[arg(short, long)]
    pub region: Option<String>,
}

/// Exit status of a command-line action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => Self::SUCCESS,
            Status::Failure => Self::FAILURE,
        }
    }
}

/// Pick the action's region, falling back to the global one. Blank values
/// count as unset.
pub fn resolve_region(action: Option<&str>, global: Option<&str>) -> Option<String> {
    [action, global]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|r| !r.is_empty())
        .map(str::to_string)
}

/// Run `bucket create`.
pub async fn create_bucket<C>(connector: C, cli: &Cli, args: &BucketCreateArgs) -> Status
where
    C: Connector,
    C::Client: BucketApi,
{
    let Some(region) = resolve_region(args.region.as_deref(), cli.region.as_deref()) else {
        eprintln!("Error: region is required");
        return Status::Failure;
    };

    let mut service = match BucketService::connect(connector, &region).await {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to build S3 service: {e:?}");
            eprintln!("Error creating S3 service: {e}");
            return Status::Failure;
        }
    };

    let params = BucketParams::new(&args.bucket_name).with_region(&region);
    let result = service.create_resource(params).await;
    report(&result, service.region(), cli.verbose)
}

/// Run `instance create`.
pub async fn create_instances<C>(connector: C, cli: &Cli, args: &InstanceCreateArgs) -> Status
where
    C: Connector,
    C::Client: InstanceApi,
{
    let Some(region) = resolve_region(args.region.as_deref(), cli.region.as_deref()) else {
        eprintln!("Error: region is required");
        return Status::Failure;
    };

    let mut service = match InstanceService::connect(connector, &region).await {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to build EC2 service: {e:?}");
            eprintln!("Error creating EC2 service: {e}");
            return Status::Failure;
        }
    };

    let params = InstanceParams::new(&args.image_id, &args.instance_type, &args.key_name)
        .with_count(args.count)
        .with_region(&region);
    let result = service.create_resource(params).await;
    report(&result, service.region(), cli.verbose)
}

fn report(result: &ResourceResult, region: &str, verbose: bool) -> Status {
    match format_result(result, verbose) {
        Ok(text) => println!("{text}"),
        Err(e) => println!("Error marshaling result: {e}"),
    }

    info!(success = result.is_success(), region, "Action finished");
    if result.is_success() {
        Status::Success
    } else {
        Status::Failure
    }
}
