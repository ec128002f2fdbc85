use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::cli::{BucketAction, Cli, Command, InstanceAction};
use crate::config::KeyResolver;
use crate::provider::aws::{DEFAULT_REGION, Ec2Connector, S3Connector};

mod app;
mod cli;
mod commands;
mod config;
mod console;
mod output;
mod provider;
mod service;
mod theme;
mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;

    let cli = Cli::parse();
    info!(command = ?cli.command, "Starting aws-resources");

    let status = match &cli.command {
        Some(Command::Bucket {
            action: BucketAction::Create(args),
        }) => cli::create_bucket(S3Connector, &cli, args).await,
        Some(Command::Instance {
            action: InstanceAction::Create(args),
        }) => cli::create_instances(Ec2Connector, &cli, args).await,
        Some(Command::Console) | None => {
            run_console(&cli).await?;
            cli::Status::Success
        }
    };

    Ok(status.into())
}

async fn run_console(cli: &Cli) -> Result<()> {
    let config = config::load()?;
    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings)));
    let theme = theme::theme_from_name(&config.theme.name);
    let region = cli.region.as_deref().unwrap_or(DEFAULT_REGION);

    App::new(region, resolver, theme).run().await
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("aws-resources").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "aws-resources.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
