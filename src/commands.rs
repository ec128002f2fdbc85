//! Background work for the console.
//!
//! A command owns everything it needs, runs on its own tokio task and reports
//! back by sending a [`Msg`](crate::console::Msg) into the app loop.

mod create;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

use crate::console::Msg;
use crate::service::{ErrorKind, ResourceResult};

pub use create::{CreateBucketCmd, LaunchInstancesCmd};

#[async_trait]
pub trait Command: Send + 'static {
    /// Short label for the status line while the command runs.
    fn name(&self) -> &'static str;

    async fn execute(self: Box<Self>) -> color_eyre::Result<()>;
}

/// Drive `command` on its own task.
///
/// A command that panics never posts its result, so a `ServiceError` result
/// is sent on its behalf to release the waiting console.
pub async fn run(command: Box<dyn Command>, tx: UnboundedSender<Msg>) {
    let name = command.name();
    debug!("Running command: {name}");

    match tokio::spawn(command.execute()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Command '{name}' failed: {e:?}"),
        Err(e) => {
            error!("Command '{name}' aborted: {e}");
            let result = ResourceResult::failure(
                ErrorKind::ServiceError,
                format!("{name} did not finish: {e}"),
            );
            if tx.send(Msg::ResourceCreated(result)).is_err() {
                error!("Console closed before '{name}' could report");
            }
        }
    }
}
