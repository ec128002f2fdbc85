use crate::service::{BucketParams, InstanceParams, ResourceResult};

/// Input to [`Model::update`](super::Model::update).
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Up,
    Down,
    /// Enter a submenu, pick a form action, or leave edit mode.
    Activate,
    Back,
    NextField,
    /// Start editing the focused field.
    Edit,
    Input(char),
    Backspace,
    Quit,
    /// A create request finished.
    ResourceCreated(ResourceResult),
}

/// Work the app runs outside the update loop on behalf of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreateBucket {
        region: String,
        params: BucketParams,
    },
    LaunchInstances {
        region: String,
        params: InstanceParams,
    },
}
