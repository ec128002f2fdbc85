//! Interactive console.
//!
//! The console is a small state machine: key presses are translated into
//! [`Msg`]s, [`Model::update`] applies them and may hand back an [`Effect`]
//! (a create request) for the app to run in the background, and [`view`]
//! draws the model. Results come back into the loop as
//! [`Msg::ResourceCreated`].

mod input;
mod message;
mod model;
pub mod view;

pub use input::translate;
pub use message::{Effect, Msg};
pub use model::{Field, Form, Model, Screen};
