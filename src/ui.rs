//! Reusable console widgets. They know nothing about AWS.

mod hint_bar;
mod menu;
mod text_field;
pub mod widgets;

use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;

pub use hint_bar::{HintBar, Keybinding};
pub use menu::Menu;
pub use text_field::TextField;
pub use widgets::Spinner;

/// Widget that keeps state between frames.
pub trait Component {
    /// Called on each tick for animations.
    fn handle_tick(&mut self) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}
