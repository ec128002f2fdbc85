use crossterm::event::KeyCode;

use crate::config::key::{Key, KeyBinding};
use crate::config::keybindings::{FormKeybindings, GlobalKeybindings, NavigationKeybindings};

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::char('q').into(),
            back: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::from(vec![Key::char('k'), Key::new(KeyCode::Up)]),
            down: KeyBinding::from(vec![Key::char('j'), Key::new(KeyCode::Down)]),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for FormKeybindings {
    fn default() -> Self {
        Self {
            next_field: Key::new(KeyCode::Tab).into(),
            edit: Key::char('e').into(),
        }
    }
}
