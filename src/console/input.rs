use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{FormAction, GlobalAction, KeyResolver, NavAction};
use crate::console::{Model, Msg};

/// Translate a key press into a console message.
///
/// While a field is being edited, printable keys are text; only the select,
/// back and field-switch bindings keep their meaning.
pub fn translate(model: &Model, resolver: &KeyResolver, key: KeyEvent) -> Option<Msg> {
    if model.is_editing() {
        return translate_editing(resolver, key);
    }

    if resolver.matches_global(&key, GlobalAction::Quit) {
        return Some(Msg::Quit);
    }
    if resolver.matches_global(&key, GlobalAction::Back) {
        return Some(Msg::Back);
    }
    if resolver.matches_nav(&key, NavAction::Up) {
        return Some(Msg::Up);
    }
    if resolver.matches_nav(&key, NavAction::Down) {
        return Some(Msg::Down);
    }
    if resolver.matches_nav(&key, NavAction::Select) {
        return Some(Msg::Activate);
    }

    if model.screen().is_form() {
        if resolver.matches_form(&key, FormAction::NextField) {
            return Some(Msg::NextField);
        }
        if resolver.matches_form(&key, FormAction::Edit) {
            return Some(Msg::Edit);
        }
    }
    None
}

fn translate_editing(resolver: &KeyResolver, key: KeyEvent) -> Option<Msg> {
    if resolver.matches_nav(&key, NavAction::Select) {
        return Some(Msg::Activate);
    }
    if resolver.matches_global(&key, GlobalAction::Back) {
        return Some(Msg::Back);
    }
    if resolver.matches_form(&key, FormAction::NextField) {
        return Some(Msg::NextField);
    }

    match (key.code, key.modifiers) {
        (KeyCode::Backspace, _) => Some(Msg::Backspace),
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(Msg::Input(c)),
        _ => None,
    }
}
