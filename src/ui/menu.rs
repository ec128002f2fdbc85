use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{List, ListItem, ListState};

use crate::Theme;

/// Vertical list of choices with one highlighted entry.
pub struct Menu<'a> {
    choices: &'a [&'a str],
    selected: Option<usize>,
}

impl<'a> Menu<'a> {
    pub const fn new(choices: &'a [&'a str]) -> Self {
        Self {
            choices,
            selected: None,
        }
    }

    #[must_use]
    pub const fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items: Vec<ListItem> = self
            .choices
            .iter()
            .map(|choice| ListItem::new(*choice).style(Style::default().fg(theme.text())))
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.border_focused())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = ListState::default().with_selected(self.selected);
        frame.render_stateful_widget(list, area, &mut state);
    }
}
