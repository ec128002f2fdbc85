use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Theme;

/// Bordered single-line text box with its label in the title.
pub struct TextField<'a> {
    label: &'a str,
    value: &'a str,
    focused: bool,
    editing: bool,
}

impl<'a> TextField<'a> {
    pub const fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            focused: false,
            editing: false,
        }
    }

    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Show the input cursor at the end of the value.
    #[must_use]
    pub const fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let input_style = Style::default().fg(theme.text());
        let cursor_style = Style::default()
            .fg(theme.base())
            .bg(theme.text())
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::styled(self.value, input_style)];
        if self.editing {
            spans.push(Span::styled(" ", cursor_style));
        } else if self.value.is_empty() {
            spans.push(Span::styled("(empty)", Style::default().fg(theme.placeholder())));
        }

        let (title, border) = if self.focused {
            (format!(" → {} ", self.label), theme.border_focused())
        } else {
            (format!(" {} ", self.label), theme.border())
        };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(theme.highlight()))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border));

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }
}
