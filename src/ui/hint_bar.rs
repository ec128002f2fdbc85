use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;

/// A key and what it does on the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub key: String,
    pub description: &'static str,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: &'static str) -> Self {
        Self {
            key: key.into(),
            description,
        }
    }
}

/// One-line strip of key hints at the bottom of the screen.
pub struct HintBar<'a> {
    hints: &'a [Keybinding],
}

impl<'a> HintBar<'a> {
    pub const fn new(hints: &'a [Keybinding]) -> Self {
        Self { hints }
    }

    pub fn render(self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut spans = Vec::with_capacity(self.hints.len() * 3);
        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(theme.border())));
            }
            spans.push(Span::styled(hint.key.clone(), Style::default().fg(theme.warning())));
            spans.push(Span::styled(
                format!(" {}", hint.description),
                Style::default().fg(theme.muted()),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
