use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use serde_json::Value;

use crate::Theme;
use crate::config::{FormAction, GlobalAction, KeyResolver, NavAction};
use crate::console::{Form, Model, Screen};
use crate::service::ResourceResult;
use crate::ui::{Component, HintBar, Keybinding, Menu, Spinner, TextField};

const FIELD_HEIGHT: u16 = 3;

/// Draw the whole console for `model`.
pub fn render(
    frame: &mut Frame,
    model: &Model,
    theme: &Theme,
    resolver: &KeyResolver,
    spinner: &mut Spinner,
) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.base())), area);

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header, model.screen(), theme);

    match (model.screen(), model.form(), model.result()) {
        (Screen::ResultScreen, _, result) => render_result(frame, body, result, theme),
        (screen, Some(form), _) => render_form(frame, body, model, screen, form, theme, spinner),
        (screen, None, _) => render_menu(frame, body, model, screen, theme),
    }

    HintBar::new(&hints(model, resolver)).render(frame, footer, theme);
}

fn render_header(frame: &mut Frame, area: Rect, screen: Screen, theme: &Theme) {
    let title = Paragraph::new(Span::styled(
        screen.title(),
        Style::default()
            .fg(theme.highlight())
            .add_modifier(Modifier::BOLD),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border())),
    );
    frame.render_widget(title, area);
}

fn render_menu(frame: &mut Frame, area: Rect, model: &Model, screen: Screen, theme: &Theme) {
    let prompt = if screen == Screen::MainMenu {
        "Choose a service to manage:"
    } else {
        "Choose an action:"
    };
    let [prompt_area, _, menu_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(prompt).style(Style::default().fg(theme.muted())),
        prompt_area,
    );
    Menu::new(screen.choices())
        .selected(Some(model.cursor()))
        .render(frame, menu_area, theme);
}

fn render_form(
    frame: &mut Frame,
    area: Rect,
    model: &Model,
    screen: Screen,
    form: &Form,
    theme: &Theme,
    spinner: &mut Spinner,
) {
    let fields = form.fields();
    let mut constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(2));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let rows = Layout::vertical(constraints).split(area);

    for (i, field) in fields.iter().enumerate() {
        let focused = i == form.focused();
        TextField::new(field.label, &field.value)
            .focused(focused)
            .editing(focused && model.is_editing())
            .render(frame, rows[i], theme);
    }

    let menu_area = rows[fields.len() + 1];
    let status_area = rows[fields.len() + 2];
    Menu::new(screen.choices())
        .selected(Some(model.cursor()))
        .render(frame, menu_area, theme);

    if model.is_pending() {
        spinner.render(frame, status_area, theme);
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_result(frame: &mut Frame, area: Rect, result: Option<&ResourceResult>, theme: &Theme) {
    let Some(result) = result else {
        frame.render_widget(Paragraph::new("No result to display"), area);
        return;
    };

    let mut lines = Vec::new();
    if result.is_success() {
        lines.push(Line::styled(
            "✅ Success!",
            Style::default()
                .fg(theme.success())
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        lines.push(Line::styled(
            "❌ Error!",
            Style::default().fg(theme.error()).add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::default());
    lines.push(Line::styled(
        result.message().to_string(),
        Style::default().fg(theme.text()),
    ));

    if let Some(kind) = result.error() {
        lines.push(Line::styled(
            format!("Error Code: {kind}"),
            Style::default().fg(theme.warning()),
        ));
    }

    if let Some(data) = result.data().filter(|d| !d.is_empty()) {
        lines.push(Line::default());
        lines.push(Line::styled("Details:", Style::default().fg(theme.info())));

        let mut entries: Vec<(&String, &Value)> = data.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key}: "), Style::default().fg(theme.muted())),
                Span::styled(value_text(value), Style::default().fg(theme.text())),
            ]));
        }
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

/// Key hints for the current screen, built from the active keybindings.
pub fn hints(model: &Model, resolver: &KeyResolver) -> Vec<Keybinding> {
    let back = Keybinding::new(resolver.display_global(GlobalAction::Back), "back");

    if model.is_editing() {
        return vec![
            Keybinding::new(resolver.display_nav(NavAction::Select), "done"),
            Keybinding::new(resolver.display_form(FormAction::NextField), "next field"),
            Keybinding::new(resolver.display_global(GlobalAction::Back), "stop editing"),
        ];
    }

    let navigate = Keybinding::new(
        format!(
            "{}/{}",
            resolver.display_nav(NavAction::Up),
            resolver.display_nav(NavAction::Down)
        ),
        "navigate",
    );
    let select = Keybinding::new(resolver.display_nav(NavAction::Select), "select");
    let quit = Keybinding::new(resolver.display_global(GlobalAction::Quit), "quit");

    match model.screen() {
        Screen::MainMenu => vec![navigate, select, quit],
        Screen::BucketMenu | Screen::InstanceMenu => vec![navigate, select, back, quit],
        Screen::BucketCreateForm | Screen::InstanceCreateForm => vec![
            Keybinding::new(resolver.display_form(FormAction::NextField), "switch field"),
            Keybinding::new(resolver.display_form(FormAction::Edit), "edit"),
            navigate,
            select,
            back,
        ],
        Screen::ResultScreen => vec![
            Keybinding::new(resolver.display_global(GlobalAction::Back), "main menu"),
            quit,
        ],
    }
}
