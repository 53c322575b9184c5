use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::Component;
use crate::presentation::tui::app::{App, PromptKind};

pub(crate) struct FooterComponent;

fn key_hints(app: &App) -> String {
    let mut hints = vec![
        "/ search", "s/S sort", "f filter", "c clear", "n/p page", "+/- size", "v view", "h column",
    ];
    if app.mode.supports_selection() {
        hints.extend(["space select", "a page"]);
    }
    hints.extend(["r refresh", "enter inspect", "q quit"]);

    let mut text = hints.join("  ");
    if let Some(action) = app.primary_action()
        && let Some(hotkey) = action.key.chars().next()
    {
        text.push_str(&format!("  {} {}", hotkey, action.label.to_lowercase()));
    }
    text
}

impl Component for FooterComponent {
    fn render(&self, f: &mut Frame, area: Rect, app: &App) {
        let line = if let Some(confirm) = &app.confirm {
            Line::from(Span::styled(
                confirm.message.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
        } else if let Some(prompt) = &app.prompt {
            let label = match &prompt.kind {
                PromptKind::Search => "Search".to_string(),
                PromptKind::Filter { label, .. } => format!("Filter {} (comma separated)", label),
            };
            Line::from(vec![
                Span::styled(format!("{}: ", label), Style::default().fg(Color::Cyan)),
                Span::raw(prompt.input.clone()),
                Span::styled("▏", Style::default().fg(Color::Cyan)),
            ])
        } else if let Some(notification) = app.notification() {
            Line::from(Span::styled(notification.to_string(), Style::default().fg(Color::Yellow)))
        } else {
            Line::from(Span::styled(key_hints(app), Style::default().fg(Color::DarkGray)))
        };

        let footer = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(footer, area);
    }
}
