use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::Component;
use crate::presentation::tui::app::App;

/// Pretty-printed JSON of the row under the cursor, drawn over the body.
pub(crate) struct InspectComponent;

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

impl Component for InspectComponent {
    fn render(&self, f: &mut Frame, area: Rect, app: &App) {
        let Some(item) = app.cursor_item() else {
            return;
        };
        let body = serde_json::to_string_pretty(&item.fields)
            .unwrap_or_else(|e| format!("unprintable record: {}", e));

        let popup = centered(area, 80, 80);
        f.render_widget(Clear, popup);
        f.render_widget(
            Paragraph::new(body).wrap(Wrap { trim: false }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(format!(" {} #{} ", app.resource, item.key)),
            ),
            popup,
        );
    }
}
