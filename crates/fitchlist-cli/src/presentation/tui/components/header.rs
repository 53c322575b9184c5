use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::Component;
use crate::presentation::tui::app::App;
use crate::presentation::{page_summary, query_summary};

pub(crate) struct HeaderComponent;

/// Title, paging status, active query and the column bar.
pub(crate) const HEADER_HEIGHT: u16 = 4;

impl Component for HeaderComponent {
    fn render(&self, f: &mut Frame, area: Rect, app: &App) {
        let snapshot = &app.snapshot;

        let mut title = vec![
            Span::styled(
                "━━ ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                app.resource.clone(),
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {}  ", page_summary(&snapshot.view))),
            Span::styled(format!("[{}]", app.mode), Style::default().fg(Color::DarkGray)),
        ];
        if snapshot.loading {
            title.push(Span::styled("  loading…", Style::default().fg(Color::Yellow)));
        }
        if !snapshot.selection.is_empty() {
            title.push(Span::styled(
                format!("  {} selected", snapshot.selection.len()),
                Style::default().fg(Color::Cyan),
            ));
        }

        let query = query_summary(&snapshot.view);
        let mut query_line = if query.is_empty() {
            vec![Span::styled("no search, sort or filters", Style::default().fg(Color::DarkGray))]
        } else {
            vec![Span::raw(query.join("  "))]
        };
        if let Some(action) = snapshot.clear_affordance {
            query_line.push(Span::styled(
                format!("  [c] {}", action.label()),
                Style::default().fg(Color::Yellow),
            ));
        }

        let mut columns = vec![Span::styled("columns: ", Style::default().fg(Color::DarkGray))];
        for (index, column) in snapshot.columns.all().iter().enumerate() {
            let mut style = if snapshot.columns.is_hidden(&column.key) {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            if index == app.focus_column {
                style = style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED);
            }
            columns.push(Span::styled(column.label.clone(), style));
            columns.push(Span::raw(" "));
        }

        let header = Paragraph::new(vec![
            Line::from(title),
            Line::from(query_line),
            Line::from(columns),
        ])
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(header, area);
    }
}
