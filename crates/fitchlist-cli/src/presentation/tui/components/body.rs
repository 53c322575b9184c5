use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::presentation::inferred_columns;
use crate::presentation::renderers::{PageView, RenderedLine, Tone, renderer_for};
use crate::presentation::tui::app::App;

pub(crate) struct BodyComponent;

pub(crate) fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Normal => Style::default(),
        Tone::Header => Style::default().add_modifier(Modifier::BOLD),
        Tone::Muted => Style::default().fg(Color::DarkGray),
        Tone::Selected => Style::default().add_modifier(Modifier::REVERSED),
        Tone::Accent => Style::default().fg(Color::Cyan),
    }
}

fn to_line(line: &RenderedLine) -> Line<'static> {
    Line::from(
        line.segments
            .iter()
            .map(|segment| Span::styled(segment.text.clone(), tone_style(segment.tone)))
            .collect::<Vec<_>>(),
    )
}

/// First line to show so that `span` stays inside `height` scrollable lines.
fn scroll_offset(span: Option<(usize, usize)>, fixed: usize, height: usize) -> usize {
    let Some((start, end)) = span else {
        return 0;
    };
    let (start, end) = (start.saturating_sub(fixed), end.saturating_sub(fixed));
    if end <= height {
        0
    } else {
        start.min(end - height)
    }
}

impl Component for BodyComponent {
    fn render(&self, f: &mut Frame, area: Rect, app: &App) {
        let snapshot = &app.snapshot;

        if snapshot.items.is_empty() {
            let message = if snapshot.loading {
                "Loading…".to_string()
            } else if let Some(error) = &snapshot.last_error {
                format!("Could not load {}: {}", app.resource, error.message)
            } else {
                format!("No {} match the current view", app.resource)
            };
            let style = Style::default().fg(Color::DarkGray);
            f.render_widget(Paragraph::new(Line::styled(message, style)), area);
            return;
        }

        let inferred = inferred_columns(&snapshot.items);
        let columns = if snapshot.columns.all().is_empty() {
            inferred.iter().collect()
        } else {
            snapshot.columns.visible()
        };
        let page = PageView {
            items: &snapshot.items,
            columns,
            selection: &snapshot.selection,
            sort: &snapshot.view.sort,
            cursor: Some(app.cursor),
            focus_column: app.focus_in_visible(),
            width: area.width as usize,
        };
        let rendered = renderer_for(app.mode).render(&page);

        // Lines before the first item (the table header) stay pinned.
        let fixed = rendered.item_starts.first().copied().unwrap_or(0);
        let height = (area.height as usize).saturating_sub(fixed);
        let offset = scroll_offset(rendered.item_span(app.cursor), fixed, height);

        let lines: Vec<Line> = rendered.lines[..fixed]
            .iter()
            .chain(rendered.lines[fixed..].iter().skip(offset).take(height))
            .map(to_line)
            .collect();
        f.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offset_keeps_cursor_visible() {
        assert_eq!(scroll_offset(None, 1, 10), 0);
        assert_eq!(scroll_offset(Some((3, 4)), 1, 10), 0);
        assert_eq!(scroll_offset(Some((15, 16)), 1, 10), 5);
        assert_eq!(scroll_offset(Some((8, 14)), 0, 4), 8);
    }
}
