use super::{
    ListRenderer, PageView, RenderedLine, RenderedPage, Tone, cell_text, pad, sort_marker, truncate,
};
use crate::types::ViewMode;

const GAP: &str = "  ";
const MAX_CELL: usize = 32;
const MIN_CELL: usize = 4;

/// One row per record, one column per visible column, with selection markers
pub struct TableRenderer;

fn header_text(page: &PageView<'_>, index: usize) -> String {
    let column = page.columns[index];
    match sort_marker(page.sort, &column.key) {
        Some(marker) => format!("{} {}", column.label, marker),
        None => column.label.clone(),
    }
}

fn column_widths(page: &PageView<'_>, marker_width: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = (0..page.columns.len())
        .map(|i| {
            let key = &page.columns[i].key;
            page.items
                .iter()
                .map(|item| cell_text(item, key).chars().count())
                .chain(std::iter::once(header_text(page, i).chars().count()))
                .max()
                .unwrap_or(0)
                .clamp(1, MAX_CELL)
        })
        .collect();

    let budget = page.width.saturating_sub(marker_width);
    let gaps = GAP.len() * widths.len().saturating_sub(1);
    while widths.iter().sum::<usize>() + gaps > budget {
        let Some((widest, width)) = widths
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(_, width)| *width)
        else {
            break;
        };
        if width <= MIN_CELL {
            break;
        }
        widths[widest] -= 1;
    }
    widths
}

impl ListRenderer for TableRenderer {
    fn mode(&self) -> ViewMode {
        ViewMode::Table
    }

    fn render(&self, page: &PageView<'_>) -> RenderedPage {
        let marker_width = 4;
        let widths = column_widths(page, marker_width);
        let last = widths.len().saturating_sub(1);
        let cell = |text: &str, i: usize| {
            if i == last {
                truncate(text, widths[i])
            } else {
                pad(text, widths[i])
            }
        };

        let mut rendered = RenderedPage::default();

        let mut header = RenderedLine::default();
        header.push(" ".repeat(marker_width), Tone::Header);
        for i in 0..page.columns.len() {
            if i > 0 {
                header.push(GAP, Tone::Header);
            }
            let tone = if page.focus_column == Some(i) {
                Tone::Accent
            } else {
                Tone::Header
            };
            header.push(cell(&header_text(page, i), i), tone);
        }
        rendered.lines.push(header);

        for (index, item) in page.items.iter().enumerate() {
            let row_tone = if page.cursor == Some(index) {
                Tone::Selected
            } else {
                Tone::Normal
            };

            let mut line = RenderedLine::default();
            if page.selection.is_selected(&item.key) {
                line.push("[x] ", Tone::Accent);
            } else {
                line.push("[ ] ", Tone::Muted);
            }
            for (i, column) in page.columns.iter().enumerate() {
                if i > 0 {
                    line.push(GAP, row_tone);
                }
                line.push(cell(&cell_text(item, &column.key), i), row_tone);
            }

            rendered.item_starts.push(rendered.lines.len());
            rendered.lines.push(line);
        }

        rendered
    }
}
