use super::{ListRenderer, PageView, RenderedLine, RenderedPage, Tone, cell_text, pad};
use crate::types::ViewMode;

const CARD_WIDTH: usize = 30;
const GAP: &str = "  ";

/// Cards laid out left to right: the first visible column is the card title,
/// the rest are `label: value` lines.
pub struct GridRenderer;

impl GridRenderer {
    fn cards_per_row(width: usize) -> usize {
        ((width + GAP.len()) / (CARD_WIDTH + GAP.len())).max(1)
    }
}

impl ListRenderer for GridRenderer {
    fn mode(&self) -> ViewMode {
        ViewMode::Grid
    }

    fn render(&self, page: &PageView<'_>) -> RenderedPage {
        let mut rendered = RenderedPage::default();
        let Some((title_column, field_columns)) = page.columns.split_first() else {
            return rendered;
        };
        let per_row = Self::cards_per_row(page.width);
        let card_height = 1 + field_columns.len();

        for (row, chunk) in page.items.chunks(per_row).enumerate() {
            if row > 0 {
                rendered.lines.push(RenderedLine::default());
            }
            let start = rendered.lines.len();
            let mut lines = vec![RenderedLine::default(); card_height];

            for (offset, item) in chunk.iter().enumerate() {
                let index = row * per_row + offset;
                rendered.item_starts.push(start);

                if offset > 0 {
                    for line in lines.iter_mut() {
                        line.push(GAP, Tone::Normal);
                    }
                }

                let title_tone = if page.cursor == Some(index) {
                    Tone::Selected
                } else {
                    Tone::Header
                };
                let title = cell_text(item, &title_column.key);
                let title = if title.is_empty() { item.key.to_string() } else { title };
                lines[0].push(pad(&title, CARD_WIDTH), title_tone);

                for (line, column) in lines[1..].iter_mut().zip(field_columns) {
                    let label = format!("{}: ", column.label);
                    let value = cell_text(item, &column.key);
                    let value_width = CARD_WIDTH.saturating_sub(label.chars().count());
                    line.push(label, Tone::Muted);
                    line.push(pad(&value, value_width), Tone::Normal);
                }
            }

            rendered.lines.extend(lines);
        }

        rendered
    }
}
