use super::{ListRenderer, PageView, RenderedLine, RenderedPage, Tone, cell_text, truncate};
use crate::types::ViewMode;

/// Two lines per record: title and key, then the remaining fields inline.
pub struct ListLayoutRenderer;

impl ListRenderer for ListLayoutRenderer {
    fn mode(&self) -> ViewMode {
        ViewMode::List
    }

    fn render(&self, page: &PageView<'_>) -> RenderedPage {
        let mut rendered = RenderedPage::default();
        let Some((title_column, field_columns)) = page.columns.split_first() else {
            return rendered;
        };
        let width = page.width.max(8);

        for (index, item) in page.items.iter().enumerate() {
            let on_cursor = page.cursor == Some(index);
            rendered.item_starts.push(rendered.lines.len());

            let mut title = RenderedLine::default();
            title.push(if on_cursor { "> " } else { "  " }, Tone::Accent);
            title.push(
                truncate(&cell_text(item, &title_column.key), width - 2),
                if on_cursor { Tone::Selected } else { Tone::Header },
            );
            title.push(format!("  #{}", item.key), Tone::Muted);
            rendered.lines.push(title);

            let details = field_columns
                .iter()
                .map(|column| format!("{}: {}", column.label, cell_text(item, &column.key)))
                .collect::<Vec<_>>()
                .join(" · ");
            let mut detail = RenderedLine::default();
            detail.push("    ", Tone::Muted);
            detail.push(truncate(&details, width - 4), Tone::Muted);
            rendered.lines.push(detail);
        }

        rendered
    }
}
