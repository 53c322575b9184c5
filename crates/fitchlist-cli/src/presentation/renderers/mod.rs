//! Layout strategies for one page of records.
//!
//! Renderers produce a neutral line model ([`RenderedPage`]) that the
//! console printer colours with ANSI codes and the TUI turns into ratatui
//! spans, so both front ends share one layout per [`ViewMode`].

mod grid;
mod list;
mod table;

pub use grid::GridRenderer;
pub use list::ListLayoutRenderer;
pub use table::TableRenderer;

use chrono::{DateTime, Utc};
use fitchlist_engine::Selection;
use fitchlist_types::{ColumnDef, Record, SortField, SortOrder};

use crate::types::ViewMode;

/// Semantic style of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Header,
    Muted,
    /// The row under the cursor
    Selected,
    /// Focused column, checked markers
    Accent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tone: Tone,
}

impl Segment {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedLine {
    pub segments: Vec<Segment>,
}

impl RenderedLine {
    pub fn push(&mut self, text: impl Into<String>, tone: Tone) {
        self.segments.push(Segment::new(text, tone));
    }

    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    pub lines: Vec<RenderedLine>,
    /// Index into `lines` where each item starts, in item order
    pub item_starts: Vec<usize>,
}

impl RenderedPage {
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(RenderedLine::plain_text).collect()
    }

    /// Line range occupied by `item`.
    pub fn item_span(&self, item: usize) -> Option<(usize, usize)> {
        let start = *self.item_starts.get(item)?;
        // Grid cards in one row share a start line.
        let end = self.item_starts[item..]
            .iter()
            .copied()
            .find(|&next| next > start)
            .unwrap_or(self.lines.len());
        Some((start, end))
    }
}

/// Everything a renderer looks at for one page
pub struct PageView<'a> {
    pub items: &'a [Record],
    /// Visible columns only
    pub columns: Vec<&'a ColumnDef>,
    pub selection: &'a Selection,
    pub sort: &'a [SortField],
    pub cursor: Option<usize>,
    pub focus_column: Option<usize>,
    /// Available width in characters
    pub width: usize,
}

pub trait ListRenderer: Send + Sync {
    fn mode(&self) -> ViewMode;
    fn render(&self, page: &PageView<'_>) -> RenderedPage;
}

static TABLE: TableRenderer = TableRenderer;
static GRID: GridRenderer = GridRenderer;
static LIST: ListLayoutRenderer = ListLayoutRenderer;

pub fn renderer_for(mode: ViewMode) -> &'static dyn ListRenderer {
    match mode {
        ViewMode::Table => &TABLE,
        ViewMode::Grid => &GRID,
        ViewMode::List => &LIST,
    }
}

/// `▲`/`▼` for a sorted column, with its rank when several keys are active.
pub(crate) fn sort_marker(sort: &[SortField], key: &str) -> Option<String> {
    let (rank, field) = sort.iter().enumerate().find(|(_, f)| f.field == key)?;
    let arrow = match field.order {
        SortOrder::Ascend => "▲",
        SortOrder::Descend => "▼",
    };
    Some(if sort.len() > 1 {
        format!("{}{}", arrow, rank + 1)
    } else {
        arrow.to_string()
    })
}

/// Display text for one cell. RFC 3339 timestamps are shortened to minutes.
pub(crate) fn cell_text(item: &Record, key: &str) -> String {
    let text = item.text(key);
    match DateTime::parse_from_rfc3339(&text) {
        Ok(at) => at.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => text,
    }
}

pub(crate) fn truncate(text: &str, width: usize) -> String {
    let text = text.replace(['\n', '\r'], " ");
    if text.chars().count() <= width {
        return text;
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

pub(crate) fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{}", text, " ".repeat(fill))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use fitchlist_types::ColumnDef;
    use serde_json::json;

    pub fn records() -> Vec<Record> {
        [
            json!({"id": 1, "name": "Practical 1", "due_date": "2025-03-02", "status": "open"}),
            json!({"id": 2, "name": "Practical 2", "due_date": "2025-03-03", "status": "closed"}),
        ]
        .into_iter()
        .filter_map(|value| Record::from_json(value, "id").ok())
        .collect()
    }

    pub fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("name", "Name").sortable(),
            ColumnDef::new("due_date", "Due").sortable(),
            ColumnDef::new("status", "Status").filterable(),
        ]
    }
}
