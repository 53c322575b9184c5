use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fitchlist_engine::{ActionDef, ListController, ListEvent, ListSnapshot, find_action, primary_action};
use fitchlist_types::{ColumnDef, Record};
use std::time::{Duration, Instant};

use crate::types::ViewMode;

pub(crate) const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);
const PAGE_SIZES: [u64; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PromptKind {
    Search,
    Filter { column: String, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// Action awaiting a y/n answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Confirm {
    pub action: String,
    pub message: String,
}

/// Async work the event loop runs on the runtime on behalf of a key press
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    Refresh,
    RunAction {
        key: String,
        row: Option<Record>,
        confirmed: bool,
    },
}

pub(crate) struct App {
    controller: ListController<Record>,
    actions: Vec<ActionDef<Record>>,
    pub resource: String,
    pub mode: ViewMode,
    pub snapshot: ListSnapshot<Record>,
    pub cursor: usize,
    /// Index into all columns, hidden ones included
    pub focus_column: usize,
    pub prompt: Option<Prompt>,
    pending_search: Option<(String, Instant)>,
    pub confirm: Option<Confirm>,
    pub inspecting: bool,
    notification: Option<(String, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        controller: ListController<Record>,
        actions: Vec<ActionDef<Record>>,
        resource: impl Into<String>,
        mode: ViewMode,
    ) -> Self {
        let snapshot = controller.snapshot();
        Self {
            controller,
            actions,
            resource: resource.into(),
            mode,
            snapshot,
            cursor: 0,
            focus_column: 0,
            prompt: None,
            pending_search: None,
            confirm: None,
            inspecting: false,
            notification: None,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &ListController<Record> {
        &self.controller
    }

    pub fn action(&self, key: &str) -> Option<&ActionDef<Record>> {
        find_action(&self.actions, key)
    }

    pub fn primary_action(&self) -> Option<&ActionDef<Record>> {
        primary_action(&self.actions)
    }

    pub fn refresh_snapshot(&mut self) {
        self.snapshot = self.controller.snapshot();
        self.cursor = self.cursor.min(self.snapshot.items.len().saturating_sub(1));
        self.focus_column = self
            .focus_column
            .min(self.snapshot.columns.all().len().saturating_sub(1));
    }

    pub fn cursor_item(&self) -> Option<&Record> {
        self.snapshot.items.get(self.cursor)
    }

    pub fn focused_column(&self) -> Option<&ColumnDef> {
        self.snapshot.columns.all().get(self.focus_column)
    }

    /// Position of the focused column among the visible ones.
    pub fn focus_in_visible(&self) -> Option<usize> {
        let key = &self.focused_column()?.key;
        self.snapshot
            .columns
            .visible()
            .iter()
            .position(|column| &column.key == key)
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn notify(&mut self, text: impl Into<String>, now: Instant) {
        self.notification = Some((text.into(), now));
    }

    pub fn on_event(&mut self, event: ListEvent, now: Instant) {
        match event {
            ListEvent::FetchFailed { error, .. } => {
                self.notify(format!("Fetch failed: {}", error.message), now);
            }
            ListEvent::Loaded { .. } => {}
            ListEvent::StaleDiscarded { seq } => {
                tracing::debug!(seq, "stale page ignored");
            }
        }
    }

    /// Apply a debounced search term once it has settled; expire notifications.
    pub fn tick(&mut self, now: Instant) {
        if let Some((term, since)) = &self.pending_search
            && now.duration_since(*since) >= SEARCH_DEBOUNCE
        {
            let term = term.clone();
            self.pending_search = None;
            self.apply_search(term);
        }
        if let Some((_, since)) = &self.notification
            && now.duration_since(*since) >= NOTIFICATION_TTL
        {
            self.notification = None;
        }
    }

    fn apply_search(&mut self, term: String) {
        if self.controller.set_search_term(term.trim()) {
            self.cursor = 0;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }
        if self.confirm.is_some() {
            return self.handle_confirm_key(key, now);
        }
        if self.prompt.is_some() {
            self.handle_prompt_key(key, now);
            return None;
        }
        if self.inspecting {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.inspecting = false;
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.snapshot.items.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => {
                if self.focus_column + 1 < self.snapshot.columns.all().len() {
                    self.focus_column += 1;
                }
            }
            KeyCode::Left => self.focus_column = self.focus_column.saturating_sub(1),
            KeyCode::Char('/') => {
                self.prompt = Some(Prompt {
                    kind: PromptKind::Search,
                    input: self.snapshot.view.search_term.clone(),
                });
            }
            KeyCode::Char('s') => self.sort_focused(false, now),
            KeyCode::Char('S') => self.sort_focused(true, now),
            KeyCode::Char('f') => self.open_filter_prompt(now),
            KeyCode::Char('c') => match self.snapshot.clear_affordance {
                Some(action) => {
                    self.controller.clear(action);
                    self.cursor = 0;
                    self.notify(format!("Done: {}", action.label()), now);
                }
                None => self.notify("Nothing to clear", now),
            },
            KeyCode::Char('n') | KeyCode::PageDown => {
                if self.controller.next_page() {
                    self.cursor = 0;
                }
            }
            KeyCode::Char('p') | KeyCode::PageUp => {
                if self.controller.previous_page() {
                    self.cursor = 0;
                }
            }
            KeyCode::Char('+') => self.step_page_size(true),
            KeyCode::Char('-') => self.step_page_size(false),
            KeyCode::Char('v') => {
                self.mode = self.mode.next();
                self.notify(format!("{} view", self.mode), now);
            }
            KeyCode::Char('h') => self.toggle_focused_column(now),
            KeyCode::Char('H') => self.controller.show_all_columns(),
            KeyCode::Char(' ') => {
                if self.require_selection_mode(now)
                    && let Some(item) = self.cursor_item()
                {
                    self.controller.toggle_row(item.key.clone());
                }
            }
            KeyCode::Char('a') => {
                if self.require_selection_mode(now) {
                    self.controller.toggle_page_selection();
                }
            }
            KeyCode::Char('x') => self.controller.clear_selection(),
            KeyCode::Char('r') => return Some(Effect::Refresh),
            KeyCode::Char('d') => return self.request_action("delete", now),
            KeyCode::Enter => self.inspecting = self.cursor_item().is_some(),
            _ => {}
        }
        None
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, now: Instant) -> Option<Effect> {
        let confirm = self.confirm.take()?;
        if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            return Some(Effect::RunAction {
                key: confirm.action,
                row: self.cursor_item().cloned(),
                confirmed: true,
            });
        }
        self.notify("Cancelled", now);
        None
    }

    fn handle_prompt_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                self.pending_search = None;
            }
            KeyCode::Enter => {
                let Some(prompt) = self.prompt.take() else {
                    return;
                };
                match prompt.kind {
                    PromptKind::Search => {
                        self.pending_search = None;
                        self.apply_search(prompt.input);
                    }
                    PromptKind::Filter { column, label } => {
                        self.apply_filter(&column, &label, &prompt.input, now)
                    }
                }
            }
            KeyCode::Backspace => {
                prompt.input.pop();
                if prompt.kind == PromptKind::Search {
                    self.pending_search = Some((prompt.input.clone(), now));
                }
            }
            KeyCode::Char(c) => {
                prompt.input.push(c);
                if prompt.kind == PromptKind::Search {
                    self.pending_search = Some((prompt.input.clone(), now));
                }
            }
            _ => {}
        }
    }

    fn sort_focused(&mut self, additive: bool, now: Instant) {
        let Some(column) = self.focused_column().cloned() else {
            return;
        };
        if !column.sortable {
            self.notify(format!("{} is not sortable", column.label), now);
            return;
        }
        if self.controller.toggle_sort(&column.key, additive) {
            self.cursor = 0;
        }
    }

    fn open_filter_prompt(&mut self, now: Instant) {
        let Some(column) = self.focused_column().cloned() else {
            return;
        };
        if !column.filterable {
            self.notify(format!("{} is not filterable", column.label), now);
            return;
        }
        let current = self
            .snapshot
            .view
            .filters
            .get(&column.key)
            .map(|values| values.join(","))
            .unwrap_or_default();
        self.prompt = Some(Prompt {
            kind: PromptKind::Filter {
                column: column.key,
                label: column.label,
            },
            input: current,
        });
    }

    fn apply_filter(&mut self, key: &str, label: &str, input: &str, now: Instant) {
        let values: Vec<String> = input
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect();

        let options = self
            .snapshot
            .columns
            .get(key)
            .map(|column| column.filter_options.clone())
            .unwrap_or_default();
        if let Some(unknown) = values
            .iter()
            .find(|value| !options.is_empty() && !options.contains(value))
        {
            self.notify(
                format!(
                    "Unknown {} value '{}' (expected: {})",
                    label,
                    unknown,
                    options.join(", ")
                ),
                now,
            );
            return;
        }

        if self.controller.set_filter(key, values) {
            self.cursor = 0;
        }
    }

    fn step_page_size(&mut self, larger: bool) {
        let current = self.snapshot.view.pagination.page_size;
        let next = if larger {
            PAGE_SIZES.iter().copied().find(|size| *size > current)
        } else {
            PAGE_SIZES.iter().rev().copied().find(|size| *size < current)
        };
        if let Some(size) = next
            && self.controller.set_page_size(size)
        {
            self.cursor = 0;
        }
    }

    fn toggle_focused_column(&mut self, now: Instant) {
        let Some(column) = self.focused_column().cloned() else {
            return;
        };
        if self.controller.toggle_column(&column.key).is_none() {
            self.notify("At least one column must stay visible", now);
        }
    }

    fn require_selection_mode(&mut self, now: Instant) -> bool {
        if self.mode.supports_selection() {
            return true;
        }
        self.notify("Selection is only available in table view", now);
        false
    }

    fn request_action(&mut self, key: &str, now: Instant) -> Option<Effect> {
        let action = self.action(key)?.clone();
        let selected = self.snapshot.selection.len();
        if selected == 0 && self.cursor_item().is_none() {
            self.notify("Nothing to act on", now);
            return None;
        }

        if action.requires_confirmation {
            let target = if selected > 0 {
                format!("{} selected", selected)
            } else {
                self.cursor_item()
                    .map(|item| format!("#{}", item.key))
                    .unwrap_or_default()
            };
            self.confirm = Some(Confirm {
                action: action.key.clone(),
                message: format!("{} {}? (y/n)", action.label, target),
            });
            return None;
        }

        Some(Effect::RunAction {
            key: action.key,
            row: self.cursor_item().cloned(),
            confirmed: false,
        })
    }
}
