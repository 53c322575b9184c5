//! Interactive list browser.
//!
//! The terminal loop is synchronous (crossterm polling); fetches and actions
//! run as tasks on the tokio runtime passed in. Results come back through the
//! controller's event channel and a notification channel, and every frame
//! redraws from a fresh controller snapshot.

mod app;
mod components;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fitchlist_engine::{ActionDef, ListController, ListEvent};
use fitchlist_types::Record;
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::types::ViewMode;
use app::{App, Effect};

const TICK_RATE: Duration = Duration::from_millis(100);

pub fn run(
    runtime: &Runtime,
    controller: ListController<Record>,
    actions: Vec<ActionDef<Record>>,
    resource: &str,
    mode: ViewMode,
) -> Result<()> {
    let _guard = runtime.enter();
    let mut events = controller.subscribe();
    let auto_fetch = controller.spawn_auto_fetch();
    let (notes_tx, notes_rx) = mpsc::channel();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    ctrlc::set_handler(move || {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        std::process::exit(0);
    })?;

    let mut app = App::new(controller, actions, resource, mode);
    let result = event_loop(
        &mut terminal,
        &mut app,
        runtime,
        &mut events,
        &notes_tx,
        &notes_rx,
    );

    auto_fetch.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runtime: &Runtime,
    events: &mut broadcast::Receiver<ListEvent>,
    notes_tx: &Sender<String>,
    notes_rx: &Receiver<String>,
) -> Result<()> {
    while !app.should_quit {
        app.refresh_snapshot();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(TICK_RATE)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(effect) = app.handle_key(key, Instant::now())
        {
            dispatch(runtime, app, effect, notes_tx);
        }

        loop {
            match events.try_recv() {
                Ok(event) => app.on_event(event, Instant::now()),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "list events lagged");
                }
                Err(_) => break,
            }
        }
        while let Ok(note) = notes_rx.try_recv() {
            app.notify(note, Instant::now());
        }

        app.tick(Instant::now());
    }
    Ok(())
}

fn dispatch(runtime: &Runtime, app: &App, effect: Effect, notes: &Sender<String>) {
    match effect {
        Effect::Refresh => {
            app.controller().spawn_load();
        }
        Effect::RunAction {
            key,
            row,
            confirmed,
        } => {
            let Some(action) = app.action(&key).cloned() else {
                tracing::warn!(action = %key, "unknown action");
                return;
            };
            let controller = app.controller().clone();
            let notes = notes.clone();
            runtime.spawn(async move {
                let note = match controller.run_action(&action, row, confirmed).await {
                    Ok(()) => format!("{}: done", action.label),
                    Err(e) => e.to_string(),
                };
                let _ = notes.send(note);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitchlist_engine::ListOptions;
    use fitchlist_testing::ScriptedFetcher;
    use fitchlist_types::{ColumnDef, FetchError};
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_draw_table_view() -> Result<()> {
        let items: Vec<Record> = (1..=3)
            .filter_map(|i| {
                Record::from_json(json!({"id": i, "title": format!("Announcement {}", i)}), "id")
                    .ok()
            })
            .collect();
        let controller = ListController::new(
            ScriptedFetcher::paginating(items),
            ListOptions::new().columns(vec![ColumnDef::new("title", "Title").sortable()]),
        );
        controller.load_current_page().await;
        controller.toggle_sort("title", false);
        controller.select_row(fitchlist_types::RowKey::Number(2));

        let mut app = App::new(controller, Vec::new(), "announcements", ViewMode::Table);
        app.refresh_snapshot();

        let mut terminal = Terminal::new(TestBackend::new(80, 12))?;
        terminal.draw(|f| ui::draw(f, &app))?;
        let screen = buffer_text(&terminal);

        assert!(screen.contains("announcements"));
        assert!(screen.contains("page 1/1"));
        assert!(screen.contains("1 selected"));
        assert!(screen.contains("sort title"));
        assert!(screen.contains("[c] clear sort"));
        assert!(screen.contains("Title ▲"));
        assert!(screen.contains("[x] Announcement 2"));
        assert!(screen.contains("/ search"));
        Ok(())
    }

    #[tokio::test]
    async fn test_draw_empty_list_shows_error() -> Result<()> {
        let controller: ListController<Record> = ListController::new(
            ScriptedFetcher::failing(FetchError::server("Module not found")),
            ListOptions::new().columns(vec![ColumnDef::new("title", "Title")]),
        );
        controller.load_current_page().await;

        let mut app = App::new(controller, Vec::new(), "announcements", ViewMode::List);
        app.refresh_snapshot();

        let mut terminal = Terminal::new(TestBackend::new(80, 10))?;
        terminal.draw(|f| ui::draw(f, &app))?;
        assert!(buffer_text(&terminal).contains("Could not load announcements: Module not found"));
        Ok(())
    }
}
