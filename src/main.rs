// src/main.rs

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use faviscan::app::{App, AppState};
use faviscan::logging;
use faviscan::service::{ScanRequest, ScanResponse, ScanService, ServiceError};
use faviscan::ui;

type ScanOutcome = std::result::Result<ScanResponse, ServiceError>;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let service = Arc::new(ScanService::in_memory());
    let mut app = App::new();
    let (tx, mut rx) = mpsc::channel::<ScanOutcome>(1);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(&mut app, &service, &tx)?;
        }
        app.on_tick();

        if let Ok(outcome) = rx.try_recv() {
            app.finish_scan(match outcome {
                Ok(response) => Ok(response.result),
                Err(e) => Err(e.user_message()),
            });
        }
    }

    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    Ok(())
}

fn handle_events(
    app: &mut App,
    service: &Arc<ScanService>,
    tx: &mpsc::Sender<ScanOutcome>,
) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.state {
                AppState::Idle => handle_idle_input(app, key.code, service, tx, false),
                AppState::Finished => handle_finished_input(app, key.code, service, tx),
                AppState::Scanning => {
                    if key.code == KeyCode::Char('q') {
                        app.quit();
                    }
                }
            }
        }
    }
    Ok(())
}

/// While Idle the input box owns the keyboard, so only Esc quits.
fn handle_idle_input(
    app: &mut App,
    key_code: KeyCode,
    service: &Arc<ScanService>,
    tx: &mpsc::Sender<ScanOutcome>,
    bypass_cache: bool,
) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => {
            if app.input.trim().is_empty() {
                return;
            }
            spawn_scan(app, service, tx, bypass_cache);
        }
        _ => {}
    }
}

fn handle_finished_input(
    app: &mut App,
    key_code: KeyCode,
    service: &Arc<ScanService>,
    tx: &mpsc::Sender<ScanOutcome>,
) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        // Rescan the same domain, skipping the cache.
        KeyCode::Char('r') => {
            if !app.input.trim().is_empty() {
                spawn_scan(app, service, tx, true);
            }
        }
        KeyCode::Char('l') => {
            app.show_logs = !app.show_logs;
            if app.show_logs {
                app.load_logs();
            }
        }
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::Left => app.log_scroll_left(),
        KeyCode::Right => app.log_scroll_right(),
        _ => {}
    }
}

fn spawn_scan(
    app: &mut App,
    service: &Arc<ScanService>,
    tx: &mpsc::Sender<ScanOutcome>,
    bypass_cache: bool,
) {
    app.state = AppState::Scanning;
    app.scan_result = None;
    app.scan_error = None;
    let service = Arc::clone(service);
    let tx = tx.clone();
    let url = app.input.clone();

    tokio::spawn(async move {
        let outcome = service
            .scan(ScanRequest { url, bypass_cache }, "local")
            .await;
        let _ = tx.send(outcome).await;
    });
}
