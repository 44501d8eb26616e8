//! UI Runtime
//!
//! Owns the terminal and the frame loop: refreshes the preview, folds in
//! completed service calls, handles key presses and runs `Command`s on
//! background tasks.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cardcheck_config::CardcheckConfig;
use cardcheck_core::CardService;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::{AppEvent, AppState, CaptureSettings, Command};
use crate::input::handle_key_event;
use crate::render::draw_ui;

/// Redraw and preview refresh interval.
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Run a command to completion against `service`.
pub async fn run_command(command: Command, service: &dyn CardService) -> AppEvent {
    match command {
        Command::ReadFile { ticket, path } => AppEvent::FileRead {
            ticket,
            result: media::read_image_file(&path).await,
        },
        Command::Extract { ticket, image } => AppEvent::Extracted {
            ticket,
            result: service.extract(&image).await,
        },
        Command::Submit { ticket, fields } => AppEvent::Submitted {
            ticket,
            result: service.submit(&fields).await,
        },
    }
}

/// Run `command` on a background task and post its completion to `tx`.
pub fn spawn_command(command: Command, service: Arc<dyn CardService>, tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let event = run_command(command, service.as_ref()).await;
        if tx.send(event).is_err() {
            debug!("UI closed before command completed");
        }
    });
}

/// Pull the next preview frame. Camera reads block, so the worker thread is
/// handed over to the scheduler for the duration.
fn refresh_preview(state: &mut AppState) {
    tokio::task::block_in_place(|| state.tick());
}

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

fn init_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the interactive verifier until the user quits.
pub async fn run_ui(config: &CardcheckConfig, service: Arc<dyn CardService>) -> Result<()> {
    let mut state = AppState::new(CaptureSettings::from_config(config));
    info!(service = %config.service.base_url, "UI started");

    let mut terminal = init_terminal()?;
    let run_result = run_loop(&mut terminal, &mut state, service).await;
    // Leaving the screen state releases the camera before the terminal is restored.
    drop(state);
    let restore_result = restore_terminal(&mut terminal);

    run_result?;
    restore_result?;
    info!("UI exited");
    Ok(())
}

async fn run_loop(terminal: &mut AppTerminal, state: &mut AppState, service: Arc<dyn CardService>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    while !state.should_quit {
        let frame_started = Instant::now();
        refresh_preview(state);
        while let Ok(event) = rx.try_recv() {
            state.handle_event(event);
        }

        terminal
            .draw(|f| draw_ui(f, state))
            .context("Failed to draw UI frame")?;

        while event::poll(Duration::ZERO).context("Failed to poll input")? {
            let Event::Key(key) = event::read().context("Failed to read input")? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(command) = handle_key_event(key, state) {
                spawn_command(command, Arc::clone(&service), tx.clone());
            }
            if state.should_quit {
                break;
            }
        }

        if let Some(remaining) = FRAME_INTERVAL.checked_sub(frame_started.elapsed()) {
            tokio::time::sleep(remaining).await;
        }
    }

    Ok(())
}
