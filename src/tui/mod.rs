//! Terminal User Interface module for qask.
//!
//! Provides the interactive question page: a question input, an answer panel
//! and a sources panel, using ratatui for rendering and crossterm for terminal
//! management.

use std::io;
use std::panic;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::controller::QueryController;
use crate::endpoint::QaTransport;
use crate::surface::SharedSurface;

mod app;
pub mod event;
mod ui;

pub use app::{App, Focus};
use event::KeyAction;

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This should always be called before exiting the TUI, even in error cases,
/// to prevent terminal corruption.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic hook. Errors are ignored.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Installs a panic hook that restores the terminal before the original hook runs.
///
/// Only the UI thread restores: a panicking request worker is contained by its
/// trigger guard and must not tear the screen down under a running UI.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if thread::current().name() != Some(WORKER_THREAD_NAME) {
            restore_terminal_panic();
        }
        original_hook(panic_info);
    }));
}

const WORKER_THREAD_NAME: &str = "qask-query";

/// Runs one request cycle on a worker thread.
///
/// The controller guards re-entrancy itself, so a spawn racing an in-flight
/// cycle ends without touching the display.
fn spawn_query(controller: &QueryController<SharedSurface>) -> Result<()> {
    let mut controller = controller.clone();
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            controller.submit_query();
        })
        .context("failed to spawn query worker")?;
    Ok(())
}

/// Runs the main event loop for the TUI.
///
/// Terminal state is always restored, even on error.
pub fn run_event_loop(app: &mut App, controller: &QueryController<SharedSurface>) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, controller, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

fn run_event_loop_internal(
    app: &mut App,
    controller: &QueryController<SharedSurface>,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        // Short poll so worker updates show up without a key press
        if crossterm_event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = crossterm_event::read()?
        {
            match event::handle_key_event(app, key) {
                KeyAction::Continue => {}
                KeyAction::Submit => spawn_query(controller)?,
                KeyAction::Quit => break,
            }
        }
    }

    Ok(())
}

/// Entry point for the TUI application.
///
/// # Errors
///
/// Returns an error if terminal initialization or the event loop fails.
pub fn run(transport: Arc<dyn QaTransport>) -> Result<()> {
    init_panic_hook();

    let mut app = App::new();
    let controller = QueryController::new(transport, app.surface().clone());

    run_event_loop(&mut app, &controller).context("TUI event loop failed")?;

    Ok(())
}
