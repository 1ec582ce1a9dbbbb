//! Interactive wizard (Ratatui-based)
//!
//! Provides:
//! - Single-screen step flow with a step sidebar and info panel
//! - Backend calls on worker threads, polled from the draw loop

pub mod app;
pub mod ui;

use anyhow::Result;
use app::{App, BackendCall, CallOutcome, CallResponse, InputResult, PendingCall};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use shellgen_core::backend::Backend;
use shellgen_core::config::Config;
use shellgen_core::download;
use shellgen_core::wizard::WizardStep;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

/// Run the wizard (interactive TUI).
pub fn run(config: &Config, backend: Arc<dyn Backend>) -> Result<()> {
    use std::io::IsTerminal;

    // Check if we have a real terminal
    if !std::io::stdout().is_terminal() {
        anyhow::bail!(
            "No TTY detected. The wizard requires an interactive terminal.\n\
             Try running directly in a terminal (not piped or via script),\n\
             or use `shellgen generate` for scripted use."
        );
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let mut app = App::new(config);
    let outcome = run_loop(&mut terminal, &mut app, backend);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

/// Render every step once, as text, for inspection without a terminal.
pub fn dump_all_steps(config: &Config) -> String {
    let mut app = App::new(config);
    let mut out = String::new();
    for step in WizardStep::all() {
        // Mount only; the returned call is never run.
        let _ = app.enter(*step);
        out.push_str(&ui::dump_step(&app));
        out.push('\n');
    }
    out
}

/// Main application loop (single screen)
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    backend: Arc<dyn Backend>,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<CallResponse>();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.handle_input(key) {
                    InputResult::Quit => {
                        info!("Quit requested");
                        return Ok(());
                    }
                    InputResult::Continue => {}
                    InputResult::Call(pending) => spawn_call(&backend, pending, tx.clone()),
                    InputResult::OpenLink(url) => {
                        if let Err(err) = crate::links::open_external(&url) {
                            warn!("{:#}", err);
                            app.status_message = format!("❌ Could not open {}", url);
                        }
                    }
                }
            }
        }

        while let Ok(response) = rx.try_recv() {
            app.apply_response(response);
        }
    }
}

fn spawn_call(backend: &Arc<dyn Backend>, pending: PendingCall, tx: mpsc::Sender<CallResponse>) {
    let backend = Arc::clone(backend);
    debug!("Dispatching {:?} (ticket {})", pending.call, pending.ticket);
    thread::spawn(move || {
        let outcome = execute_call(backend.as_ref(), pending.call);
        let _ = tx.send(CallResponse {
            ticket: pending.ticket,
            outcome,
        });
    });
}

/// Run one backend call to completion on the current thread.
pub fn execute_call(backend: &dyn Backend, call: BackendCall) -> CallOutcome {
    match call {
        BackendCall::ShellTechnologies => CallOutcome::Shells(backend.shell_technologies()),
        BackendCall::ClientTechnologies => CallOutcome::Clients(backend.client_technologies()),
        BackendCall::Features { technology } => {
            CallOutcome::Features(backend.features(&technology))
        }
        BackendCall::Generate(request) => CallOutcome::Generated(backend.generate(&request)),
        BackendCall::Download {
            result,
            dir,
            timeout_secs,
        } => CallOutcome::Downloaded(
            download::download_result(&result, &dir, timeout_secs)
                .map_err(|err| format!("{:#}", err)),
        ),
    }
}
