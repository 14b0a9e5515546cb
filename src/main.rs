//! portico: a personal start page for the terminal.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use edtui::EditorEventHandler;
use portico::app_state::{AppState, View};
use portico::config::Config;
use portico::draft::MoveState;
use portico::status::{self, StatusBadge};
use portico::store::{DocumentStore, SaveWorker, StoreError};
use portico::{ingest, ui};
use ratatui::crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// How long one event-loop tick waits before draining the background
/// channels again.
const TICK: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(name = "portico")]
#[command(about = "A personal start page for the terminal", long_about = None)]
struct Args {
    /// Data directory holding the document files
    #[arg(value_name = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Uptime status endpoint to poll
    #[arg(long)]
    status_url: Option<String>,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut cfg = Config::load();

    // Override config with command line args
    if let Some(dir) = args.data_dir {
        cfg.data_dir = dir.to_string_lossy().to_string();
    }
    if let Some(url) = args.status_url {
        cfg.status_url = url;
    }

    let store = DocumentStore::new(PathBuf::from(&cfg.data_dir));
    if let Err(e) = store.bootstrap() {
        eprintln!("Could not prepare data directory {}: {e}", cfg.data_dir);
        std::process::exit(1);
    }

    // A document that fails to load or parse is fatal before the terminal
    // is taken over; there is no degraded interactive state to offer.
    let links = load_or_exit("links", store.load_links());
    let settings = load_or_exit("settings", store.load_settings());
    let notes = load_or_exit("notes", store.load_notes());

    let app = AppState::new(links, settings, notes);
    let worker = SaveWorker::spawn(store);
    let status_rx = status::spawn_poller(
        cfg.status_url.clone(),
        Duration::from_secs(cfg.status_poll_secs.max(1)),
    );

    run_tui(app, &worker, &status_rx)
}

fn load_or_exit<T>(what: &str, result: Result<T, StoreError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Could not load the {what} document: {e}");
            std::process::exit(1);
        }
    }
}

fn run_tui(
    mut app: AppState,
    worker: &SaveWorker,
    status_rx: &Receiver<StatusBadge>,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut editor_handler = EditorEventHandler::default();

    let result = run_app(&mut terminal, &mut app, worker, status_rx, &mut editor_handler);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

#[allow(clippy::too_many_lines)]
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    worker: &SaveWorker,
    status_rx: &Receiver<StatusBadge>,
    editor_handler: &mut EditorEventHandler,
) -> io::Result<()> {
    loop {
        // Drain the background channels before painting.
        while let Ok(badge) = status_rx.try_recv() {
            app.badge = badge;
        }
        while let Some(outcome) = worker.poll() {
            app.apply_save_outcome(&outcome);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }

        match event::read()? {
            Event::Paste(text) => handle_paste(app, &text),
            Event::Key(key) => {
                if app.quick_add.is_some() {
                    handle_quick_add_key(app, worker, key.code);
                    continue;
                }
                match app.view {
                    View::Display => {
                        if !handle_display_key(app, key) {
                            return Ok(());
                        }
                    }
                    View::Edit => handle_edit_key(app, key),
                    View::Notes => match key.code {
                        KeyCode::Char(':') => {
                            if let Some(ref editor_state) = app.notes_editor {
                                if editor_state.mode == edtui::EditorMode::Normal {
                                    open_command(app, View::Notes);
                                } else {
                                    editor_handler
                                        .on_key_event(key, app.notes_editor.as_mut().unwrap());
                                }
                            }
                        }
                        KeyCode::Esc => {
                            if let Some(ref editor_state) = app.notes_editor {
                                if editor_state.mode == edtui::EditorMode::Normal {
                                    app.exit_notes();
                                } else {
                                    editor_handler
                                        .on_key_event(key, app.notes_editor.as_mut().unwrap());
                                }
                            }
                        }
                        _ => {
                            if let Some(ref mut editor_state) = app.notes_editor {
                                editor_handler.on_key_event(key, editor_state);
                            }
                        }
                    },
                    View::Command => {
                        if !handle_command_key(app, worker, key.code) {
                            return Ok(());
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn open_command(app: &mut AppState, from: View) {
    app.command_return = from;
    app.view = View::Command;
    app.command_buffer.clear();
    app.message = None;
}

fn open_url(app: &mut AppState, url: &str) {
    // The browser decides the tab context; open_links_in_new_tab is a
    // persisted preference the terminal cannot act on further.
    if let Err(e) = open::that_detached(url) {
        app.message = Some(format!("Could not open {url}: {e}"));
    }
}

fn handle_paste(app: &mut AppState, text: &str) {
    match app.view {
        View::Display => {
            if let Some(ref mut form) = app.quick_add {
                if let Some(input) = form.focused_input_mut() {
                    input.extend(text.chars().filter(|c| !c.is_control()));
                }
            } else {
                // An unparseable payload cancels silently.
                app.begin_quick_add(text);
            }
        }
        View::Edit => {
            if let Some(ref mut draft) = app.draft {
                if draft.editing {
                    draft.insert_text(text);
                }
            }
        }
        View::Command => {
            app.command_buffer
                .extend(text.chars().filter(|c| !c.is_control()));
        }
        View::Notes => {}
    }
}

fn handle_quick_add_key(app: &mut AppState, worker: &SaveWorker, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_quick_add(),
        KeyCode::Tab => {
            if let Some(ref mut form) = app.quick_add {
                form.cycle_focus();
            }
        }
        KeyCode::Up | KeyCode::Down => {
            let count = app.links.sections.len();
            if let Some(ref mut form) = app.quick_add {
                if form.focus == ingest::QuickAddField::Target {
                    form.cycle_target(count);
                }
            }
        }
        KeyCode::Enter => {
            // A blank name, URL, or new-section title keeps the overlay
            // open; a valid confirmation saves in the background.
            if let Some(request) = app.confirm_quick_add() {
                worker.submit(request);
            }
        }
        KeyCode::Char(c) => {
            if let Some(ref mut form) = app.quick_add {
                if let Some(input) = form.focused_input_mut() {
                    input.push(c);
                }
            }
        }
        KeyCode::Backspace => {
            if let Some(ref mut form) = app.quick_add {
                if let Some(input) = form.focused_input_mut() {
                    input.pop();
                }
            }
        }
        _ => {}
    }
}

fn handle_display_key(app: &mut AppState, key: event::KeyEvent) -> bool {
    if app.search_active {
        match key.code {
            KeyCode::Char(c) => app.search_push(c),
            KeyCode::Backspace => app.search_pop(),
            KeyCode::Esc => app.clear_search(),
            KeyCode::Enter => app.search_active = false,
            _ => {}
        }
        return true;
    }

    let columns = isize::try_from(app.settings.effective_columns()).unwrap_or(1);
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Char('/') => {
            app.search_active = true;
            app.message = None;
        }
        KeyCode::Char('e') => app.enter_edit_mode(),
        KeyCode::Char('n') => app.enter_notes(),
        KeyCode::Char('s') => {
            if let Some(url) = app.badge.url().map(ToString::to_string) {
                open_url(app, &url);
            }
        }
        KeyCode::Char(':') => open_command(app, View::Display),
        KeyCode::Up => app.select_by(-columns),
        KeyCode::Down => app.select_by(columns),
        KeyCode::Left => app.select_by(-1),
        KeyCode::Right => app.select_by(1),
        KeyCode::Enter => {
            if let Some(url) = app.selected_target().map(|link| link.url.clone()) {
                open_url(app, &url);
            }
        }
        _ => {}
    }
    true
}

fn handle_edit_key(app: &mut AppState, key: event::KeyEvent) {
    let ctrl = key.modifiers.contains(event::KeyModifiers::CONTROL);

    let Some(ref mut draft) = app.draft else {
        return;
    };

    if draft.editing {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => draft.editing = false,
            KeyCode::Tab => draft.toggle_field(),
            KeyCode::Char(c) => draft.push_char(c),
            KeyCode::Backspace => draft.pop_char(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Up => {
            if ctrl {
                // Ctrl+Up: arm the row, then move it.
                if draft.move_state == MoveState::None {
                    draft.start_move();
                } else {
                    draft.move_row_up();
                }
            } else {
                draft.select_prev();
            }
        }
        KeyCode::Down => {
            if ctrl {
                if draft.move_state == MoveState::None {
                    draft.start_move();
                } else {
                    draft.move_row_down();
                }
            } else {
                draft.select_next();
            }
        }
        KeyCode::Tab => draft.toggle_field(),
        KeyCode::Enter => draft.editing = true,
        KeyCode::Char('a') => draft.add_link(),
        KeyCode::Char('A') => draft.add_section(),
        KeyCode::Char('d') => draft.remove_row(),
        KeyCode::Esc => {
            if draft.move_state != MoveState::None {
                draft.cancel_move();
            }
        }
        KeyCode::Char(':') => open_command(app, View::Edit),
        _ => {}
    }
}

fn handle_command_key(app: &mut AppState, worker: &SaveWorker, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => app.command_buffer.push(c),
        KeyCode::Backspace => {
            app.command_buffer.pop();
        }
        KeyCode::Esc => {
            app.view = app.command_return;
            app.command_buffer.clear();
        }
        KeyCode::Enter => {
            let cmd = app.command_buffer.clone();
            app.command_buffer.clear();
            app.view = app.command_return;
            return execute_command(app, worker, cmd.trim());
        }
        _ => {}
    }
    true
}

fn execute_command(app: &mut AppState, worker: &SaveWorker, cmd: &str) -> bool {
    match app.command_return {
        View::Edit => match cmd {
            "w" => {
                if let Some(request) = app.begin_commit() {
                    worker.submit(request);
                }
            }
            "q" => app.discard_edit(),
            _ => app.message = Some(format!("Unknown command: {cmd}")),
        },
        View::Notes => match cmd {
            "w" => worker.submit(app.save_notes()),
            "x" => {
                worker.submit(app.save_notes());
                app.exit_notes();
            }
            "q" => app.exit_notes(),
            _ => app.message = Some(format!("Unknown command: {cmd}")),
        },
        View::Display | View::Command => {
            if cmd == "q" {
                return false;
            }
            if let Some(rest) = cmd.strip_prefix("columns ") {
                match rest.trim().parse::<i64>() {
                    Ok(n) => worker.submit(app.set_columns(n)),
                    Err(_) => app.message = Some("Usage: columns <1-6>".to_string()),
                }
            } else if let Some(rest) = cmd.strip_prefix("title ") {
                worker.submit(app.set_title(rest.to_string()));
            } else if cmd == "newtab" {
                worker.submit(app.toggle_newtab());
            } else {
                app.message = Some(format!("Unknown command: {cmd}"));
            }
        }
    }
    true
}
