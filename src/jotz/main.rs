use clap::Parser;
use crossbeam_channel::{select, unbounded, Receiver};
use directories::ProjectDirs;
use jotz::api::{NotesApi, UiMessage};
use jotz::config::JotzConfig;
use jotz::error::{JotzError, Result};
use jotz::model::Note;
use jotz::store::fs::FileStore;
use jotz::store::DocumentStore;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod args;
mod cli;

use args::Cli;
use cli::render;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.plain {
        colored::control::set_override(false);
    }

    let data_dir = resolve_data_dir(&cli)?;
    let config = JotzConfig::load(&data_dir).unwrap_or_default();
    let debounce = Duration::from_millis(cli.debounce_ms.unwrap_or(config.debounce_ms));

    let store = FileStore::new(data_dir).with_file_ext(config.get_file_ext());
    let mut api = NotesApi::new(store, debounce);

    let (snap_tx, snap_rx) = unbounded();
    let subscription = api.subscribe(snap_tx)?;

    let input_rx = spawn_stdin_reader();
    let result = event_loop(&mut api, &snap_rx, &input_rx);

    // Release the live listener before the store goes away
    api.unsubscribe(subscription);
    result
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Ok(dir) = std::env::var("JOTZ_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let proj_dirs = ProjectDirs::from("com", "jotz", "jotz")
        .ok_or_else(|| JotzError::Store("Could not determine data directory".to_string()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

/// Drain stdin on a reader thread; the event loop stays single-threaded
/// and sees input as just another channel.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

enum Event {
    Snapshot(Vec<Note>),
    Input(String),
    Tick,
    Closed,
}

/// The cooperative loop: one event at a time, so a snapshot is always
/// fully applied before the next input or timer callback runs.
fn event_loop<S: DocumentStore>(
    api: &mut NotesApi<S>,
    snapshots: &Receiver<Vec<Note>>,
    input: &Receiver<String>,
) -> Result<()> {
    loop {
        api.flush_due(Instant::now());

        print!("{}", render::render_screen(api.session(), api.buffer()));
        render::print_messages(&api.take_messages());

        match next_event(api.sync_deadline(), snapshots, input) {
            Event::Snapshot(notes) => api.apply_snapshot(notes),
            Event::Input(line) => {
                if !dispatch(api, &line) {
                    break;
                }
            }
            Event::Tick => {}
            Event::Closed => break,
        }
    }
    Ok(())
}

fn next_event(
    deadline: Option<Instant>,
    snapshots: &Receiver<Vec<Note>>,
    input: &Receiver<String>,
) -> Event {
    // Pending snapshots are applied before any queued input or timer
    // callback; select! alone would pick among ready channels at random
    if let Ok(notes) = snapshots.try_recv() {
        return Event::Snapshot(notes);
    }

    match deadline {
        Some(deadline) => {
            let timeout = deadline.saturating_duration_since(Instant::now());
            select! {
                recv(snapshots) -> msg => msg.map(Event::Snapshot).unwrap_or(Event::Closed),
                recv(input) -> msg => msg.map(Event::Input).unwrap_or(Event::Closed),
                default(timeout) => Event::Tick,
            }
        }
        None => select! {
            recv(snapshots) -> msg => msg.map(Event::Snapshot).unwrap_or(Event::Closed),
            recv(input) -> msg => msg.map(Event::Input).unwrap_or(Event::Closed),
        },
    }
}

/// Interpret one input line. `:`-prefixed lines are commands; everything
/// else is editor input appended to the buffer. Returns false to quit.
fn dispatch<S: DocumentStore>(api: &mut NotesApi<S>, line: &str) -> bool {
    let now = Instant::now();

    if let Some(rest) = line.strip_prefix(':') {
        let mut parts = rest.split_whitespace();
        match parts.next() {
            Some("new") | Some("n") => api.create_note(),
            Some("open") | Some("o") => match parse_pos(parts.next()) {
                Some(pos) => api.select_note(pos),
                None => api.push_message(UiMessage::warning("Usage: :open N")),
            },
            Some("rm") => match parse_pos(parts.next()) {
                Some(pos) => api.delete_note(pos),
                None => api.push_message(UiMessage::warning("Usage: :rm N")),
            },
            Some("clear") => api.edit(String::new(), now),
            Some("quit") | Some("q") => return false,
            _ => api.push_message(UiMessage::warning(format!("Unknown command: :{}", rest))),
        }
    } else {
        let mut buffer = api.buffer().to_string();
        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(line);
        api.edit(buffer, now);
    }

    true
}

fn parse_pos(arg: Option<&str>) -> Option<usize> {
    arg.and_then(|s| s.parse().ok()).filter(|&pos| pos > 0)
}
