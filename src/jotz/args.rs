use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jotz")]
#[command(about = "A live-syncing markdown notes client for the terminal", long_about = None)]
pub struct Cli {
    /// Directory holding the note store (defaults to the platform data dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Idle time before a buffered edit is written back, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Disable colored output (for scripted sessions)
    #[arg(long)]
    pub plain: bool,
}
