use env_logger::Target;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default log file used while the TUI owns the terminal.
pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("shellgen.log")
}

/// Initialise logging for CLI commands (stderr).
pub fn init() {
    init_target(Target::Stderr);
}

/// Initialise logging into `log_file`.
///
/// The TUI draws on stdout, so log lines must not reach the terminal. If the file
/// cannot be opened we fall back to stderr rather than running without logs.
pub fn init_with(log_file: Option<PathBuf>) {
    let path = log_file.unwrap_or_else(default_log_file);
    let target = open_log_file(&path)
        .map(|file| Target::Pipe(Box::new(file)))
        .unwrap_or(Target::Stderr);
    init_target(target);
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

fn init_target(target: Target) {
    // Respect RUST_LOG if set, otherwise default to info. `try_init` keeps a
    // second call (tests, --dump-tui after a failed start) from panicking.
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(target)
        .try_init();
}
