//! Download links shown on the result screen.
//!
//! Links are never followed inside the TUI; they are handed to the platform
//! opener so the browser handles them.

use anyhow::{Context, Result};
use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLink {
    pub label: String,
    pub url: String,
}

impl ExternalLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

fn opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Open `url` with the system handler, detached from the terminal.
pub fn open_external(url: &str) -> Result<()> {
    let program = opener();
    log::info!("Opening {} with {}", url, program);
    Command::new(program)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to launch {}", program))?;
    Ok(())
}
