//! Shellgen core library.
//!
//! `shellgen-core` holds the generation request model, the option/toggle
//! semantics shared by every wizard screen, the backend client and the
//! configuration used by the TUI and CLI crates.

pub mod backend;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod download;
pub mod errors;
pub mod logging;
pub mod options;
pub mod request;
pub mod wizard;
