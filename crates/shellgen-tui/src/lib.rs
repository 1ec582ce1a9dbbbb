//! Shellgen TUI.
//!
//! Ratatui front-end for the generation wizard.

pub mod input;
pub mod links;
pub mod widgets;
pub mod wizard;
