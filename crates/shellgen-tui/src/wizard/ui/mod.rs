//! Text rendering of the wizard screens

mod content;
mod dump;
mod render;
mod sidebar;

pub use dump::dump_step;
pub use render::draw;
