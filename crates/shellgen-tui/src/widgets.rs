//! Small, reusable UI helpers used by multiple screens.

use shellgen_core::options::Discipline;

/// Selection marker drawn in front of an option row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Radio(bool),
    Checkbox(bool),
}

impl Marker {
    pub fn for_option(discipline: Discipline, selected: bool) -> Self {
        match discipline {
            Discipline::Exclusive => Marker::Radio(selected),
            Discipline::Independent => Marker::Checkbox(selected),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Marker::Radio(true) | Marker::Checkbox(true))
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Marker::Radio(false) => "( )",
            Marker::Radio(true) => "(•)",
            Marker::Checkbox(false) => "[ ]",
            Marker::Checkbox(true) => "[x]",
        }
    }
}

/// Cursor column: `▶` on the focused row.
pub fn cursor_marker(focused: bool) -> &'static str {
    if focused {
        "▶"
    } else {
        " "
    }
}
