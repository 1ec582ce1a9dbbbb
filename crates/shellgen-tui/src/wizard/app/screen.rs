use crate::input::InputField;
use shellgen_core::options::{OptionGroup, OptionItem};
use shellgen_core::request::GenerationRequest;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Position of an option row on the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef {
    pub group: usize,
    pub option: usize,
}

/// Option groups of the mounted step plus cursor and text-field state.
#[derive(Debug, Clone)]
pub struct Screen {
    groups: Vec<OptionGroup>,
    fields: HashMap<String, InputField>,
    rows: Vec<RowRef>,
    cursor: usize,
    pub load: LoadState,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            fields: HashMap::new(),
            rows: Vec::new(),
            cursor: 0,
            load: LoadState::Idle,
        }
    }
}

impl Screen {
    pub fn loading() -> Self {
        Self {
            load: LoadState::Loading,
            ..Self::default()
        }
    }

    pub fn failed() -> Self {
        Self {
            load: LoadState::Failed,
            ..Self::default()
        }
    }

    /// Ready screen; argument fields are prefilled from the request so going
    /// back to a step shows what was typed before.
    pub fn with_groups(groups: Vec<OptionGroup>, request: &GenerationRequest) -> Self {
        let mut fields = HashMap::new();
        let mut rows = Vec::new();
        for (g, group) in groups.iter().enumerate() {
            for (o, option) in group.options().iter().enumerate() {
                rows.push(RowRef {
                    group: g,
                    option: o,
                });
                if let Some(ref slot) = option.argument {
                    let value = group
                        .argument_value(&option.key, request)
                        .unwrap_or_default()
                        .to_string();
                    fields.insert(option.key.clone(), InputField::new(value, &slot.placeholder));
                }
            }
        }
        Self {
            groups,
            fields,
            rows,
            cursor: 0,
            load: LoadState::Ready,
        }
    }

    pub fn groups(&self) -> &[OptionGroup] {
        &self.groups
    }

    pub fn rows(&self) -> &[RowRef] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn focused(&self) -> Option<(&OptionGroup, &OptionItem)> {
        let row = self.rows.get(self.cursor)?;
        let group = self.groups.get(row.group)?;
        Some((group, group.options().get(row.option)?))
    }

    pub fn is_focused(&self, row: RowRef) -> bool {
        self.rows.get(self.cursor) == Some(&row)
    }

    /// Move the cursor by `delta`, wrapping at both ends.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let next = (self.cursor as isize + delta).rem_euclid(len as isize);
        self.cursor = next as usize;
    }

    pub fn field(&self, key: &str) -> Option<&InputField> {
        self.fields.get(key)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut InputField> {
        self.fields.get_mut(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shellgen_core::options::{ArgumentSlot, GroupTarget};

    fn groups() -> Vec<OptionGroup> {
        vec![
            OptionGroup::new(
                "A",
                "",
                GroupTarget::Features,
                vec![OptionItem::basic("one", "One", "")],
            ),
            OptionGroup::new(
                "B",
                "",
                GroupTarget::Features,
                vec![OptionItem::with_argument(
                    "ip-validation",
                    "IP Validation",
                    "",
                    ArgumentSlot {
                        name: "IP_WHITELIST".to_string(),
                        label: "Allowed IPs".to_string(),
                        placeholder: "10.128.20.1, ::1".to_string(),
                    },
                )],
            ),
        ]
    }

    #[test]
    fn rows_span_groups_and_cursor_wraps() {
        let mut screen = Screen::with_groups(groups(), &GenerationRequest::new());
        assert_eq!(screen.rows().len(), 2);
        assert_eq!(screen.focused().map(|(_, o)| o.key.as_str()), Some("one"));
        screen.move_cursor(1);
        assert_eq!(
            screen.focused().map(|(g, _)| g.title()),
            Some("B")
        );
        screen.move_cursor(1);
        assert_eq!(screen.cursor(), 0);
        screen.move_cursor(-1);
        assert_eq!(screen.cursor(), 1);
    }

    #[test]
    fn fields_are_prefilled_from_the_request() {
        let mut request = GenerationRequest::new();
        request.set_feature_argument("ip-validation", "IP_WHITELIST", "::1");
        let screen = Screen::with_groups(groups(), &request);
        assert_eq!(screen.field("ip-validation").map(|f| f.value()), Some("::1"));
        assert!(screen.field("one").is_none());
    }

    #[test]
    fn empty_screen_ignores_cursor_moves() {
        let mut screen = Screen::failed();
        screen.move_cursor(3);
        assert_eq!(screen.cursor(), 0);
        assert!(screen.focused().is_none());
    }
}
