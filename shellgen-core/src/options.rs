//! Option groups and their selection semantics.
//!
//! Every wizard screen renders one or more `OptionGroup`s. A group knows which
//! part of the `GenerationRequest` it writes to and whether its members are
//! mutually exclusive. Selection state is never stored on the option itself: it
//! is derived from the request on demand via [`OptionGroup::is_selected`].

use crate::errors::SelectionError;
use crate::request::{FeatureChange, GenerationRequest};
use log::{debug, warn};

/// Free-text argument accepted by an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSlot {
    /// Argument name sent to the backend (e.g. `IP_WHITELIST`).
    pub name: String,
    pub label: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Basic,
    WithArgument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub key: String,
    pub label: String,
    pub description: String,
    pub argument: Option<ArgumentSlot>,
}

impl OptionItem {
    pub fn basic(
        key: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: description.into(),
            argument: None,
        }
    }

    pub fn with_argument(
        key: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        argument: ArgumentSlot,
    ) -> Self {
        Self {
            argument: Some(argument),
            ..Self::basic(key, label, description)
        }
    }

    pub fn kind(&self) -> OptionKind {
        if self.argument.is_some() {
            OptionKind::WithArgument
        } else {
            OptionKind::Basic
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Radio-like: at most one member selected.
    Exclusive,
    /// Checkbox-like: members toggle independently.
    Independent,
}

/// The part of the request a group writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTarget {
    Shell,
    Client,
    OutputFormat,
    Features,
    OutputOptions,
}

impl GroupTarget {
    pub fn discipline(&self) -> Discipline {
        match self {
            GroupTarget::Shell | GroupTarget::Client | GroupTarget::OutputFormat => {
                Discipline::Exclusive
            }
            GroupTarget::Features | GroupTarget::OutputOptions => Discipline::Independent,
        }
    }
}

/// Emitted once per activation or argument change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected { key: String },
    Updated { key: String },
    Deselected { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionGroup {
    title: String,
    description: String,
    target: GroupTarget,
    options: Vec<OptionItem>,
}

impl OptionGroup {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        target: GroupTarget,
        options: Vec<OptionItem>,
    ) -> Self {
        let title = title.into();
        let options = options
            .into_iter()
            .map(|mut option| {
                // Only features carry arguments on the wire.
                if target != GroupTarget::Features && option.argument.is_some() {
                    warn!(
                        "Dropping argument slot of `{}` in group `{}`",
                        option.key, title
                    );
                    option.argument = None;
                }
                option
            })
            .collect();
        Self {
            title,
            description: description.into(),
            target,
            options,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn target(&self) -> GroupTarget {
        self.target
    }

    pub fn discipline(&self) -> Discipline {
        self.target.discipline()
    }

    pub fn options(&self) -> &[OptionItem] {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&OptionItem> {
        self.options.iter().find(|o| o.key == key)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Derived selection state of `key` for the current request.
    pub fn is_selected(&self, key: &str, request: &GenerationRequest) -> bool {
        if key.is_empty() {
            return false;
        }
        match self.target {
            GroupTarget::Shell => request.shell() == key,
            GroupTarget::Client => request.client() == key,
            GroupTarget::OutputFormat => request.output_format() == key,
            GroupTarget::Features => request.has_feature(key),
            GroupTarget::OutputOptions => request.output_option(key) == Some(true),
        }
    }

    /// Keys of every selected member, in display order.
    pub fn selected_keys(&self, request: &GenerationRequest) -> Vec<&str> {
        self.options
            .iter()
            .filter(|o| self.is_selected(&o.key, request))
            .map(|o| o.key.as_str())
            .collect()
    }

    /// Current argument text of an argument-bearing option.
    pub fn argument_value<'r>(&self, key: &str, request: &'r GenerationRequest) -> Option<&'r str> {
        let slot = self.option(key)?.argument.as_ref()?;
        request.feature(key)?.argument_value(&slot.name)
    }

    /// Click semantics: toggle `key` and write the result into `request`.
    ///
    /// Argument-bearing options are driven by their input value instead and
    /// return `Ok(None)` here.
    pub fn activate(
        &self,
        key: &str,
        request: &mut GenerationRequest,
    ) -> Result<Option<SelectionEvent>, SelectionError> {
        let option = self.lookup(key)?;
        if option.kind() == OptionKind::WithArgument {
            return Ok(None);
        }

        let was_selected = self.is_selected(key, request);
        let key_owned = key.to_string();
        match self.target {
            GroupTarget::Shell => request.set_shell(if was_selected { "" } else { key }),
            GroupTarget::Client => request.set_client(if was_selected { "" } else { key }),
            GroupTarget::OutputFormat => {
                request.set_output_format(if was_selected { "" } else { key })
            }
            GroupTarget::Features => {
                if was_selected {
                    request.remove_feature(key);
                } else {
                    request.select_feature(key);
                }
            }
            GroupTarget::OutputOptions => {
                request.set_output_option(key, !was_selected);
            }
        }

        let event = if was_selected {
            SelectionEvent::Deselected { key: key_owned }
        } else {
            SelectionEvent::Selected { key: key_owned }
        };
        debug!("{}: {:?}", self.title, event);
        Ok(Some(event))
    }

    /// Input semantics for argument-bearing options: non-empty inserts or
    /// updates, empty removes.
    pub fn set_argument(
        &self,
        key: &str,
        value: &str,
        request: &mut GenerationRequest,
    ) -> Result<Option<SelectionEvent>, SelectionError> {
        let option = self.lookup(key)?;
        let slot = option
            .argument
            .as_ref()
            .ok_or_else(|| SelectionError::UnexpectedArgument(key.to_string()))?;

        let key_owned = key.to_string();
        let event = if value.is_empty() {
            request
                .remove_feature(key)
                .then_some(SelectionEvent::Deselected { key: key_owned })
        } else {
            match request.set_feature_argument(key, &slot.name, value) {
                FeatureChange::Inserted => Some(SelectionEvent::Selected { key: key_owned }),
                FeatureChange::Updated => Some(SelectionEvent::Updated { key: key_owned }),
            }
        };
        if let Some(ref event) = event {
            debug!("{}: {:?}", self.title, event);
        }
        Ok(event)
    }

    /// State written when the group's screen is entered: every output option
    /// starts explicitly disabled. Other targets are left untouched.
    pub fn apply_mount_defaults(&self, request: &mut GenerationRequest) {
        if self.target == GroupTarget::OutputOptions {
            for option in &self.options {
                request.set_output_option(&option.key, false);
            }
        }
    }

    fn lookup(&self, key: &str) -> Result<&OptionItem, SelectionError> {
        self.option(key).ok_or_else(|| SelectionError::UnknownOption {
            group: self.title.clone(),
            key: key.to_string(),
        })
    }
}
