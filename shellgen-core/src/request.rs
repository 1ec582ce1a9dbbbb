//! The generation request accumulated across wizard steps.
//!
//! A single `GenerationRequest` lives for the whole wizard session. Screens only
//! touch it through the named mutations below so the invariants hold everywhere:
//! - `features` never holds two entries with the same key
//! - `output` is `format` (string) plus one boolean per output option key

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved key of the output mapping that carries the chosen format.
pub const OUTPUT_FORMAT_KEY: &str = "format";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureArgument {
    pub name: String,
    pub value: String,
}

/// One selected feature, optionally carrying its argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFeature {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<FeatureArgument>>,
}

impl SelectedFeature {
    pub fn basic(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            arguments: None,
        }
    }

    pub fn with_argument(
        key: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            arguments: Some(vec![FeatureArgument {
                name: name.into(),
                value: value.into(),
            }]),
        }
    }

    pub fn argument_value(&self, name: &str) -> Option<&str> {
        self.arguments
            .as_ref()?
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| arg.value.as_str())
    }
}

/// Whether an argument write created the feature entry or replaced its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureChange {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    format: String,
    #[serde(flatten)]
    options: BTreeMap<String, bool>,
}

impl OutputSettings {
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn option(&self, key: &str) -> Option<bool> {
        self.options.get(key).copied()
    }

    pub fn options(&self) -> &BTreeMap<String, bool> {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    shell: String,
    client: String,
    features: Vec<SelectedFeature>,
    output: OutputSettings,
}

impl GenerationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn features(&self) -> &[SelectedFeature] {
        &self.features
    }

    pub fn feature(&self, key: &str) -> Option<&SelectedFeature> {
        self.features.iter().find(|f| f.key == key)
    }

    pub fn has_feature(&self, key: &str) -> bool {
        self.feature(key).is_some()
    }

    pub fn output(&self) -> &OutputSettings {
        &self.output
    }

    pub fn output_format(&self) -> &str {
        &self.output.format
    }

    pub fn output_option(&self, key: &str) -> Option<bool> {
        self.output.option(key)
    }

    /// Features and output come from the chosen shell's catalog, so picking
    /// a different shell drops them.
    pub fn set_shell(&mut self, technology: impl Into<String>) {
        let technology = technology.into();
        if technology != self.shell {
            self.clear_shell_dependent();
        }
        self.shell = technology;
    }

    /// Drop every feature and output setting, keeping shell and client.
    pub fn clear_shell_dependent(&mut self) {
        self.features.clear();
        self.output = OutputSettings::default();
    }

    pub fn set_client(&mut self, technology: impl Into<String>) {
        self.client = technology.into();
    }

    pub fn set_output_format(&mut self, format: impl Into<String>) {
        self.output.format = format.into();
    }

    /// Set a boolean output option. The reserved `format` key is refused.
    pub fn set_output_option(&mut self, key: &str, enabled: bool) -> bool {
        if key == OUTPUT_FORMAT_KEY {
            warn!("Ignoring output option named `{}` (reserved key)", key);
            return false;
        }
        self.output.options.insert(key.to_string(), enabled);
        true
    }

    /// Select a feature without arguments. An existing entry for the key is
    /// replaced in place.
    pub fn select_feature(&mut self, key: &str) {
        self.upsert_feature(SelectedFeature::basic(key));
    }

    /// Insert or update an argument-bearing feature.
    pub fn set_feature_argument(&mut self, key: &str, name: &str, value: &str) -> FeatureChange {
        self.upsert_feature(SelectedFeature::with_argument(key, name, value))
    }

    /// Remove the entry for `key`. Returns whether anything was removed.
    pub fn remove_feature(&mut self, key: &str) -> bool {
        let before = self.features.len();
        self.features.retain(|f| f.key != key);
        before != self.features.len()
    }

    /// Back to `{ shell: "", client: "", features: [], output: { format: "" } }`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    fn upsert_feature(&mut self, feature: SelectedFeature) -> FeatureChange {
        match self.features.iter_mut().find(|f| f.key == feature.key) {
            Some(existing) => {
                *existing = feature;
                FeatureChange::Updated
            }
            None => {
                self.features.push(feature);
                FeatureChange::Inserted
            }
        }
    }
}
