//! Backend catalog payloads and the option groups built from them.

use crate::options::{ArgumentSlot, GroupTarget, OptionGroup, OptionItem};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub const SHELL_GROUP_TITLE: &str = "WebShell Technologies";
pub const CLIENT_GROUP_TITLE: &str = "Client Technologies";
pub const FEATURE_GROUP_TITLE: &str = "WebShell Features";
pub const SECURITY_GROUP_TITLE: &str = "Additional Protections";
pub const FORMAT_GROUP_TITLE: &str = "Output Formats";
pub const OUTPUT_OPTION_GROUP_TITLE: &str = "Additional Options";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellTechnology {
    pub technology: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTechnology {
    pub technology: String,
    /// Path of the dependency manifest for this client (e.g. `/client/python/requirements.txt`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<String>,
}

/// Category tag of a feature descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FeatureType {
    Feature,
    Security,
    OutputFormat,
    OutputOption,
    Unknown(String),
}

impl From<String> for FeatureType {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "feature" => FeatureType::Feature,
            "security" => FeatureType::Security,
            "output,format" | "output-format" => FeatureType::OutputFormat,
            "output,option" | "output-option" => FeatureType::OutputOption,
            _ => FeatureType::Unknown(raw),
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureType::Feature => write!(f, "feature"),
            FeatureType::Security => write!(f, "security"),
            FeatureType::OutputFormat => write!(f, "output,format"),
            FeatureType::OutputOption => write!(f, "output,option"),
            FeatureType::Unknown(raw) => write!(f, "{} (unknown)", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputDescriptor {
    pub key: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeatureDescriptor {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FeatureType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input: Option<InputDescriptor>,
}

impl FeatureDescriptor {
    pub fn to_option(&self) -> OptionItem {
        match self.input {
            Some(ref input) => OptionItem::with_argument(
                &self.key,
                &self.name,
                &self.description,
                ArgumentSlot {
                    name: input.key.clone(),
                    label: input.label.clone(),
                    placeholder: input.placeholder.clone(),
                },
            ),
            None => OptionItem::basic(&self.key, &self.name, &self.description),
        }
    }
}

/// Everything fetched from the backend so far in this session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub shells: Vec<ShellTechnology>,
    pub clients: Vec<ClientTechnology>,
    pub features: Vec<FeatureDescriptor>,
}

impl Catalog {
    pub fn dependency_path(&self, client: &str) -> Option<&str> {
        self.clients
            .iter()
            .find(|c| c.technology == client)
            .and_then(|c| c.dependencies.as_deref())
    }
}

pub fn shell_group(shells: &[ShellTechnology]) -> OptionGroup {
    OptionGroup::new(
        SHELL_GROUP_TITLE,
        "Language the generated web shell is written in.",
        GroupTarget::Shell,
        shells
            .iter()
            .map(|s| OptionItem::basic(&s.technology, &s.technology, ""))
            .collect(),
    )
}

pub fn client_group(clients: &[ClientTechnology]) -> OptionGroup {
    OptionGroup::new(
        CLIENT_GROUP_TITLE,
        "Language of the client used to talk to the shell.",
        GroupTarget::Client,
        clients
            .iter()
            .map(|c| OptionItem::basic(&c.technology, &c.technology, ""))
            .collect(),
    )
}

/// Feature screen groups: plain features first, then protections.
pub fn feature_groups(features: &[FeatureDescriptor]) -> Vec<OptionGroup> {
    vec![
        OptionGroup::new(
            FEATURE_GROUP_TITLE,
            "Capabilities built into the shell.",
            GroupTarget::Features,
            options_of(features, &FeatureType::Feature),
        ),
        OptionGroup::new(
            SECURITY_GROUP_TITLE,
            "Protections restricting who can use the shell.",
            GroupTarget::Features,
            options_of(features, &FeatureType::Security),
        ),
    ]
}

/// Output screen groups: the format choice, then boolean output options.
pub fn output_groups(features: &[FeatureDescriptor]) -> Vec<OptionGroup> {
    vec![
        OptionGroup::new(
            FORMAT_GROUP_TITLE,
            "File format of the generated shell.",
            GroupTarget::OutputFormat,
            options_of(features, &FeatureType::OutputFormat),
        ),
        OptionGroup::new(
            OUTPUT_OPTION_GROUP_TITLE,
            "Post-processing applied to the output.",
            GroupTarget::OutputOptions,
            options_of(features, &FeatureType::OutputOption),
        ),
    ]
}

fn options_of(features: &[FeatureDescriptor], kind: &FeatureType) -> Vec<OptionItem> {
    features
        .iter()
        .filter(|f| &f.kind == kind)
        .map(FeatureDescriptor::to_option)
        .collect()
}

/// Resolve a backend-relative path against the API base URL.
pub fn resolve_backend_url(base: &Url, path: &str) -> Option<Url> {
    match base.join(path.trim_start_matches('/')) {
        Ok(url) => Some(url),
        Err(err) => {
            warn!("Cannot resolve `{}` against {}: {}", path, base, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_features() -> Vec<FeatureDescriptor> {
        serde_json::from_value(json!([
            { "key": "command-execution", "name": "Command Execution", "type": "feature",
              "description": "Command execution capability." },
            { "key": "nonce-validation", "name": "Nonce Validation", "type": "security",
              "description": "Nonce validation protection." },
            { "key": "ip-validation", "name": "IP Validation", "type": "security",
              "description": "IP validation protection.",
              "input": { "key": "IP_WHITELIST", "type": "text",
                         "placeholder": "10.128.20.1, ::1", "label": "Allowed IPs" } },
            { "key": "jpg", "name": "JPG", "type": "output,format", "description": "JPG output format" },
            { "key": "obfuscate-code", "name": "Obfuscate code", "type": "output,option",
              "description": "Obfuscate the generated shell" },
            { "key": "typo", "name": "Typo", "type": "ouptut,option", "description": "" }
        ]))
        .unwrap()
    }

    #[test]
    fn feature_types_are_parsed() {
        let features = sample_features();
        assert_eq!(features[0].kind, FeatureType::Feature);
        assert_eq!(features[3].kind, FeatureType::OutputFormat);
        assert_eq!(features[4].kind, FeatureType::OutputOption);
        assert_eq!(
            features[5].kind,
            FeatureType::Unknown("ouptut,option".to_string())
        );
        assert_eq!(FeatureType::from("output-option".to_string()), FeatureType::OutputOption);
    }

    #[test]
    fn feature_groups_split_by_type() {
        let groups = feature_groups(&sample_features());
        assert_eq!(groups[0].title(), FEATURE_GROUP_TITLE);
        assert_eq!(groups[0].len(), 1);
        assert_eq!(groups[1].title(), SECURITY_GROUP_TITLE);
        assert_eq!(groups[1].len(), 2);

        let ip = groups[1].option("ip-validation").unwrap();
        let slot = ip.argument.as_ref().unwrap();
        assert_eq!(slot.name, "IP_WHITELIST");
        assert_eq!(slot.placeholder, "10.128.20.1, ::1");
    }

    #[test]
    fn output_groups_ignore_misspelled_tags() {
        let groups = output_groups(&sample_features());
        assert_eq!(groups[0].target(), GroupTarget::OutputFormat);
        assert_eq!(groups[1].options().len(), 1);
        assert_eq!(groups[1].options()[0].key, "obfuscate-code");
    }

    #[test]
    fn technology_groups_use_technology_as_key_and_label() {
        let shells: Vec<ShellTechnology> = serde_json::from_value(json!([
            { "technology": "php", "url": "/web-shell/php" },
            { "technology": "asp", "url": "/web-shell/asp" }
        ]))
        .unwrap();
        let group = shell_group(&shells);
        let labels: Vec<_> = group.options().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["php", "asp"]);
        assert_eq!(group.title(), SHELL_GROUP_TITLE);
    }

    #[test]
    fn dependency_urls_resolve_under_the_api_base() {
        let catalog = Catalog {
            clients: vec![
                ClientTechnology {
                    technology: "python".to_string(),
                    dependencies: Some("/client/python/requirements.txt".to_string()),
                },
                ClientTechnology {
                    technology: "ruby".to_string(),
                    dependencies: None,
                },
            ],
            ..Default::default()
        };
        let base = Url::parse("https://example.com/api/").unwrap();
        let path = catalog.dependency_path("python").unwrap();
        assert_eq!(
            resolve_backend_url(&base, path).unwrap().as_str(),
            "https://example.com/api/client/python/requirements.txt"
        );
        assert_eq!(catalog.dependency_path("ruby"), None);
    }
}
