//! `shellgen list`: print what the generation service offers.

use anyhow::Result;
use log::warn;
use shellgen_core::backend::Backend;
use shellgen_core::catalog::{self, FeatureType, CLIENT_GROUP_TITLE, SHELL_GROUP_TITLE};
use shellgen_core::cli::ListTarget;
use shellgen_core::options::OptionGroup;
use std::fmt::Write;

pub fn run(backend: &dyn Backend, target: &ListTarget) -> Result<String> {
    let mut out = String::new();
    match target {
        ListTarget::Shells => {
            writeln!(out, "{}:", SHELL_GROUP_TITLE)?;
            for shell in backend.shell_technologies()? {
                writeln!(out, "  {}", shell.technology)?;
            }
        }
        ListTarget::Clients => {
            writeln!(out, "{}:", CLIENT_GROUP_TITLE)?;
            for client in backend.client_technologies()? {
                match client.dependencies {
                    Some(ref path) => {
                        writeln!(out, "  {} (dependencies: {})", client.technology, path)?
                    }
                    None => writeln!(out, "  {}", client.technology)?,
                }
            }
        }
        ListTarget::Features { technology } => {
            let features = backend.features(technology)?;
            for feature in &features {
                if let FeatureType::Unknown(ref raw) = feature.kind {
                    warn!("Ignoring `{}` with unknown type `{}`", feature.key, raw);
                }
            }
            let groups = catalog::feature_groups(&features)
                .into_iter()
                .chain(catalog::output_groups(&features));
            for group in groups {
                write_group(&mut out, &group)?;
            }
        }
    }
    Ok(out)
}

fn write_group(out: &mut String, group: &OptionGroup) -> Result<()> {
    writeln!(out, "{}:", group.title())?;
    if group.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for option in group.options() {
        let key = match option.argument {
            Some(ref slot) => format!("{}=<{}>", option.key, slot.name),
            None => option.key.clone(),
        };
        if option.description.is_empty() {
            writeln!(out, "  {:<28} {}", key, option.label)?;
        } else {
            writeln!(
                out,
                "  {:<28} {}: {}",
                key, option.label, option.description
            )?;
        }
    }
    Ok(())
}
