//! `shellgen generate`: build a request from flags, submit it, report the result.
//!
//! The request is assembled with the same group operations the wizard uses, so
//! a scripted run and an interactive run produce identical payloads.

use anyhow::{Context, Result};
use log::info;
use shellgen_core::backend::{Backend, GenerationResult};
use shellgen_core::catalog::{self, Catalog, FEATURE_GROUP_TITLE};
use shellgen_core::cli::parse_feature_spec;
use shellgen_core::config::Config;
use shellgen_core::download;
use shellgen_core::errors::SelectionError;
use shellgen_core::options::{OptionGroup, OptionKind};
use shellgen_core::request::GenerationRequest;
use shellgen_core::wizard;
use std::fmt::Write;
use std::path::Path;

pub struct GenerateArgs<'a> {
    pub shell: &'a str,
    /// `key` or `key=value`
    pub features: &'a [String],
    pub format: &'a str,
    pub options: &'a [String],
    pub client: &'a str,
}

/// Fetch the catalog and build a request that passes every step guard.
pub fn build_request(
    backend: &dyn Backend,
    args: &GenerateArgs,
) -> Result<(GenerationRequest, Catalog)> {
    let mut request = GenerationRequest::new();
    let mut catalog = Catalog {
        shells: backend.shell_technologies()?,
        ..Default::default()
    };

    catalog::shell_group(&catalog.shells).activate(args.shell, &mut request)?;

    catalog.features = backend
        .features(request.shell())
        .with_context(|| format!("Failed to fetch features of {}", request.shell()))?;
    let feature_groups = catalog::feature_groups(&catalog.features);
    for raw in args.features {
        apply_feature(&feature_groups, raw, &mut request)?;
    }

    let output_groups = catalog::output_groups(&catalog.features);
    for group in &output_groups {
        group.apply_mount_defaults(&mut request);
    }
    let [formats, options] = &output_groups[..] else {
        anyhow::bail!("Unexpected output group layout");
    };
    formats.activate(args.format, &mut request)?;
    for key in args.options {
        if !options.is_selected(key, &request) {
            options.activate(key, &mut request)?;
        }
    }

    catalog.clients = backend.client_technologies()?;
    catalog::client_group(&catalog.clients).activate(args.client, &mut request)?;

    wizard::ensure_submittable(&request)?;
    Ok((request, catalog))
}

fn apply_feature(
    groups: &[OptionGroup],
    raw: &str,
    request: &mut GenerationRequest,
) -> Result<(), SelectionError> {
    let (key, value) = parse_feature_spec(raw);
    let Some(group) = groups.iter().find(|g| g.option(&key).is_some()) else {
        return Err(SelectionError::UnknownOption {
            group: FEATURE_GROUP_TITLE.to_string(),
            key,
        });
    };
    let kind = group
        .option(&key)
        .map(|o| o.kind())
        .unwrap_or(OptionKind::Basic);

    match (kind, value) {
        (OptionKind::WithArgument, Some(value)) if !value.is_empty() => {
            group.set_argument(&key, &value, request)?;
        }
        (OptionKind::WithArgument, _) => return Err(SelectionError::MissingArgument(key)),
        (OptionKind::Basic, Some(_)) => return Err(SelectionError::UnexpectedArgument(key)),
        (OptionKind::Basic, None) => {
            // Repeating a flag must not toggle the feature back off.
            if !group.is_selected(&key, request) {
                group.activate(&key, request)?;
            }
        }
    }
    Ok(())
}

/// Human-readable summary of a successful generation.
pub fn render_result(result: &GenerationResult, dependencies: Option<&str>) -> Result<String> {
    let mut out = String::new();
    for (label, artifact) in [("Web shell", &result.shell), ("Client", &result.client)] {
        writeln!(out, "{}: {}", label, artifact.url)?;
        writeln!(
            out,
            "  Checksum ({}): {}",
            artifact.checksum.algorithm, artifact.checksum.value
        )?;
    }
    if let Some(url) = dependencies {
        writeln!(out, "Client dependencies: {}", url)?;
    }
    Ok(out)
}

pub fn run(
    backend: &dyn Backend,
    config: &Config,
    args: &GenerateArgs,
    download_dir: Option<&Path>,
) -> Result<String> {
    let (request, catalog) = build_request(backend, args)?;
    let result = backend
        .generate(&request)
        .context("An error has occurred while generating your web shell")?;
    info!("Generated {}", result.shell.url);

    let dependencies = catalog
        .dependency_path(request.client())
        .and_then(|path| catalog::resolve_backend_url(&config.api_base, path));
    let mut report = render_result(&result, dependencies.as_ref().map(|u| u.as_str()))?;

    if let Some(dir) = download_dir {
        let files = download::download_result(&result, dir, config.timeout_secs)?;
        for file in files {
            writeln!(
                report,
                "Saved {} ({} bytes, checksum verified)",
                file.path.display(),
                file.size
            )?;
        }
    }
    Ok(report)
}
