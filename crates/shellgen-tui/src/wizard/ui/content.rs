use super::super::app::{App, LoadState, ResultState, RowRef};
use crate::widgets::{cursor_marker, Marker};
use shellgen_core::options::OptionKind;
use shellgen_core::wizard::WizardStep;

pub(super) const NO_OPTIONS_HINT: &str = "No options available.";
pub(super) const GENERATION_FAILED: &str =
    "❌ An error has occurred while generating your web shell.";

pub(super) fn build_step_lines(app: &App) -> Vec<String> {
    let mut items = Vec::new();
    items.push(format!("🧭 Step: {}", app.current_step.title()));
    items.push(format!("Route: {}", app.route()));
    items.push("".to_string());

    match app.current_step {
        WizardStep::Home => {
            items.push("👋 Welcome to the Web Shell Generator!".to_string());
            items.push("".to_string());
            items.push("Pick a shell technology, its features and protections,".to_string());
            items.push("an output format and a client, then generate.".to_string());
            items.push("".to_string());
            items.push("⌨️ Keys:".to_string());
            items.push("  ↑/↓ or j/k — Move selection up/down".to_string());
            items.push("  Space — Select/toggle current item".to_string());
            items.push("  Enter — Continue".to_string());
            items.push("  Esc — Go back (quits here)".to_string());
        }
        WizardStep::Result => push_result(&mut items, app),
        _ => push_groups(&mut items, app),
    }
    items
}

fn push_groups(items: &mut Vec<String>, app: &App) {
    let screen = &app.screen;
    match screen.load {
        LoadState::Loading => {
            items.push("⏳ Loading options...".to_string());
            return;
        }
        LoadState::Failed | LoadState::Idle => {
            items.push(NO_OPTIONS_HINT.to_string());
            return;
        }
        LoadState::Ready if screen.is_empty() => {
            items.push(NO_OPTIONS_HINT.to_string());
            return;
        }
        LoadState::Ready => {}
    }

    let request = app.request();
    for (g, group) in screen.groups().iter().enumerate() {
        if group.is_empty() {
            continue;
        }
        items.push(format!("── {} ──", group.title()));
        if !group.description().is_empty() {
            items.push(group.description().to_string());
        }
        for (o, option) in group.options().iter().enumerate() {
            let focused = screen.is_focused(RowRef {
                group: g,
                option: o,
            });
            let marker = Marker::for_option(
                group.discipline(),
                group.is_selected(&option.key, request),
            );
            let mut line = format!(
                "{} {} {}",
                cursor_marker(focused),
                marker.symbol(),
                option.label
            );
            if option.kind() == OptionKind::WithArgument {
                if let (Some(slot), Some(field)) = (&option.argument, screen.field(&option.key)) {
                    line.push_str(&format!(" | {}: {}", slot.label, field.display(focused)));
                }
            }
            items.push(line);
        }
        items.push("".to_string());
    }
}

fn push_result(items: &mut Vec<String>, app: &App) {
    match app.result() {
        ResultState::Pending => {
            items.push("⏳ Generating your web shell...".to_string());
        }
        ResultState::Failed => {
            items.push(GENERATION_FAILED.to_string());
            items.push("".to_string());
            items.push("Press Enter to start over.".to_string());
        }
        ResultState::Success { result, .. } => {
            items.push("✅ Your web shell has been generated.".to_string());
            items.push("".to_string());
            let checksums = [&result.shell.checksum, &result.client.checksum];
            for (i, link) in app.result_links().iter().enumerate() {
                items.push(format!(
                    "{} 🔗 {}: {}",
                    cursor_marker(i == app.link_index()),
                    link.label,
                    link.url
                ));
                if let Some(checksum) = checksums.get(i) {
                    items.push(format!(
                        "    Checksum ({}): {}",
                        checksum.algorithm, checksum.value
                    ));
                }
            }
            if !app.downloads().is_empty() {
                items.push("".to_string());
                for file in app.downloads() {
                    items.push(format!(
                        "💾 Saved {} ({} bytes)",
                        file.path.display(),
                        file.size
                    ));
                }
            }
            items.push("".to_string());
            items.push("Press Enter to start over.".to_string());
        }
    }
}

pub(super) fn build_info_panel(app: &App) -> String {
    let request = app.request();
    let mut lines = Vec::new();
    lines.push("Selections:".to_string());
    lines.push(format!("Shell: {}", or_none(request.shell())));

    if request.features().is_empty() {
        lines.push("Features: (none)".to_string());
    } else {
        lines.push("Features:".to_string());
        for feature in request.features() {
            match feature.arguments {
                Some(ref arguments) => {
                    let values: Vec<String> = arguments
                        .iter()
                        .map(|a| format!("{}={}", a.name, a.value))
                        .collect();
                    lines.push(format!("  {} ({})", feature.key, values.join(", ")));
                }
                None => lines.push(format!("  {}", feature.key)),
            }
        }
    }

    lines.push(format!("Output: {}", or_none(request.output_format())));
    let enabled: Vec<&str> = request
        .output()
        .options()
        .iter()
        .filter(|(_, on)| **on)
        .map(|(key, _)| key.as_str())
        .collect();
    if !enabled.is_empty() {
        lines.push(format!("  + {}", enabled.join(", ")));
    }
    lines.push(format!("Client: {}", or_none(request.client())));

    if let Some((_, option)) = app.screen.focused() {
        if app.current_step != WizardStep::Result && !option.description.is_empty() {
            lines.push("".to_string());
            lines.push(format!("{}:", option.label));
            lines.push(option.description.clone());
        }
    }

    lines.push("".to_string());
    lines.push(format!("API: {}", app.api_base()));
    lines.join("\n")
}

fn or_none(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}

pub(super) fn expected_actions(app: &App) -> &'static str {
    match app.current_step {
        WizardStep::Home => "Enter: Start | Esc/q: Quit",
        WizardStep::Result => "↑/↓: Pick link | o: Open | d: Download | Enter/r: Start over | q: Quit",
        _ => {
            let on_text_row = app
                .screen
                .focused()
                .map(|(_, option)| option.kind() == OptionKind::WithArgument)
                .unwrap_or(false);
            if on_text_row {
                "↑/↓: Move | Type: Edit value | Ctrl-U: Clear | Enter: Continue | Esc: Back"
            } else {
                "↑/↓ or j/k: Move | Space: Select/toggle | Enter: Continue | Esc: Back | q: Quit"
            }
        }
    }
}

pub(super) fn status_message(app: &App) -> String {
    if app.status_message.is_empty() {
        "Ready.".to_string()
    } else {
        app.status_message.clone()
    }
}
