use super::super::app::App;
use shellgen_core::wizard::WizardStep;

pub(super) fn build_step_sidebar(app: &App) -> String {
    let mut lines = Vec::new();
    for step in WizardStep::all() {
        let marker = if *step == app.current_step {
            "▶"
        } else if is_step_before(*step, app.current_step) {
            "✓"
        } else {
            " "
        };
        lines.push(format!("{} {}", marker, step.title()));
    }
    lines.join("\n")
}

/// Check if step_a comes before step_b in the flow
pub(super) fn is_step_before(step_a: WizardStep, step_b: WizardStep) -> bool {
    let order = WizardStep::all();
    let pos_a = order.iter().position(|&s| s == step_a);
    let pos_b = order.iter().position(|&s| s == step_b);

    match (pos_a, pos_b) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}
