use super::super::app::App;
use super::content::{build_info_panel, build_step_lines, expected_actions, status_message};

pub fn dump_step(app: &App) -> String {
    let lines = build_step_lines(app);
    let header = "Web Shell Generator";
    let hint = lines
        .first()
        .cloned()
        .unwrap_or_else(|| "🧭 Step: (unknown)".to_string());
    let body_lines = if lines.len() > 1 {
        lines[1..].join("\n")
    } else {
        "(no body content)".to_string()
    };

    format!(
        "STEP: {}\n\n- Header: {}\n- Hint line: {}\n- Body contents:\n{}\n- Info panel:\n{}\n- Status: {}\n- Expected user actions (keys): {}\n",
        app.current_step.title(),
        header,
        hint,
        body_lines,
        build_info_panel(app),
        status_message(app),
        expected_actions(app)
    )
}
