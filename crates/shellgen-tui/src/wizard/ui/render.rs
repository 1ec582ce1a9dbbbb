use super::content::{build_info_panel, build_step_lines, expected_actions, status_message};
use super::sidebar::build_step_sidebar;
use super::super::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    // Main layout: Title | Main Body | Key Legend
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3), // Title bar
                Constraint::Min(10),   // Main body (3-panel)
                Constraint::Length(4), // Status + key legend
            ]
            .as_ref(),
        )
        .split(f.area());

    let title_line = Line::from(vec![
        Span::styled("Web Shell Generator", Style::default().fg(Color::White)),
        Span::raw(" | "),
        Span::styled(app.route(), Style::default().fg(Color::Cyan)),
        Span::raw(" | "),
        Span::styled(app.api_base().to_string(), Style::default().fg(Color::DarkGray)),
    ]);
    let title = Block::default().borders(Borders::ALL).title(title_line);
    f.render_widget(title, main_chunks[0]);

    // Three-panel layout: Sidebar | Content | Info Panel
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(20), // Left: Step sidebar
                Constraint::Percentage(55), // Center: Main content
                Constraint::Percentage(25), // Right: Info panel
            ]
            .as_ref(),
        )
        .split(main_chunks[1]);

    let sidebar = Paragraph::new(build_step_sidebar(app))
        .block(Block::default().borders(Borders::ALL).title("Steps"));
    f.render_widget(sidebar, body_chunks[0]);

    let list_items = build_step_lines(app)
        .into_iter()
        .map(ListItem::new)
        .collect::<Vec<_>>();
    let content = List::new(list_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(app.current_step.title()),
    );
    f.render_widget(content, body_chunks[1]);

    let info_panel = Paragraph::new(build_info_panel(app))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Info"));
    f.render_widget(info_panel, body_chunks[2]);

    // Key legend (always visible, context-specific)
    let legend_text = format!("{}\n{}", status_message(app), expected_actions(app));
    let legend =
        Paragraph::new(legend_text).block(Block::default().borders(Borders::ALL).title("Keys"));
    f.render_widget(legend, main_chunks[2]);
}
