use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, Wrap,
    },
    Frame,
};

use crate::render::{LineKind, TreeLine};
use super::app::App;

pub fn ui(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = if app.show_preview {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(area)
    };

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    render_header(f, left_chunks[0]);
    render_tree(f, left_chunks[1], app);
    render_status_bar(f, left_chunks[2], app);

    if app.show_preview && chunks.len() > 1 {
        render_preview_panel(f, chunks[1], app);
    }

    if app.show_help {
        render_help_popup(f);
    }
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("Jellyfin Organizer - Proposed Changes (nothing changed yet)")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

fn line_style(line: &TreeLine) -> Style {
    match (line.kind, &line.target) {
        (LineKind::Show, _) => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        (LineKind::Note, _) => Style::default().fg(Color::Red),
        (LineKind::Folder, None) => Style::default().fg(Color::Gray),
        (LineKind::Folder, Some(_)) => Style::default().fg(Color::Yellow),
        (LineKind::File, _) => Style::default().fg(Color::White),
    }
}

fn render_tree(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .lines
        .iter()
        .map(|line| ListItem::new(Line::from(Span::styled(line.to_string(), line_style(line)))))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Plan")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.list_state.clone());

    if app.lines.len() > area.height.saturating_sub(2) as usize {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut app.scroll_state.clone(),
        );
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let (text, style) = match &app.status_message {
        Some(message) => (message.clone(), Style::default().fg(Color::Cyan)),
        None => (app.stats.summary(), Style::default().fg(Color::Green)),
    };
    let summary = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Summary"));
    f.render_widget(summary, chunks[0]);

    let controls = Paragraph::new("Enter write script, h help, q quit")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(controls, chunks[1]);
}

fn render_preview_panel(f: &mut Frame, area: Rect, app: &App) {
    let Some(line) = app.selected_line() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let source = line
        .source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| line.label.clone());
    let before = Paragraph::new(Text::from(vec![
        Line::from("Current:"),
        Line::from(Span::styled(source, Style::default().fg(Color::Red))),
    ]))
    .block(
        Block::default()
            .title("Before")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    )
    .wrap(Wrap { trim: true });
    f.render_widget(before, chunks[0]);

    let after_lines = match &line.destination {
        Some(destination) => vec![
            Line::from("New:"),
            Line::from(Span::styled(
                destination.display().to_string(),
                Style::default().fg(Color::Green),
            )),
        ],
        None => match &line.target {
            Some(target) => vec![
                Line::from("New:"),
                Line::from(Span::styled(target.clone(), Style::default().fg(Color::Green))),
            ],
            None => vec![Line::from(Span::styled(
                "No change",
                Style::default().fg(Color::Gray),
            ))],
        },
    };
    let after = Paragraph::new(Text::from(after_lines))
        .block(
            Block::default()
                .title("After")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(after, chunks[1]);
}

fn render_help_popup(f: &mut Frame) {
    let popup_area = centered_rect(60, 50, f.area());

    let help_text = vec![
        Line::from(Span::styled(
            "Jellyfin Organizer - Help",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  Up/k    - Move up"),
        Line::from("  Down/j  - Move down"),
        Line::from(""),
        Line::from("Actions:"),
        Line::from("  Enter/w - Write the apply script"),
        Line::from("  p       - Toggle preview panel"),
        Line::from("  h/F1    - Toggle this help"),
        Line::from("  q/Esc   - Quit without writing anything"),
        Line::from(""),
        Line::from("Nothing on disk changes until you run the generated script."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or h to close",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::models::PlanStats;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_draws_empty_and_help() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = App::new(Vec::new(), PlanStats::default());
        app.show_help = true;

        terminal.draw(|f| ui(f, &app)).unwrap();
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 50, outer);
        assert!(inner.x >= outer.x && inner.right() <= outer.right());
        assert!(inner.y >= outer.y && inner.bottom() <= outer.bottom());
    }
}
