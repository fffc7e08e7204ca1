//! History view: status transitions recorded this session.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.tracker.log_len() == 0 {
        let text = vec![
            Line::from(""),
            Line::from(" No status transitions recorded yet."),
            Line::from(""),
            Line::styled(
                " Refresh the Sites page (r) more than once; a change between two refreshes is logged here.",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ];
        let block = Block::default()
            .title(format!(" History ({} sites tracked) ", app.tracker.len()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: false }), area);
        return;
    }

    let log = app.tracker.log_table();
    let title = format!(
        " History ({} transitions, {} sites tracked) ",
        log.len(),
        app.tracker.len()
    );
    super::page::render_table(frame, app, &log, &title, area);
}
