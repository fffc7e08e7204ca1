//! Bar chart of row counts per status.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, STATUS_COLUMN};
use crate::data::Table;

const BAR_WIDTH: u16 = 12;

/// Render one bar per distinct value of the status column.
pub fn render(frame: &mut Frame, app: &App, table: &Table, title: &str, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let counts = match table.value_counts(STATUS_COLUMN) {
        Some(counts) if !counts.is_empty() => counts,
        Some(_) => {
            frame.render_widget(Paragraph::new(" No rows").block(block), area);
            return;
        }
        None => {
            let msg = format!(" Column '{}' not found", STATUS_COLUMN);
            frame.render_widget(Paragraph::new(msg).block(block), area);
            return;
        }
    };

    let bars: Vec<Bar> = counts
        .iter()
        .map(|(status, count)| {
            let color = app.theme.status_color(status);
            Bar::default()
                .value(*count)
                .label(Line::from(status.clone()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(color).add_modifier(Modifier::REVERSED))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(2);

    frame.render_widget(chart, area);
}
