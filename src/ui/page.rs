//! Towers and Sites views.
//!
//! Both pages show the status table next to a bar chart of the full
//! table's counts per status. The table is the filtered one unless
//! [`App::show_full`] is set.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table as TableWidget, TableState},
    Frame,
};

use crate::app::{App, View, STATUS_COLUMN};
use crate::data::Table;

/// Chart panel width, wide enough for two labelled bars.
const CHART_WIDTH: u16 = 34;

/// Render the Towers or Sites page, whichever is current.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let (full, filter_label, what) = match app.current_view {
        View::Towers => (app.towers.as_ref(), app.tower_filter.label(), "Towers"),
        View::Sites => (app.sites.as_ref(), app.site_filter.label(), "Sites"),
        View::History => return,
    };

    let (Some(full), Some(shown)) = (full, app.displayed_table()) else {
        render_empty(frame, app, area);
        return;
    };

    let chunks = Layout::horizontal([Constraint::Min(20), Constraint::Length(CHART_WIDTH)])
        .split(area);

    let title = if app.show_full {
        format!(" {} (all {}) [a:filtered] ", what, full.len())
    } else {
        format!(
            " {} ({}/{}) [f:{}] [a:all] ",
            what,
            shown.len(),
            full.len(),
            filter_label
        )
    };
    render_table(frame, app, &shown, &title, chunks[0]);
    super::chart::render(frame, app, full, "Status counts", chunks[1]);
}

fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
    let msg = match &app.load_error {
        Some(_) => " No data loaded. Press r to retry.",
        None => " No data loaded yet. Press r to refresh.",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    frame.render_widget(Paragraph::new(msg).block(block), area);
}

/// Render a [`Table`] with its status column colored.
pub fn render_table(frame: &mut Frame, app: &App, table: &Table, title: &str, area: Rect) {
    let status_col = table.column_index(STATUS_COLUMN);

    let header = Row::new(table.headers.iter().map(|h| Cell::from(h.as_str())))
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            Row::new(row.iter().enumerate().map(|(i, value)| {
                let cell = Cell::from(value.as_str());
                if Some(i) == status_col {
                    cell.style(app.theme.status_style(value))
                } else {
                    cell
                }
            }))
        })
        .collect();

    let widths = vec![Constraint::Fill(1); table.headers.len().max(1)];

    let selected = app.selected_index.min(table.len().saturating_sub(1));
    let position_info = if !table.is_empty() {
        format!("[{}/{}] ", selected + 1, table.len())
    } else {
        String::new()
    };

    let widget = TableWidget::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!("{}{}", title, position_info))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !table.is_empty() {
        state.select(Some(selected));
    }

    frame.render_stateful_widget(widget, area, &mut state);
}
