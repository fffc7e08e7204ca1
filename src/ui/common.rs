//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View, STATUS_COLUMN};
use crate::data::history::TIME_FORMAT;
use crate::data::status::{CRITICAL, NORMAL, OFFLINE, ONLINE};
use crate::data::{Table, Timestamp};

/// Render the header bar with the current page's counts.
///
/// Displays: title, total and per-status counts, last update time and,
/// for SISS pages, the selected date range.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " SITEWATCH ",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    match app.current_view {
        View::Towers => {
            spans.extend(count_spans(app, app.towers.as_ref(), &[OFFLINE, ONLINE]));
            spans.push(updated_span(app.towers_updated));
        }
        View::Sites => {
            spans.extend(count_spans(app, app.sites.as_ref(), &[NORMAL, CRITICAL]));
            spans.push(Span::raw(format!("│ {} ", app.range.label())));
            spans.push(updated_span(app.sites_updated));
        }
        View::History => {
            spans.push(Span::raw(format!(
                "│ {} transitions │ {} sites tracked ",
                app.tracker.log_len(),
                app.tracker.len()
            )));
            spans.push(updated_span(app.sites_updated));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn count_spans(app: &App, table: Option<&Table>, statuses: &[&str]) -> Vec<Span<'static>> {
    let Some(table) = table else {
        return vec![Span::raw("│ Not loaded ")];
    };

    let counts = table.value_counts(STATUS_COLUMN).unwrap_or_default();
    let count_of = |status: &str| {
        counts
            .iter()
            .find(|(s, _)| s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    };

    let mut spans = vec![Span::raw(format!("│ {} total ", table.len()))];
    for &status in statuses {
        let n = count_of(status);
        let style = if n > 0 {
            app.theme.status_style(status)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(n.to_string(), style));
        spans.push(Span::raw(format!(" {} ", status)));
    }
    spans
}

fn updated_span(updated: Option<Timestamp>) -> Span<'static> {
    match updated {
        Some(at) => Span::raw(format!("│ Updated {}", format_time(at))),
        None => Span::styled("│ Never updated", Style::default().add_modifier(Modifier::DIM)),
    }
}

/// `YYYY-MM-DD HH:MM:SS` in the timestamp's own offset.
pub fn format_time(at: Timestamp) -> String {
    at.format(TIME_FORMAT).to_string()
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Towers "),
        Line::from(" 2:Sites "),
        Line::from(" 3:History "),
    ];

    let selected = match app.current_view {
        View::Towers => 0,
        View::Sites => 1,
        View::History => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Temporary messages win, then the last refresh error, then the source
/// description with the view's controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let paragraph = Paragraph::new(format!(" Error: {} | r:retry q:quit", err))
            .style(Style::default().fg(app.theme.critical));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Towers => "r:refresh f:filter a:all e/E:export Tab:switch ?:help q:quit",
        View::Sites => "r:refresh f:filter a:all [/]{/}:range e/E:export ?:help q:quit",
        View::History => "r:refresh sites e:export Tab:switch ?:help q:quit",
    };

    let status = format!(" {} | {}", app.source_description(), controls);
    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  Tab/1-3     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate rows"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from(""),
        section(" Data"),
        Line::from("  r         Refresh current page"),
        Line::from("  f         Cycle status filter"),
        Line::from("  a         Full / filtered table"),
        Line::from("  [ / ]     Range start -/+ 1 day"),
        Line::from("  { / }     Range end -/+ 1 day"),
        Line::from(""),
        section(" Export"),
        Line::from("  e         Filtered table / history"),
        Line::from("  E         Full table"),
        Line::from(""),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
