use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Towers),
        KeyCode::Char('2') => app.set_view(View::Sites),
        KeyCode::Char('3') => app.set_view(View::History),

        // Navigation (up/down for rows, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Errors land in app.load_error and the status bar
        KeyCode::Char('r') => {
            let _ = app.refresh();
        }

        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('a') => app.toggle_full_table(),

        // SISS date range
        KeyCode::Char('[') => app.shift_range_start(-1),
        KeyCode::Char(']') => app.shift_range_start(1),
        KeyCode::Char('{') => app.shift_range_end(-1),
        KeyCode::Char('}') => app.shift_range_end(1),

        KeyCode::Char('e') => app.export_and_report(true),
        KeyCode::Char('E') => app.export_and_report(false),

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Content rows start below the table border and header row
            if clicked_row > content_start_row + 1 {
                let item_row = (clicked_row - content_start_row - 2) as usize;
                if item_row < app.row_count() {
                    app.selected_index = item_row;
                }
            }

            // Tab bar (row 1): " 1:Towers " | " 2:Sites " | " 3:History "
            if clicked_row == 1 {
                let col = mouse.column;
                if col < 12 {
                    app.set_view(View::Towers);
                } else if col < 23 {
                    app.set_view(View::Sites);
                } else if col < 36 {
                    app.set_view(View::History);
                }
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::source::ReplaySource;
    use crossterm::event::KeyEventState;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> App {
        App::new(
            Settings::default(),
            Box::new(ReplaySource::new("missing")),
            Box::new(ReplaySource::new("missing")),
        )
        .unwrap()
    }

    #[test]
    fn tab_and_digits_switch_views() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Sites);
        handle_key_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.current_view, View::Towers);
        handle_key_event(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.current_view, View::History);
    }

    #[test]
    fn help_swallows_next_key() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn failed_refresh_is_reported_not_raised() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('r')));
        assert!(app.load_error.as_deref().unwrap().starts_with("Read error"));
    }

    #[test]
    fn filter_and_range_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('f')));
        assert_eq!(app.tower_filter.status(), Some("Offline"));

        let start = app.range.start_date();
        handle_key_event(&mut app, key(KeyCode::Char('[')));
        assert_eq!(app.range.start_date(), start.pred_opt().unwrap());
    }

    #[test]
    fn a_toggles_full_table() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        assert!(app.show_full);
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        assert!(!app.show_full);
    }
}
