//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::status::{CRITICAL, NORMAL, OFFLINE, ONLINE};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for statuses that need attention (Offline, CRITICAL).
    pub critical: Color,
    /// Color for healthy statuses (Online, NORMAL).
    pub healthy: Color,
    /// Color for bars of statuses with no dedicated color.
    pub neutral: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            critical: Color::Red,
            healthy: Color::Green,
            neutral: Color::Gray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            critical: Color::Red,
            healthy: Color::Green,
            neutral: Color::DarkGray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Foreground color for a status label.
    pub fn status_color(&self, status: &str) -> Color {
        match status {
            ONLINE | NORMAL => self.healthy,
            OFFLINE | CRITICAL => self.critical,
            _ => self.neutral,
        }
    }

    /// Get style for a status label
    pub fn status_style(&self, status: &str) -> Style {
        match status {
            OFFLINE | CRITICAL => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
            ONLINE | NORMAL => Style::default().fg(self.healthy),
            _ => Style::default(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_health_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.status_color("Online"), Color::Green);
        assert_eq!(theme.status_color("CRITICAL"), Color::Red);
        assert_eq!(theme.status_color("UNKNOWN"), Color::Gray);
        assert_eq!(theme.status_style("whatever"), Style::default());
    }
}
