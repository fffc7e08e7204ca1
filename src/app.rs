//! Application state and navigation logic.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::config::Settings;
use crate::data::site::sites_to_table;
use crate::data::{FilterKind, StatusFilter, StatusHistoryTracker, Table, Timestamp};
use crate::export::{export_table, file_stem, history_file_stem, ExportFormat};
use crate::source::{DateRange, SiteSource, SourceError, TowerSource};
use crate::ui::Theme;

/// Column both producers report status in.
pub const STATUS_COLUMN: &str = "Status";

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Tower online/offline report.
    Towers,
    /// SISS site statuses for the selected date range.
    Sites,
    /// Status transitions recorded during this session.
    History,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Towers => View::Sites,
            View::Sites => View::History,
            View::History => View::Towers,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Towers => View::History,
            View::Sites => View::Towers,
            View::History => View::Sites,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Towers => "Towers",
            View::Sites => "Sites",
            View::History => "History",
        }
    }
}

/// Main application state.
///
/// Owns the tokio runtime the producers run on. Refreshes are driven from
/// the UI thread with `block_on`, so the screen waits for the fetch.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    /// Show every row on the Towers/Sites pages instead of the filtered ones.
    pub show_full: bool,

    runtime: Runtime,
    settings: Settings,
    tower_source: Box<dyn TowerSource>,
    site_source: Box<dyn SiteSource>,

    pub towers: Option<Table>,
    pub sites: Option<Table>,
    pub towers_updated: Option<Timestamp>,
    pub sites_updated: Option<Timestamp>,
    pub tracker: StatusHistoryTracker,
    pub load_error: Option<String>,

    pub tower_filter: StatusFilter,
    pub site_filter: StatusFilter,
    pub range: DateRange,

    pub selected_index: usize,

    pub export_dir: PathBuf,
    pub export_format: ExportFormat,

    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App over the two producers.
    ///
    /// The SISS range defaults to the last `default_range_days` days ending
    /// today in the configured offset.
    pub fn new(
        settings: Settings,
        tower_source: Box<dyn TowerSource>,
        site_source: Box<dyn SiteSource>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let range = DateRange::last_days(
            settings.now().date_naive(),
            settings.default_range_days,
            settings.offset(),
        );

        Ok(Self {
            running: true,
            current_view: View::Towers,
            show_help: false,
            show_full: false,
            runtime,
            tower_source,
            site_source,
            towers: None,
            sites: None,
            towers_updated: None,
            sites_updated: None,
            tracker: StatusHistoryTracker::new(),
            load_error: None,
            tower_filter: StatusFilter::all(FilterKind::Tower),
            site_filter: StatusFilter::all(FilterKind::Site),
            range,
            selected_index: 0,
            export_dir: settings.export_dir.clone(),
            export_format: ExportFormat::default(),
            theme: Theme::default(),
            status_message: None,
            settings,
        })
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns a description of the producer behind the current view.
    pub fn source_description(&self) -> &str {
        match self.current_view {
            View::Towers => self.tower_source.description(),
            View::Sites | View::History => self.site_source.description(),
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Refresh the current view using the configured clock.
    pub fn refresh(&mut self) -> Result<(), SourceError> {
        let now = self.settings.now();
        self.refresh_at(now)
    }

    /// Refresh the current view as of `now`.
    ///
    /// The History view has nothing of its own to fetch, so it refreshes the
    /// sites it is built from. On failure the previous data is kept and the
    /// error is remembered for the status bar.
    pub fn refresh_at(&mut self, now: Timestamp) -> Result<(), SourceError> {
        let result = match self.current_view {
            View::Towers => self.refresh_towers(now),
            View::Sites | View::History => self.refresh_sites(now),
        };

        match &result {
            Ok(()) => self.load_error = None,
            Err(e) => {
                warn!(view = self.current_view.label(), error = %e, "Refresh failed");
                self.load_error = Some(e.to_string());
            }
        }
        self.clamp_selection();
        result
    }

    fn refresh_towers(&mut self, now: Timestamp) -> Result<(), SourceError> {
        let table = self.runtime.block_on(self.tower_source.fetch_towers())?;
        self.towers = Some(table);
        self.towers_updated = Some(now);
        Ok(())
    }

    fn refresh_sites(&mut self, now: Timestamp) -> Result<(), SourceError> {
        let sites = self.runtime.block_on(self.site_source.fetch_sites(&self.range))?;
        let transitions = self.tracker.observe(&sites, now);
        if transitions > 0 {
            info!(transitions, "Site status changes recorded");
        }
        self.sites = Some(sites_to_table(&sites));
        self.sites_updated = Some(now);
        Ok(())
    }

    /// Table shown on the current page: the full one when `show_full` is
    /// set, the filtered one otherwise. `None` on History or before a load.
    pub fn displayed_table(&self) -> Option<Table> {
        let (full, filter) = match self.current_view {
            View::Towers => (self.towers.as_ref(), self.tower_filter),
            View::Sites => (self.sites.as_ref(), self.site_filter),
            View::History => return None,
        };
        let full = full?;
        if self.show_full {
            Some(full.clone())
        } else {
            Some(full.filtered(STATUS_COLUMN, filter.status()))
        }
    }

    /// Number of selectable rows in the current view.
    pub fn row_count(&self) -> usize {
        match self.current_view {
            View::Towers | View::Sites => self.displayed_table().map(|t| t.len()).unwrap_or(0),
            View::History => self.tracker.log_len(),
        }
    }

    /// Switch the Towers/Sites pages between the full and filtered table.
    pub fn toggle_full_table(&mut self) {
        self.show_full = !self.show_full;
        self.clamp_selection();
        let shown = if self.show_full { "all rows" } else { "filtered rows" };
        self.set_status_message(format!("Showing {}", shown));
    }

    /// Cycle the status filter of the current view.
    pub fn cycle_filter(&mut self) {
        let label = match self.current_view {
            View::Towers => {
                self.tower_filter = self.tower_filter.next();
                self.tower_filter.label()
            }
            View::Sites => {
                self.site_filter = self.site_filter.next();
                self.site_filter.label()
            }
            View::History => return,
        };
        self.selected_index = 0;
        self.set_status_message(format!("Filter: {}", label));
    }

    /// Move the first day of the SISS range by `days`.
    pub fn shift_range_start(&mut self, days: i64) {
        self.range = self.range.shift_start(days);
        self.set_status_message(format!("Range: {} (r to reload)", self.range.label()));
    }

    /// Move the last day of the SISS range by `days`.
    pub fn shift_range_end(&mut self, days: i64) {
        self.range = self.range.shift_end(days);
        self.set_status_message(format!("Range: {} (r to reload)", self.range.label()));
    }

    /// Export the table behind the current view.
    ///
    /// With `filtered` the page's status filter is applied and named in the
    /// file; otherwise the full table is written as `semua`. The History
    /// view always exports the full transition log.
    pub fn export_current(&self, filtered: bool) -> Result<PathBuf> {
        let now = self.settings.now();
        let (stem, table) = match self.current_view {
            View::Towers => {
                let Some(table) = self.towers.as_ref() else {
                    bail!("No tower data to export");
                };
                let filter = self.page_filter(self.tower_filter, filtered);
                let stem = file_stem("tower", &filter.file_token(), self.towers_updated.unwrap_or(now));
                (stem, table.filtered(STATUS_COLUMN, filter.status()))
            }
            View::Sites => {
                let Some(table) = self.sites.as_ref() else {
                    bail!("No site data to export");
                };
                let filter = self.page_filter(self.site_filter, filtered);
                let stem = file_stem("siss", &filter.file_token(), self.sites_updated.unwrap_or(now));
                (stem, table.filtered(STATUS_COLUMN, filter.status()))
            }
            View::History => {
                if self.tracker.log_len() == 0 {
                    bail!("No status transitions to export");
                }
                let stem = history_file_stem(self.sites_updated.unwrap_or(now));
                (stem, self.tracker.log_table())
            }
        };

        export_table(&self.export_dir, &stem, &table, self.export_format)
    }

    fn page_filter(&self, filter: StatusFilter, filtered: bool) -> StatusFilter {
        if filtered {
            filter
        } else {
            filter.cleared()
        }
    }

    /// Export and report the outcome in the status bar.
    pub fn export_and_report(&mut self, filtered: bool) {
        match self.export_current(filtered) {
            Ok(path) => self.set_status_message(format!("Exported to {}", path.display())),
            Err(e) => self.set_status_message(format!("Export failed: {}", e)),
        }
    }

    /// Switch to the next view (cycles through Towers → Sites → History).
    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.selected_index = 0;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.row_count().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_index = self.row_count().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let max = self.row_count().saturating_sub(1);
        self.selected_index = self.selected_index.min(max);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ReplaySource, SISS_CAPTURE, TOWER_CAPTURE};
    use chrono::{FixedOffset, TimeZone};
    use tempfile::TempDir;

    const TOWERS: &str = "<table><thead><tr><th>#</th><th>Tower</th><th>Status</th></tr></thead>\
        <tbody><tr><td>1</td><td>T1</td><td>Online</td></tr>\
        <tr><td>2</td><td>T2</td><td>Offline</td></tr>\
        <tr><td>3</td><td>T3</td><td>Online</td></tr></tbody></table>";

    fn at(h: u32, m: u32) -> Timestamp {
        FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 10, h, m, 0)
            .unwrap()
    }

    fn write_sites(dir: &TempDir, statuses: &[(&str, &str)]) {
        let items: Vec<serde_json::Value> = statuses
            .iter()
            .map(|(name, status)| serde_json::json!({ "name": name, "status": status }))
            .collect();
        let body = serde_json::json!({ "responseDataValue": items });
        std::fs::write(dir.path().join(SISS_CAPTURE), body.to_string()).unwrap();
    }

    fn app(dir: &TempDir) -> App {
        let settings = Settings {
            export_dir: dir.path().join("out"),
            ..Settings::default()
        };
        App::new(
            settings,
            Box::new(ReplaySource::new(dir.path())),
            Box::new(ReplaySource::new(dir.path())),
        )
        .unwrap()
    }

    #[test]
    fn view_cycling() {
        assert_eq!(View::Towers.next(), View::Sites);
        assert_eq!(View::History.next(), View::Towers);
        assert_eq!(View::Towers.prev(), View::History);
        assert_eq!(View::Sites.label(), "Sites");
    }

    #[test]
    fn refresh_towers_and_filter() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(TOWER_CAPTURE), TOWERS).unwrap();
        let mut app = app(&dir);

        app.refresh_at(at(8, 0)).unwrap();
        assert_eq!(app.towers.as_ref().map(Table::len), Some(3));
        assert_eq!(app.towers_updated, Some(at(8, 0)));
        assert_eq!(app.row_count(), 3);

        app.cycle_filter();
        assert_eq!(app.tower_filter.status(), Some("Offline"));
        assert_eq!(app.row_count(), 1);
        assert_eq!(app.displayed_table().unwrap().rows[0][0], "T2");
    }

    #[test]
    fn site_refreshes_feed_the_tracker() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.set_view(View::Sites);

        write_sites(&dir, &[("A", "NORMAL"), ("B", "NORMAL")]);
        app.refresh_at(at(8, 0)).unwrap();
        assert_eq!(app.tracker.len(), 2);
        assert_eq!(app.tracker.log_len(), 0);

        write_sites(&dir, &[("A", "NOT INSTALLED"), ("B", "NORMAL")]);
        app.refresh_at(at(9, 30)).unwrap();

        let log = app.tracker.log_entries();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].entity_name, "A");
        assert_eq!(log[0].to_status, "CRITICAL");
        assert_eq!(log[0].duration, "1 jam 30 menit 0 detik");
        assert_eq!(app.sites_updated, Some(at(9, 30)));
    }

    #[test]
    fn failed_refresh_keeps_previous_data() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.set_view(View::Sites);

        write_sites(&dir, &[("A", "NORMAL")]);
        app.refresh_at(at(8, 0)).unwrap();

        std::fs::write(dir.path().join(SISS_CAPTURE), "not json").unwrap();
        let err = app.refresh_at(at(8, 5)).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
        assert!(app.load_error.is_some());
        assert_eq!(app.sites.as_ref().map(Table::len), Some(1));
        assert_eq!(app.sites_updated, Some(at(8, 0)));
    }

    #[test]
    fn exports_use_page_names() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(TOWER_CAPTURE), TOWERS).unwrap();
        let mut app = app(&dir);
        app.refresh_at(at(8, 0)).unwrap();
        app.cycle_filter();

        let filtered = app.export_current(true).unwrap();
        assert!(filtered.ends_with("tower_offline_2025-03-10_08-00-00.csv"));
        let contents = std::fs::read_to_string(&filtered).unwrap();
        assert_eq!(contents, "Tower,Status\nT2,Offline\n");

        let full = app.export_current(false).unwrap();
        assert!(full.ends_with("tower_semua_2025-03-10_08-00-00.csv"));
    }

    #[test]
    fn history_export_requires_transitions() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.set_view(View::History);
        assert!(app.export_current(true).is_err());

        write_sites(&dir, &[("A", "NORMAL")]);
        app.refresh_at(at(8, 0)).unwrap();
        write_sites(&dir, &[("A", "CRITICAL")]);
        app.refresh_at(at(8, 1)).unwrap();

        let path = app.export_current(true).unwrap();
        assert!(path.ends_with("riwayat_status_siss_2025-03-10_08-01-00.csv"));
    }

    #[test]
    fn range_shifts_by_days() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let before = app.range;

        app.shift_range_start(-1);
        assert_eq!(app.range.start_date(), before.start_date().pred_opt().unwrap());
        app.shift_range_end(1);
        assert_eq!(app.range.end_date(), before.end_date().succ_opt().unwrap());
        assert!(app.get_status_message().unwrap().starts_with("Range:"));
    }

    #[test]
    fn selection_is_clamped_to_rows() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(TOWER_CAPTURE), TOWERS).unwrap();
        let mut app = app(&dir);
        app.refresh_at(at(8, 0)).unwrap();

        app.select_next_n(10);
        assert_eq!(app.selected_index, 2);
        app.select_prev();
        assert_eq!(app.selected_index, 1);
        app.select_first();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn full_table_toggle_ignores_filter() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(TOWER_CAPTURE), TOWERS).unwrap();
        let mut app = app(&dir);
        app.refresh_at(at(8, 0)).unwrap();
        app.cycle_filter();
        assert_eq!(app.row_count(), 1);

        app.toggle_full_table();
        assert!(app.show_full);
        assert_eq!(app.row_count(), 3);
        assert_eq!(app.displayed_table().unwrap().rows[1][0], "T2");
        app.select_last();
        assert_eq!(app.selected_index, 2);

        app.toggle_full_table();
        assert_eq!(app.row_count(), 1);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.get_status_message(), Some("Showing filtered rows"));
    }
}
