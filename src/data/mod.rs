//! Data models and session state.
//!
//! ## Submodules
//!
//! - [`duration`]: Formatting of status periods ("1 jam 2 menit 3 detik") and
//!   parsing of CLI duration strings ("10s", "500ms")
//! - [`history`]: [`StatusHistoryTracker`], the per-session transition log
//! - [`site`]: [`SiteRecord`] produced by the SISS collector
//! - [`status`]: Canonical status labels and per-page filters
//! - [`table`]: [`Table`], the column-named grid used for display and export
//!
//! ## Data Flow
//!
//! ```text
//! SISS JSON ──▶ Vec<SiteRecord> ──┬──▶ StatusHistoryTracker::observe(now)
//!                                 │          │
//!                                 │          └──▶ log_table() ──▶ History view / export
//!                                 └──▶ sites_to_table() ──▶ Sites view / export
//!
//! Tower HTML ──▶ Table ──▶ Towers view / export
//! ```

pub mod duration;
pub mod history;
pub mod site;
pub mod status;
pub mod table;

pub use history::{Observation, StatusHistoryTracker, StatusRecord, Timestamp, TransitionLogEntry};
pub use site::SiteRecord;
pub use status::{FilterKind, StatusFilter};
pub use table::Table;
