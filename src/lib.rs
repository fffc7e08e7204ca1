//! # sitewatch
//!
//! A terminal dashboard for tower online/offline reports and SISS site
//! statuses, with an in-session history of site status transitions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (tracker)│    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── TowerReportClient | SissClient | Replay    │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, refresh, filters, date range and export
//! - **[`source`]**: Producers behind the [`TowerSource`] and [`SiteSource`]
//!   traits: HTTP clients for both upstream services and a replay source
//! - **[`data`]**: [`StatusHistoryTracker`], tables, statuses and durations
//! - **[`export`]**: CSV and JSON writers for tables and the transition log
//! - **[`config`]**: Layered [`Settings`]
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Live, credentials from .env (LOGIN_USERNAME, LOGIN_PASSWORD, ...)
//! sitewatch
//!
//! # Offline, from captured tower.html / siss.json
//! sitewatch --replay captures/
//!
//! # Fetch SISS once, export CSV and exit
//! sitewatch --once sites --export-dir out/
//! ```
//!
//! ### Tracking status transitions
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use sitewatch::StatusHistoryTracker;
//!
//! let wib = FixedOffset::east_opt(7 * 3600).unwrap();
//! let mut tracker = StatusHistoryTracker::new();
//!
//! tracker.observe([("JKT-001", "NORMAL")], wib.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap());
//! tracker.observe([("JKT-001", "CRITICAL")], wib.with_ymd_and_hms(2025, 3, 10, 8, 1, 5).unwrap());
//!
//! let log = tracker.log_entries();
//! assert_eq!(log[0].duration, "1 menit 5 detik");
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod export;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use config::Settings;
pub use data::{SiteRecord, StatusHistoryTracker, Table, TransitionLogEntry};
pub use export::ExportFormat;
pub use source::{
    DateRange, ReplaySource, SissClient, SiteSource, SourceError, TowerReportClient, TowerSource,
};
