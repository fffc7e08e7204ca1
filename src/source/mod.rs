//! Snapshot producers.
//!
//! Every page of the dashboard is fed by a producer that logs in to an
//! upstream service, fetches one response and parses it into tabular data.
//! Producers are asynchronous and stateless between calls: each fetch opens
//! a fresh HTTP session.
//!
//! - [`TowerReportClient`]: HTML tower online/offline report
//! - [`SissClient`]: SISS site-status JSON API, queried for a [`DateRange`]
//! - [`ReplaySource`]: captured payloads from disk, for offline use

mod error;
mod html;
mod range;
mod replay;
mod siss;
mod tower;

pub use error::SourceError;
pub use range::DateRange;
pub use replay::{ReplaySource, SISS_CAPTURE, TOWER_CAPTURE};
pub use siss::{
    authorization_attempts, build_report_url, extract_auth_token, parse_sites, percent_encode,
    SissClient,
};
pub use tower::{parse_report, TowerReportClient};

pub(crate) use error::require_credentials;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::data::{SiteRecord, Table};

/// Producer of the tower online/offline table.
///
/// # Example
///
/// ```no_run
/// use sitewatch::source::{ReplaySource, TowerSource};
///
/// # tokio_test::block_on(async {
/// let source = ReplaySource::new("captures");
/// let table = source.fetch_towers().await.unwrap();
/// println!("{} towers", table.len());
/// # });
/// ```
#[async_trait]
pub trait TowerSource: Send + Sync + Debug {
    /// Log in and fetch the current tower report.
    async fn fetch_towers(&self) -> Result<Table, SourceError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}

/// Producer of SISS site records for a date range.
#[async_trait]
pub trait SiteSource: Send + Sync + Debug {
    /// Log in and fetch site records with canonical statuses.
    async fn fetch_sites(&self, range: &DateRange) -> Result<Vec<SiteRecord>, SourceError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
