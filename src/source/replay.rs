//! Replay source.
//!
//! Reads captured upstream payloads from a directory instead of logging in:
//! `tower.html` for the tower report and `siss.json` for SISS. The same
//! parsers as the live clients are used, so a capture exercises the whole
//! pipeline offline.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{parse_report, parse_sites, DateRange, SiteSource, SourceError, TowerSource};
use crate::data::{SiteRecord, Table};

/// File name of the captured tower report page.
pub const TOWER_CAPTURE: &str = "tower.html";
/// File name of the captured SISS panel data response.
pub const SISS_CAPTURE: &str = "siss.json";

/// A source that serves captured payloads from a directory.
///
/// Files are re-read on every fetch, so replacing a capture between refreshes
/// simulates upstream changes. The SISS date range is ignored.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    dir: PathBuf,
    description: String,
}

impl ReplaySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let description = format!("replay: {}", dir.display());
        Self { dir, description }
    }

    async fn read(&self, name: &str) -> Result<String, SourceError> {
        let path = self.dir.join(name);
        debug!(path = %path.display(), "Reading capture");
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}

#[async_trait]
impl TowerSource for ReplaySource {
    async fn fetch_towers(&self) -> Result<Table, SourceError> {
        let page = self.read(TOWER_CAPTURE).await?;
        parse_report(&page)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[async_trait]
impl SiteSource for ReplaySource {
    async fn fetch_sites(&self, _range: &DateRange) -> Result<Vec<SiteRecord>, SourceError> {
        let raw = self.read(SISS_CAPTURE).await?;
        parse_sites(&raw)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
