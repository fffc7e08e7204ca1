//! Site records produced by the SISS collector.

use super::history::Observation;
use super::table::Table;

/// Column headers used when sites are shown or exported as a table.
pub const SITE_COLUMNS: [&str; 6] = [
    "Site Name",
    "Region",
    "Status",
    "longitude",
    "latitude",
    "tenantId",
];

/// One monitored site with its canonical status.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRecord {
    pub name: Option<String>,
    pub region: Option<String>,
    pub status: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub tenant_id: Option<String>,
}

impl SiteRecord {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone().unwrap_or_default(),
            self.region.clone().unwrap_or_default(),
            self.status.clone(),
            self.longitude.map(|v| v.to_string()).unwrap_or_default(),
            self.latitude.map(|v| v.to_string()).unwrap_or_default(),
            self.tenant_id.clone().unwrap_or_default(),
        ]
    }
}

impl Observation for SiteRecord {
    fn entity(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn status(&self) -> Option<&str> {
        Some(&self.status)
    }
}

/// Lay out sites as a table with [`SITE_COLUMNS`] headers.
pub fn sites_to_table(sites: &[SiteRecord]) -> Table {
    Table::new(
        SITE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        sites.iter().map(SiteRecord::to_row).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_layout_fills_missing_cells() {
        let sites = vec![SiteRecord {
            name: Some("JKT-001".into()),
            region: None,
            status: "NORMAL".into(),
            longitude: Some(106.8),
            latitude: Some(-6.2),
            tenant_id: None,
        }];

        let table = sites_to_table(&sites);
        assert_eq!(table.headers.len(), SITE_COLUMNS.len());
        assert_eq!(table.rows[0], vec!["JKT-001", "", "NORMAL", "106.8", "-6.2", ""]);
    }

    #[test]
    fn unnamed_site_is_not_an_observation() {
        let site = SiteRecord {
            name: None,
            region: None,
            status: "CRITICAL".into(),
            longitude: None,
            latitude: None,
            tenant_id: None,
        };
        assert_eq!(site.entity(), None);
        assert_eq!(site.status(), Some("CRITICAL"));
    }
}
