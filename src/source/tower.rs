//! Tower online/offline report scraped from an HTML page behind a form login.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use super::html;
use super::{require_credentials, SourceError, TowerSource};
use crate::config::TowerSettings;
use crate::data::Table;

/// Row-number column present in the upstream report, dropped on parse.
const ROW_NUMBER_COLUMN: &str = "#";

/// Client for the tower report web page.
#[derive(Debug, Clone)]
pub struct TowerReportClient {
    settings: TowerSettings,
    timeout: Duration,
    description: String,
}

impl TowerReportClient {
    pub fn new(settings: TowerSettings, timeout: Duration) -> Self {
        let description = format!("tower: {}", settings.report_url);
        Self {
            settings,
            timeout,
            description,
        }
    }

    /// A fresh cookie-carrying session for one login + fetch cycle.
    fn session(&self) -> Result<Client, SourceError> {
        Ok(Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .build()?)
    }

    async fn login(&self, client: &Client, username: &str, password: &str) -> Result<(), SourceError> {
        let response = client
            .post(&self.settings.login_url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        // A successful login redirects away from the login page.
        let landed_on_login = response.url().as_str().to_ascii_lowercase().contains("login");
        if response.status() != StatusCode::OK || landed_on_login {
            return Err(SourceError::Auth(format!(
                "tower report login rejected (status {}, url {})",
                response.status(),
                response.url()
            )));
        }
        debug!("Logged in to tower report");
        Ok(())
    }
}

#[async_trait]
impl TowerSource for TowerReportClient {
    async fn fetch_towers(&self) -> Result<Table, SourceError> {
        let (username, password) = require_credentials(
            self.settings.username.as_deref(),
            self.settings.password.as_deref(),
            "tower report (LOGIN_USERNAME / LOGIN_PASSWORD)",
        )?;

        let client = self.session()?;
        self.login(&client, username, password).await?;

        let response = client.get(&self.settings.report_url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(SourceError::Http(format!(
                "tower report returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let table = parse_report(&body)?;
        info!(rows = table.len(), "Fetched tower report");
        Ok(table)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Parse the first `<table>` of the report page.
///
/// Headers come from `<thead>` `<th>` cells, rows from `<tbody>` `<tr>`/`<td>`.
/// Rows without cells are skipped, short rows (e.g. a `colspan` placeholder)
/// are padded with empty cells and rows wider than the header are rejected.
/// The `#` row-number column is dropped.
pub fn parse_report(page: &str) -> Result<Table, SourceError> {
    let table = html::first_element(page, "table")
        .ok_or_else(|| SourceError::Parse("no table found in tower report".to_string()))?;

    let thead = html::first_element(table, "thead");
    let tbody = html::first_element(table, "tbody");
    let (Some(thead), Some(tbody)) = (thead, tbody) else {
        return Err(SourceError::Schema(
            "thead/tbody not found in tower report table".to_string(),
        ));
    };

    let headers: Vec<String> = html::elements(thead, "th").into_iter().map(html::text).collect();

    let mut rows = Vec::new();
    for (i, tr) in html::elements(tbody, "tr").into_iter().enumerate() {
        let mut cells: Vec<String> =
            html::elements(tr, "td").into_iter().map(html::text).collect();
        if cells.is_empty() {
            continue;
        }
        if cells.len() > headers.len() {
            return Err(SourceError::Schema(format!(
                "row {} has {} cells, expected {}",
                i + 1,
                cells.len(),
                headers.len()
            )));
        }
        cells.resize(headers.len(), String::new());
        rows.push(cells);
    }

    let mut table = Table::new(headers, rows);
    table.drop_column(ROW_NUMBER_COLUMN);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"
        <html><body>
        <h1>Report</h1>
        <table class="table">
          <thead>
            <tr><th>#</th><th>Tower ID</th><th>Site Name</th><th>Status</th></tr>
          </thead>
          <tbody>
            <tr><td>1</td><td>TWR-001</td><td>Bekasi&nbsp;Timur</td><td><span class="badge">Online</span></td></tr>
            <tr><td>2</td><td>TWR-002</td><td>Depok</td><td>Offline</td></tr>
          </tbody>
        </table>
        <table><tr><td>ignored</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn parses_first_table_and_drops_row_numbers() {
        let table = parse_report(REPORT).unwrap();
        assert_eq!(table.headers, vec!["Tower ID", "Site Name", "Status"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["TWR-001", "Bekasi Timur", "Online"]);
        assert_eq!(table.rows[1][2], "Offline");
    }

    #[test]
    fn missing_table_is_a_parse_error() {
        let err = parse_report("<html><p>Session expired</p></html>").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn missing_tbody_is_a_schema_error() {
        let err = parse_report("<table><thead><tr><th>A</th></tr></thead></table>").unwrap_err();
        assert!(matches!(err, SourceError::Schema(_)));
    }

    #[test]
    fn short_rows_are_padded() {
        let page = "<table><thead><tr><th>#</th><th>Tower</th><th>Status</th></tr></thead>\
                    <tbody><tr><td>1</td><td>T1</td><td>Online</td></tr>\
                    <tr><td>2</td><td>T2</td></tr>\
                    <tr><td colspan=\"3\">No more data</td></tr></tbody></table>";
        let table = parse_report(page).unwrap();
        assert_eq!(table.headers, vec!["Tower", "Status"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["T1", "Online"]);
        assert_eq!(table.rows[1], vec!["T2", ""]);
        assert_eq!(table.rows[2], vec!["", ""]);
    }

    #[test]
    fn rows_wider_than_header_are_rejected() {
        let page = "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
                    <tbody><tr><td>1</td><td>2</td><td>3</td></tr></tbody></table>";
        assert!(matches!(parse_report(page), Err(SourceError::Schema(_))));
    }

    #[test]
    fn missing_credentials_fail_before_any_request() {
        let client = TowerReportClient::new(
            crate::config::Settings::default().tower,
            Duration::from_secs(1),
        );
        let err = tokio_test::block_on(client.fetch_towers()).unwrap_err();
        assert!(matches!(err, SourceError::Config(_)));
    }
}
