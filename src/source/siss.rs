//! SISS site-status API client.
//!
//! The API sits behind a JSON login that returns a token somewhere in its
//! response body. The panel data endpoint is queried with a millisecond
//! time range encoded as JSON in the query string.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use super::{require_credentials, DateRange, SiteSource, SourceError};
use crate::config::SissSettings;
use crate::data::status::normalize_site_status;
use crate::data::SiteRecord;

/// Characters of a failed response body kept in the error message.
const SNIPPET_CHARS: usize = 200;

/// Client for the SISS panel data API.
#[derive(Debug, Clone)]
pub struct SissClient {
    settings: SissSettings,
    timeout: Duration,
    description: String,
}

impl SissClient {
    pub fn new(settings: SissSettings, timeout: Duration) -> Self {
        let description = format!("siss: {}", settings.login_url);
        Self {
            settings,
            timeout,
            description,
        }
    }

    fn session(&self) -> Result<Client, SourceError> {
        Ok(Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .build()?)
    }

    /// Browser-like headers the API expects, with the given `Accept` value.
    fn headers(&self, accept: &'static str) -> Result<HeaderMap, SourceError> {
        let value = |s: &str, name: &str| {
            HeaderValue::from_str(s)
                .map_err(|_| SourceError::Config(format!("invalid {} header value", name)))
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
        headers.insert(USER_AGENT, value(&self.settings.user_agent, "User-Agent")?);
        headers.insert(ORIGIN, value(&self.settings.origin, "Origin")?);
        headers.insert(REFERER, value(&self.settings.referer, "Referer")?);
        Ok(headers)
    }

    /// Log in and return the token found in the response, if any.
    async fn login(
        &self,
        client: &Client,
        username: &str,
        password: &str,
    ) -> Result<Option<String>, SourceError> {
        let response = client
            .post(&self.settings.login_url)
            .headers(self.headers("application/json, text/plain, */*")?)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(SourceError::Auth(format!(
                "SISS login returned status {}",
                response.status()
            )));
        }

        let token = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| extract_auth_token(&body));
        if token.is_none() {
            warn!("SISS login response carried no token, trying without Authorization");
        }
        Ok(token)
    }
}

#[async_trait]
impl SiteSource for SissClient {
    async fn fetch_sites(&self, range: &DateRange) -> Result<Vec<SiteRecord>, SourceError> {
        let (username, password) = require_credentials(
            self.settings.username.as_deref(),
            self.settings.password.as_deref(),
            "SISS (LOGIN_USERNAME_1 / LOGIN_PASSWORD_1)",
        )?;

        let url = build_report_url(&self.settings.report_url, range);
        let client = self.session()?;
        let token = self.login(&client, username, password).await?;

        let mut last_failure: Option<(StatusCode, String)> = None;
        for authorization in authorization_attempts(token.as_deref()) {
            let mut request = client.get(&url).headers(self.headers("application/json")?);
            if let Some(value) = &authorization {
                request = request.header(AUTHORIZATION, value.as_str());
            }

            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;

            if status == StatusCode::OK {
                let sites = parse_sites(&body)?;
                info!(sites = sites.len(), range = %range.label(), "Fetched SISS sites");
                return Ok(sites);
            }

            debug!(
                status = %status,
                with_authorization = authorization.is_some(),
                "SISS report attempt failed"
            );
            last_failure = Some((status, body));
        }

        let (status, body) = last_failure.unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, String::new()));
        let snippet: String = body.chars().take(SNIPPET_CHARS).collect();
        Err(SourceError::Http(format!(
            "SISS report returned status {}. Response excerpt: {}",
            status, snippet
        )))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// `<base>?&requestOnDemand=<percent-encoded {"beginTs": ms, "endTs": ms}>`.
pub fn build_report_url(base: &str, range: &DateRange) -> String {
    let payload = format!(
        r#"{{"beginTs": {}, "endTs": {}}}"#,
        range.begin_ms(),
        range.end_ms()
    );
    format!("{}?&requestOnDemand={}", base, percent_encode(&payload))
}

/// Percent-encode everything except unreserved characters and `/`.
pub fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// First string value whose key contains "token" (any case), searched
/// depth-first through nested objects and arrays.
pub fn extract_auth_token(body: &Value) -> Option<String> {
    let mut stack = vec![body];
    while let Some(current) = stack.pop() {
        match current {
            Value::Object(map) => {
                for (key, value) in map {
                    match value {
                        Value::Object(_) | Value::Array(_) => stack.push(value),
                        Value::String(s) if key.to_ascii_lowercase().contains("token") => {
                            return Some(s.clone())
                        }
                        _ => {}
                    }
                }
            }
            Value::Array(items) => {
                stack.extend(items.iter().filter(|v| v.is_object() || v.is_array()));
            }
            _ => {}
        }
    }
    None
}

/// Authorization header values to try, in order. `None` means no header.
///
/// With a token: `Bearer <token>`, then the raw token, then nothing.
pub fn authorization_attempts(token: Option<&str>) -> Vec<Option<String>> {
    let mut attempts = Vec::with_capacity(3);
    if let Some(token) = token {
        let bearer = if token.to_ascii_lowercase().starts_with("bearer ") {
            token.to_string()
        } else {
            format!("Bearer {}", token)
        };
        attempts.push(Some(bearer));
        attempts.push(Some(token.to_string()));
    }
    attempts.push(None);
    attempts
}

/// Parse the panel data response into site records.
///
/// Sites whose status is not one of the tracked labels are dropped; the rest
/// carry canonical statuses.
pub fn parse_sites(raw: &str) -> Result<Vec<SiteRecord>, SourceError> {
    let data: Value = serde_json::from_str(raw)
        .map_err(|e| SourceError::Parse(format!("SISS response is not valid JSON: {}", e)))?;

    let items = data
        .as_object()
        .and_then(|o| o.get("responseDataValue"))
        .ok_or_else(|| {
            SourceError::Schema("field 'responseDataValue' not found in SISS response".to_string())
        })?
        .as_array()
        .ok_or_else(|| SourceError::Schema("'responseDataValue' is not a list".to_string()))?;

    Ok(items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(site_from_object)
        .collect())
}

fn site_from_object(obj: &Map<String, Value>) -> Option<SiteRecord> {
    let status = obj
        .get("status")
        .and_then(Value::as_str)
        .and_then(normalize_site_status)?;

    Some(SiteRecord {
        name: text_field(obj, "name"),
        region: text_field(obj, "region"),
        status: status.to_string(),
        longitude: number_field(obj, "longitude"),
        latitude: number_field(obj, "latitude"),
        tenant_id: text_field(obj, "tenantId"),
    })
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn range() -> DateRange {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        DateRange::new(day, day, FixedOffset::east_opt(7 * 3600).unwrap())
    }

    #[test]
    fn report_url_encodes_time_range() {
        let url = build_report_url("https://siss.example/v1/panels/x/panelData", &range());
        assert_eq!(
            url,
            "https://siss.example/v1/panels/x/panelData?&requestOnDemand=\
             %7B%22beginTs%22%3A%201735664400000%2C%20%22endTs%22%3A%201735750799999%7D"
        );
    }

    #[test]
    fn percent_encode_keeps_unreserved_and_slash() {
        assert_eq!(percent_encode("a-b_c.d~e/f"), "a-b_c.d~e/f");
        assert_eq!(percent_encode("a b&c"), "a%20b%26c");
    }

    #[test]
    fn token_found_in_nested_object() {
        let body = json!({
            "status": "ok",
            "data": { "user": { "id": 7 }, "accessToken": "abc123" }
        });
        assert_eq!(extract_auth_token(&body), Some("abc123".to_string()));
    }

    #[test]
    fn token_found_inside_array() {
        let body = json!([{ "meta": [ { "TOKEN": "xyz" } ] }]);
        assert_eq!(extract_auth_token(&body), Some("xyz".to_string()));
    }

    #[test]
    fn token_absent() {
        assert_eq!(extract_auth_token(&json!({ "token": 42 })), None);
        assert_eq!(extract_auth_token(&json!("token")), None);
    }

    #[test]
    fn attempts_order() {
        assert_eq!(
            authorization_attempts(Some("abc")),
            vec![Some("Bearer abc".to_string()), Some("abc".to_string()), None]
        );
        assert_eq!(
            authorization_attempts(Some("bearer abc")),
            vec![Some("bearer abc".to_string()), Some("bearer abc".to_string()), None]
        );
        assert_eq!(authorization_attempts(None), vec![None]);
    }

    #[test]
    fn parses_and_normalizes_sites() {
        let raw = r#"{
            "responseDataValue": [
                { "name": "JKT-001", "region": "Jabodetabek", "status": "NORMAL",
                  "longitude": 106.8, "latitude": "-6.2", "tenantId": 12 },
                { "name": "SBY-002", "region": "Jatim", "status": "NOT INSTALLED" },
                { "name": "MDN-003", "status": "Critical" },
                { "name": "BDG-004", "status": "UNKNOWN" },
                { "region": "Bali", "status": "NORMAL" },
                "garbage"
            ]
        }"#;

        let sites = parse_sites(raw).unwrap();
        assert_eq!(sites.len(), 4);
        assert_eq!(sites[0].longitude, Some(106.8));
        assert_eq!(sites[0].latitude, Some(-6.2));
        assert_eq!(sites[0].tenant_id.as_deref(), Some("12"));
        assert_eq!(sites[1].status, "CRITICAL");
        assert_eq!(sites[2].status, "CRITICAL");
        assert_eq!(sites[3].name, None);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(parse_sites("<html>"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn wrong_shape_is_a_schema_error() {
        assert!(matches!(parse_sites("{}"), Err(SourceError::Schema(_))));
        assert!(matches!(
            parse_sites(r#"{"responseDataValue": {}}"#),
            Err(SourceError::Schema(_))
        ));
        assert!(matches!(parse_sites("[]"), Err(SourceError::Schema(_))));
    }
}
