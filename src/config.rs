//! Runtime configuration.
//!
//! Settings are layered, lowest priority first:
//!
//! 1. built-in defaults ([`Settings::default`])
//! 2. an optional TOML file passed with `--config`
//! 3. `SITEWATCH__*` environment variables (e.g. `SITEWATCH__SISS__USERNAME`)
//! 4. the dashboard's historical credential variables: `LOGIN_USERNAME` /
//!    `LOGIN_PASSWORD` for the tower report, `LOGIN_USERNAME_1` /
//!    `LOGIN_PASSWORD_1` for SISS
//!
//! A `.env` file is loaded into the environment by the binary before this runs.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::data::Timestamp;

const DEFAULT_TOWER_LOGIN_URL: &str = "https://maiviewmitratel.id/Auth/login";
const DEFAULT_TOWER_REPORT_URL: &str = "https://maiviewmitratel.id/get-report";
const DEFAULT_SISS_LOGIN_URL: &str = "https://siss-service.smartsol.id/Auth/login";
const DEFAULT_SISS_REPORT_URL: &str =
    "https://siss-service.smartsol.id/v1/panels/59b7e0f9-2f83-45cb-bde4-a6f4d890022c/panelData";
const DEFAULT_SISS_ORIGIN: &str = "https://mitratel-siss.smartsol.id";
const DEFAULT_SISS_REFERER: &str = "https://mitratel-siss.smartsol.id/";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Tower online/offline report endpoints and credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct TowerSettings {
    pub login_url: String,
    pub report_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// SISS site-status API endpoints, browser headers and credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct SissSettings {
    pub login_url: String,
    pub report_url: String,
    pub origin: String,
    pub referer: String,
    pub user_agent: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Complete application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub tower: TowerSettings,
    pub siss: SissSettings,
    /// Fixed offset used for every displayed and recorded time (WIB = 7).
    pub utc_offset_hours: i32,
    /// HTTP request timeout as a duration string ("10s", "2500ms").
    pub timeout: String,
    /// Length of the default SISS date range, ending today.
    pub default_range_days: i64,
    /// Directory export files are written to.
    pub export_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tower: TowerSettings {
                login_url: DEFAULT_TOWER_LOGIN_URL.to_string(),
                report_url: DEFAULT_TOWER_REPORT_URL.to_string(),
                username: None,
                password: None,
            },
            siss: SissSettings {
                login_url: DEFAULT_SISS_LOGIN_URL.to_string(),
                report_url: DEFAULT_SISS_REPORT_URL.to_string(),
                origin: DEFAULT_SISS_ORIGIN.to_string(),
                referer: DEFAULT_SISS_REFERER.to_string(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
                username: None,
                password: None,
            },
            utc_offset_hours: 7,
            timeout: "10s".to_string(),
            default_range_days: 7,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("tower.login_url", defaults.tower.login_url)?
            .set_default("tower.report_url", defaults.tower.report_url)?
            .set_default("siss.login_url", defaults.siss.login_url)?
            .set_default("siss.report_url", defaults.siss.report_url)?
            .set_default("siss.origin", defaults.siss.origin)?
            .set_default("siss.referer", defaults.siss.referer)?
            .set_default("siss.user_agent", defaults.siss.user_agent)?
            .set_default("utc_offset_hours", i64::from(defaults.utc_offset_hours))?
            .set_default("timeout", defaults.timeout)?
            .set_default("default_range_days", defaults.default_range_days)?
            .set_default("export_dir", defaults.export_dir.to_string_lossy().to_string())?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("SITEWATCH").separator("__"))
            .set_override_option("tower.username", env::var("LOGIN_USERNAME").ok())?
            .set_override_option("tower.password", env::var("LOGIN_PASSWORD").ok())?
            .set_override_option("siss.username", env::var("LOGIN_USERNAME_1").ok())?
            .set_override_option("siss.password", env::var("LOGIN_PASSWORD_1").ok())?
            .build()
            .context("Failed to assemble configuration")?;

        let settings: Settings =
            config.try_deserialize().context("Invalid configuration values")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        FixedOffset::east_opt(self.utc_offset_hours.saturating_mul(3600)).with_context(|| {
            format!("utc_offset_hours out of range: {}", self.utc_offset_hours)
        })?;
        parse_duration(&self.timeout)
            .with_context(|| format!("Invalid timeout: {}", self.timeout))?;
        if self.default_range_days < 0 {
            anyhow::bail!("default_range_days must not be negative");
        }
        Ok(())
    }

    /// The configured display offset.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours.saturating_mul(3600))
            .unwrap_or_else(|| Utc.fix())
    }

    /// Current time in the configured offset.
    pub fn now(&self) -> Timestamp {
        Utc::now().with_timezone(&self.offset())
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        parse_duration(&self.timeout).unwrap_or(Duration::from_secs(10))
    }
}
