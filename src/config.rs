//! Portal configuration.
//!
//! Built from defaults, an optional JSON settings file and `PORTAL_*`
//! environment variables (a `.env` file is honored), in that order.

use crate::error::AppError;
use crate::services::api_client::PortalClientConfig;
use crate::services::debounce::DEFAULT_SEARCH_DEBOUNCE_MS;
use crate::services::pagination::PAGE_SIZE_OPTIONS;
use crate::services::session::{Role, Session};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
    pub search_debounce_ms: u64,
    pub session: Session,
}

/// Settings file layout. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SettingsFile {
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
    page_size: Option<u32>,
    search_debounce_ms: Option<u64>,
    session: SessionSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SessionSettings {
    account_id: Option<String>,
    token: Option<String>,
    role: Option<String>,
    account_status: Option<String>,
}

impl PortalConfig {
    /// Load configuration.
    ///
    /// # Arguments
    /// * `path` - Settings file; when `None`, `settings.json` is used if present
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let settings = match path {
            Some(path) => read_settings(path)?,
            None if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
                read_settings(Path::new(DEFAULT_SETTINGS_FILE))?
            }
            None => SettingsFile::default(),
        };

        Self::resolve(settings, |key| env::var(key).ok())
    }

    /// Load from a settings file and an explicit variable lookup.
    pub fn from_file_and_vars(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        Self::resolve(read_settings(path)?, lookup)
    }

    fn resolve(
        settings: SettingsFile,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = var("PORTAL_API_URL")
            .or(settings.api_base_url)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                AppError::configuration("API base URL is not set (PORTAL_API_URL or apiBaseUrl)")
            })?;

        let timeout_secs = match var("PORTAL_TIMEOUT_SECS") {
            Some(raw) => parse_number("PORTAL_TIMEOUT_SECS", &raw)?,
            None => settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let page_size = match var("PORTAL_PAGE_SIZE") {
            Some(raw) => parse_number("PORTAL_PAGE_SIZE", &raw)?,
            None => settings.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(AppError::configuration(format!(
                "page size {} is not one of {:?}",
                page_size, PAGE_SIZE_OPTIONS
            )));
        }

        let search_debounce_ms = match var("PORTAL_SEARCH_DEBOUNCE_MS") {
            Some(raw) => parse_number("PORTAL_SEARCH_DEBOUNCE_MS", &raw)?,
            None => settings
                .search_debounce_ms
                .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS),
        };

        let account_id = var("PORTAL_ACCOUNT_ID")
            .or(settings.session.account_id)
            .unwrap_or_default();
        let token = var("PORTAL_TOKEN").or(settings.session.token).unwrap_or_default();
        let role: Role = var("PORTAL_ROLE")
            .or(settings.session.role)
            .unwrap_or_else(|| "linker".to_string())
            .parse()
            .map_err(|e: AppError| AppError::configuration(e.to_string()))?;

        let mut session = Session::new(account_id, token, role)
            .map_err(|e| AppError::configuration(e.to_string()))?;
        if let Some(status) = var("PORTAL_ACCOUNT_STATUS").or(settings.session.account_status) {
            session = session.with_account_status(status);
        }

        Ok(Self {
            api_base_url,
            timeout_secs,
            page_size,
            search_debounce_ms,
            session,
        })
    }

    /// HTTP client settings for this configuration.
    pub fn client_config(&self) -> PortalClientConfig {
        PortalClientConfig {
            base_url: self.api_base_url.clone(),
            token: self.session.token.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn read_settings(path: &Path) -> Result<SettingsFile, AppError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::configuration(format!("Failed to read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        AppError::configuration(format!("Invalid settings in {}: {}", path.display(), e))
    })
}

fn parse_number<N: std::str::FromStr>(key: &str, raw: &str) -> Result<N, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::configuration(format!("{} must be a number, got '{}'", key, raw)))
}
