//! Application configuration.
//!
//! Constants describe the hosted backend's layout; [`Config`] carries the
//! per-deployment values loaded from the environment (or a `.env` file).

use std::env;

use crate::error::ConfigError;

/// Path of the serverless function that parses and validates workbooks.
pub const UPLOAD_FUNCTION_PATH: &str = "/functions/v1/bulletin-pricing-upload";

/// REST path of the table holding row-level validation errors.
pub const ERRORS_TABLE_PATH: &str = "/rest/v1/bulletin_upload_errors";

/// Only workbooks with this extension are accepted.
pub const ALLOWED_EXTENSION: &str = ".xlsx";

/// MIME type sent with the workbook part.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Number of error groups shown in the summary view.
pub const SUMMARY_LIMIT: usize = 5;

/// Example values kept per error group.
pub const MAX_EXAMPLES: usize = 3;

/// Notice channel capacity.
pub const NOTICE_CAPACITY: usize = 100;

/// Sheet naming convention communicated to users before an upload.
pub const SHEET_NAME_HINT: &str =
    "Sheets must be named PROGRAMCODE_PRICINGTYPE (e.g. PROG001_LEASE)";

/// Environment variable holding the backend base URL.
pub const ENV_URL: &str = "SUPABASE_URL";

/// Environment variable holding the public API key.
pub const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// Environment variable holding the signed-in user's access token.
pub const ENV_ACCESS_TOKEN: &str = "SUPABASE_ACCESS_TOKEN";

/// Deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL, without trailing slash.
    pub base_url: String,
    /// Public API key sent as `apikey`, when the backend requires it.
    pub anon_key: Option<String>,
    /// Access token of the signed-in user.
    pub access_token: Option<String>,
}

impl Config {
    /// Build a config, validating and normalizing the base URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            base_url: base_url.to_string(),
            anon_key: None,
            access_token: None,
        })
    }

    /// Load from `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `SUPABASE_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let url = env::var(ENV_URL).map_err(|_| ConfigError::Missing(ENV_URL))?;
        let mut config = Self::new(&url)?;
        config.anon_key = non_empty(env::var(ENV_ANON_KEY).ok());
        config.access_token = non_empty(env::var(ENV_ACCESS_TOKEN).ok());
        Ok(config)
    }

    pub fn with_anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = non_empty(Some(key.into()));
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = non_empty(Some(token.into()));
        self
    }

    /// Full URL of the upload function.
    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, UPLOAD_FUNCTION_PATH)
    }

    /// Full URL of the error records table.
    pub fn errors_url(&self) -> String {
        format!("{}{}", self.base_url, ERRORS_TABLE_PATH)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
