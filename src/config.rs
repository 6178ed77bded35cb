//! Runtime configuration, resolved once at startup and injected into the
//! capabilities.
//!
//! - `KimaiConfig`: API base URL and bearer token (`KIMAI_API_URL`, `KIMAI_API_TOKEN`)
//! - `ServerConfig`: default repository plus subprocess/HTTP timeouts

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const KIMAI_API_URL: &str = "KIMAI_API_URL";
pub const KIMAI_API_TOKEN: &str = "KIMAI_API_TOKEN";

pub const DEFAULT_GIT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct KimaiConfig {
    pub base_url: String,
    pub token: String,
}

impl KimaiConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Reads both variables from the process environment.
    ///
    /// Returns `None` when either one is unset or blank.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let base_url = non_blank(KIMAI_API_URL)?;
        let token = non_blank(KIMAI_API_TOKEN)?;
        Some(Self::new(base_url.trim(), token.trim()))
    }

    pub fn timesheets_url(&self) -> String {
        format!("{}/timesheets", self.base_url)
    }
}

impl fmt::Debug for KimaiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KimaiConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Repository used when a call omits `repo_path`
    pub default_repo: PathBuf,
    pub git_timeout: Duration,
    pub http_timeout: Duration,
    pub kimai: Option<KimaiConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_repo: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            git_timeout: Duration::from_secs(DEFAULT_GIT_TIMEOUT_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            kimai: None,
        }
    }
}
