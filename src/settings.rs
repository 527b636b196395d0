use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const SETTINGS_DIR: &str = ".projdesk";
const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_API_URL: &str = "https://examenfinalapi-uqeu.onrender.com";
pub const API_URL_ENV: &str = "PROJDESK_API_URL";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Settings {
    /// Reads `.projdesk/settings.json` from `std::env::current_dir()`.
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        Self::load_from(std::env::current_dir().ok())
    }

    fn load_from(cwd: Option<PathBuf>) -> Result<Self> {
        let Some(cwd) = cwd else {
            return Ok(Self::default());
        };
        let path = Self::path_in(&cwd);
        let Ok(data) = fs::read_to_string(&path) else {
            return Ok(Self::default());
        };
        serde_json::from_str(&data)
            .with_context(|| format!("malformed settings file {}", path.display()))
    }

    /// The `.projdesk/` directory under `dir`. Also holds the log file.
    pub fn dir_in(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_DIR)
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        Self::dir_in(dir).join(SETTINGS_FILE)
    }

    /// Writes these settings under `dir`, creating `.projdesk/` if needed.
    pub fn save_to(&self, dir: &Path) -> std::io::Result<()> {
        let settings_dir = Self::dir_in(dir);
        fs::create_dir_all(&settings_dir)?;

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(settings_dir.join(SETTINGS_FILE), json.as_bytes())
    }

    /// Base URL precedence: CLI flag, then `PROJDESK_API_URL`, then the
    /// settings file, then the built-in default.
    pub fn resolve_api_url(&self, flag: Option<&str>) -> String {
        self.resolve_api_url_with(flag, std::env::var(API_URL_ENV).ok())
    }

    fn resolve_api_url_with(&self, flag: Option<&str>, env: Option<String>) -> String {
        flag.map(str::to_string)
            .or(env)
            .or_else(|| self.api_base_url.clone())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
