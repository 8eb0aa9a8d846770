use anyhow::{Context, anyhow};
use chrono::NaiveDateTime;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt::Write as _, fs, path::PathBuf, time::Duration};

use crate::error::{Result, YrError};

pub const DEFAULT_BASE_URL: &str = "http://www.yr.no";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Options for a [`YrClient`](crate::YrClient).
///
/// Example TOML:
/// cache_ttl_seconds = 3600
/// cache_directory = "/var/cache/yr"
/// date_format = "%d.%m.%Y %H:%M"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub cache_ttl_seconds: u64,
    /// Caching is disabled when absent.
    pub cache_directory: Option<PathBuf>,
    /// chrono strftime pattern used for sunrise/sunset.
    pub date_format: String,
    pub timeout_seconds: u64,
    pub base_url: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 3600,
            cache_directory: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            timeout_seconds: 10,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientOptions {
    pub fn with_cache_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_directory = Some(dir.into());
        self
    }

    pub fn with_cache_ttl(mut self, secs: u64) -> Self {
        self.cache_ttl_seconds = secs;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Point the client at a different host (mirrors, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn validate(&self) -> Result<()> {
        validate_date_format(&self.date_format)
    }
}

/// Reject strftime patterns chrono cannot render for a feed timestamp.
///
/// Feed timestamps carry no offset, so `%z`, `%:z` and `%Z` are refused along
/// with malformed specifiers.
pub fn validate_date_format(format: &str) -> Result<()> {
    format_timestamp(NaiveDateTime::default(), format).map(drop)
}

/// Format `time` with a strftime pattern.
pub fn format_timestamp(time: NaiveDateTime, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", time.format(format))
        .map_err(|_| YrError::InvalidDateFormat(format.to_string()))?;
    Ok(out)
}

/// Configuration stored on disk for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Location used when no URL is given on the command line.
    pub default_url: Option<String>,

    /// Example TOML:
    /// [client]
    /// cache_directory = "/home/me/.cache/yr"
    #[serde(default)]
    pub client: ClientOptions,
}

impl Config {
    /// Return the default URL, or a hint on how to set one.
    pub fn default_url(&self) -> anyhow::Result<&str> {
        self.default_url.as_deref().ok_or_else(|| {
            anyhow!(
                "No location given and no default location configured.\n\
                 Hint: pass a yr.no URL or run `yr configure` first."
            )
        })
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.client.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> anyhow::Result<ProjectDirs> {
        ProjectDirs::from("no", "yr-client", "yr")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> anyhow::Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Platform cache directory, offered as the default by `yr configure`.
    pub fn default_cache_dir() -> anyhow::Result<PathBuf> {
        Ok(Self::project_dirs()?.cache_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_documented_values() {
        let opts = ClientOptions::default();
        assert_eq!(opts.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(opts.cache_directory, None);
        assert_eq!(opts.date_format, "%Y-%m-%d %H:%M:%S");
        assert_eq!(opts.timeout(), Duration::from_secs(10));
        assert_eq!(opts.base_url, "http://www.yr.no");
    }

    #[test]
    fn omitted_and_unknown_keys() {
        let cfg = Config::from_toml(
            r#"
            default_url = "/sted/Norge/Oslo/Oslo/Oslo"
            colour_scheme = "dark"

            [client]
            cache_ttl_seconds = 60
            unknown = true
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.default_url().unwrap(), "/sted/Norge/Oslo/Oslo/Oslo");
        assert_eq!(cfg.client.cache_ttl_seconds, 60);
        assert_eq!(cfg.client.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(cfg.client.cache_directory, None);
    }

    #[test]
    fn invalid_date_format_is_rejected() {
        let err = validate_date_format("%Y-%Q").unwrap_err();
        assert!(matches!(err, YrError::InvalidDateFormat(_)));
        assert!(validate_date_format("%d.%m.%Y %H:%M").is_ok());

        let err = Config::from_toml("[client]\ndate_format = \"%\"").unwrap_err();
        assert!(err.to_string().contains("Invalid date format"));
    }

    #[test]
    fn offset_and_timezone_specifiers_are_rejected() {
        for format in ["%z", "%:z", "%Z", "%Y %Z", "%+"] {
            let err = validate_date_format(format).unwrap_err();
            assert!(matches!(err, YrError::InvalidDateFormat(_)), "{format}");
        }
        assert!(validate_date_format("%a %d %b %H:%M:%S%.3f").is_ok());
    }

    #[test]
    fn format_timestamp_reports_unrenderable_pattern() {
        let t = chrono::NaiveDate::from_ymd_opt(2012, 5, 10)
            .unwrap()
            .and_hms_opt(4, 53, 22)
            .unwrap();

        assert_eq!(format_timestamp(t, "%H:%M").unwrap(), "04:53");
        let err = format_timestamp(t, "%H:%M %z").unwrap_err();
        assert!(matches!(err, YrError::InvalidDateFormat(f) if f == "%H:%M %z"));
    }

    #[test]
    fn default_url_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_url().unwrap_err();
        assert!(err.to_string().contains("Hint: pass a yr.no URL"));
    }

    #[test]
    fn toml_roundtrip_keeps_cache_directory() {
        let cfg = Config {
            default_url: None,
            client: ClientOptions::default().with_cache_directory("/tmp/yr-cache"),
        };
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();
        assert_eq!(back.client, cfg.client);
    }
}
