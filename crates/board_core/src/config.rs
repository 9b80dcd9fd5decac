use std::{fs, io, path::Path, time::Duration};

use chrono::FixedOffset;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::view::DisplayZone;

pub const DEFAULT_CONFIG_FILE: &str = "board.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSettings {
    pub backend_url: String,
    pub claim_delay_ms: u64,
    pub clock_interval_ms: u64,
    pub notify_timeout_secs: u64,
    pub probe_enabled: bool,
    pub probe_timeout_secs: u64,
    pub keep_alive_secs: u64,
    pub zone_label: String,
    pub zone_name: String,
    pub zone_offset_secs: i32,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8001".into(),
            claim_delay_ms: 30_000,
            clock_interval_ms: 1_000,
            notify_timeout_secs: 10,
            probe_enabled: true,
            probe_timeout_secs: 5,
            keep_alive_secs: 5 * 60,
            zone_label: "SGT".into(),
            zone_name: "Singapore Time".into(),
            zone_offset_secs: 8 * 60 * 60,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend_url: Option<String>,
    claim_delay_ms: Option<u64>,
    clock_interval_ms: Option<u64>,
    notify_timeout_secs: Option<u64>,
    probe_enabled: Option<bool>,
    probe_timeout_secs: Option<u64>,
    keep_alive_secs: Option<u64>,
    zone_label: Option<String>,
    zone_name: Option<String>,
    zone_offset_secs: Option<i32>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid backend url '{url}': {source}")]
    BackendUrl { url: String, source: url::ParseError },
    #[error("backend url must use http or https, got '{0}'")]
    BackendScheme(String),
    #[error("backend url '{0}' must not carry a query or fragment")]
    BackendQuery(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("time zone offset of {0}s is out of range")]
    ZoneOffset(i32),
}

/// Loads settings from `board.toml` in the working directory (when present)
/// and the process environment.
pub fn load_settings() -> Result<BoardSettings, ConfigError> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the config file at `path` if it exists, then environment
/// overrides resolved through `env`.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<BoardSettings, ConfigError> {
    let mut settings = BoardSettings::default();

    match fs::read_to_string(path) {
        Ok(raw) => settings.apply_toml(&raw)?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    }

    settings.apply_env(env);
    settings.validate()?;
    Ok(settings)
}

impl BoardSettings {
    pub fn apply_toml(&mut self, raw: &str) -> Result<(), ConfigError> {
        let file_cfg: FileSettings = toml::from_str(raw)?;

        if let Some(v) = file_cfg.backend_url {
            self.backend_url = v;
        }
        if let Some(v) = file_cfg.claim_delay_ms {
            self.claim_delay_ms = v;
        }
        if let Some(v) = file_cfg.clock_interval_ms {
            self.clock_interval_ms = v;
        }
        if let Some(v) = file_cfg.notify_timeout_secs {
            self.notify_timeout_secs = v;
        }
        if let Some(v) = file_cfg.probe_enabled {
            self.probe_enabled = v;
        }
        if let Some(v) = file_cfg.probe_timeout_secs {
            self.probe_timeout_secs = v;
        }
        if let Some(v) = file_cfg.keep_alive_secs {
            self.keep_alive_secs = v;
        }
        if let Some(v) = file_cfg.zone_label {
            self.zone_label = v;
        }
        if let Some(v) = file_cfg.zone_name {
            self.zone_name = v;
        }
        if let Some(v) = file_cfg.zone_offset_secs {
            self.zone_offset_secs = v;
        }
        Ok(())
    }

    /// Unparseable numeric or boolean values are ignored and keep the
    /// previous setting.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("BOARD_BACKEND_URL") {
            self.backend_url = v;
        }
        if let Some(v) = env("APP__BACKEND_URL") {
            self.backend_url = v;
        }

        if let Some(v) = env("APP__CLAIM_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.claim_delay_ms = v;
        }
        if let Some(v) = env("APP__CLOCK_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            self.clock_interval_ms = v;
        }
        if let Some(v) = env("APP__NOTIFY_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.notify_timeout_secs = v;
        }
        if let Some(v) = env("APP__PROBE_ENABLED").and_then(|v| v.parse().ok()) {
            self.probe_enabled = v;
        }
        if let Some(v) = env("APP__PROBE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.probe_timeout_secs = v;
        }
        if let Some(v) = env("APP__KEEP_ALIVE_SECS").and_then(|v| v.parse().ok()) {
            self.keep_alive_secs = v;
        }

        if let Some(v) = env("APP__ZONE_LABEL") {
            self.zone_label = v;
        }
        if let Some(v) = env("APP__ZONE_NAME") {
            self.zone_name = v;
        }
        if let Some(v) = env("APP__ZONE_OFFSET_SECS").and_then(|v| v.parse().ok()) {
            self.zone_offset_secs = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_base()?;
        if self.clock_interval_ms == 0 {
            return Err(ConfigError::Zero("clock_interval_ms"));
        }
        if self.notify_timeout_secs == 0 {
            return Err(ConfigError::Zero("notify_timeout_secs"));
        }
        if self.probe_enabled && (self.probe_timeout_secs == 0 || self.keep_alive_secs == 0) {
            return Err(ConfigError::Zero("probe_timeout_secs/keep_alive_secs"));
        }
        self.display_zone()?;
        Ok(())
    }

    /// `{backend_url}/api`, appended as a path segment. Bases carrying a
    /// query or fragment are rejected since routes are joined onto the result.
    pub fn api_base(&self) -> Result<String, ConfigError> {
        let raw = self.backend_url.trim();
        let mut url = Url::parse(raw).map_err(|source| ConfigError::BackendUrl {
            url: raw.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::BackendScheme(url.scheme().to_string()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::BackendQuery(raw.to_string()));
        }
        url.path_segments_mut()
            .map_err(|()| ConfigError::BackendScheme(raw.to_string()))?
            .pop_if_empty()
            .push("api");
        Ok(url.to_string())
    }

    pub fn display_zone(&self) -> Result<DisplayZone, ConfigError> {
        let offset = FixedOffset::east_opt(self.zone_offset_secs)
            .ok_or(ConfigError::ZoneOffset(self.zone_offset_secs))?;
        Ok(DisplayZone::new(self.zone_label.clone(), offset).with_name(self.zone_name.clone()))
    }

    pub fn claim_delay(&self) -> Duration {
        Duration::from_millis(self.claim_delay_ms)
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_interval_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
