//! Configuration settings for Flaretion.

use crate::source::DataSourceKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `api.base_url` after every other source.
pub const BASE_URL_ENV: &str = "API_BASE_URL";

/// Prefix for layered environment overrides (`FLARETION__API__TIMEOUT_SECS=5`).
const ENV_PREFIX: &str = "FLARETION";

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API configuration.
    pub api: ApiConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
    /// User preferences shown on the profile screen.
    pub preferences: Preferences,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration.
    ///
    /// Layers, lowest priority first: built-in defaults, the TOML file,
    /// `FLARETION__*` environment variables, then `API_BASE_URL`.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(super::default_config_path);
        let mut config = Self::from_sources(&config_path, true)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        tracing::debug!(path = %config_path.display(), base_url = %config.api.base_url, "configuration loaded");
        Ok(config)
    }

    fn from_sources(path: &Path, with_env: bool) -> crate::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .map_err(|e| crate::Error::config(e.to_string()))?;

        let mut builder = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(path.to_path_buf()).required(false));

        if with_env {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| crate::Error::config(e.to_string()))
    }

    /// Apply the single-variable overrides on top of the layered config.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<PathBuf> {
        let config_path = path.unwrap_or_else(super::default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        tracing::info!(path = %config_path.display(), "configuration saved");
        Ok(config_path)
    }
}

/// API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL.
    pub base_url: String,
    /// Request timeout in seconds (0 disables the timeout).
    pub timeout_secs: u64,
    /// Rate limit in requests per second (0 disables limiting).
    pub rate_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 10,
            rate_limit: 10,
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tick rate in milliseconds for UI updates.
    pub tick_rate_ms: u64,
    /// Enable mouse support.
    pub mouse_support: bool,
    /// Auto-refresh interval in seconds (0 to disable).
    pub auto_refresh_secs: u64,
    /// Where screen data comes from.
    pub data_source: DataSourceKind,
    /// Symbol selected at startup.
    pub default_symbol: String,
    /// Kline interval selected at startup.
    pub default_interval: String,
    /// Symbols offered by the selector.
    pub symbols: Vec<String>,
    /// Intervals offered by the selector.
    pub intervals: Vec<String>,
    /// Klines requested per dashboard load.
    pub klines_limit: i64,
    /// Signals requested per load.
    pub signals_limit: i64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            mouse_support: true,
            auto_refresh_secs: 30,
            data_source: DataSourceKind::Live,
            default_symbol: "BTCUSDT".to_string(),
            default_interval: "1".to_string(),
            symbols: ["BTCUSDT", "ETHUSDT", "BNBUSDT", "ADAUSDT"]
                .map(String::from)
                .to_vec(),
            intervals: ["1", "5", "15", "60", "240", "D"]
                .map(String::from)
                .to_vec(),
            klines_limit: 20,
            signals_limit: 10,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub quit: String,
    pub help: String,
    pub up: String,
    pub down: String,
    pub refresh: String,
    pub home: String,
    pub signals: String,
    pub strategy: String,
    pub analysis: String,
    pub profile: String,
    pub next_tab: String,
    pub prev_tab: String,
    /// Cycle the selected symbol.
    pub symbol: String,
    /// Cycle the selected kline interval.
    pub interval: String,
    /// Cycle the signal filter.
    pub filter: String,
    /// Cycle the strategy category.
    pub category: String,
    /// Switch between mock and live data.
    pub toggle_source: String,
    /// Write current settings to disk.
    pub save: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            refresh: "r".to_string(),
            home: "1".to_string(),
            signals: "2".to_string(),
            strategy: "3".to_string(),
            analysis: "4".to_string(),
            profile: "5".to_string(),
            next_tab: "Tab".to_string(),
            prev_tab: "Shift+BackTab".to_string(),
            symbol: "s".to_string(),
            interval: "i".to_string(),
            filter: "f".to_string(),
            category: "c".to_string(),
            toggle_source: "m".to_string(),
            save: "w".to_string(),
        }
    }
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// User preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub language: String,
    pub notifications: bool,
    pub auto_refresh: bool,
    pub debug_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Auto,
            language: "zh-CN".to_string(),
            notifications: true,
            auto_refresh: true,
            debug_mode: false,
        }
    }
}
