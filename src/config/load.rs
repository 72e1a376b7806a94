use std::{env, path::PathBuf};

use super::schema::{CatalogSettings, Settings};

/// Credentials handed to the catalog client at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `BPM_TAGGER__`) override it, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("BPM_TAGGER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.catalog.timeout_secs == 0 {
            return Err("catalog.timeout_secs must be >= 1".to_string());
        }
        if self.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("library.extensions must name at least one extension".to_string());
        }
        if self.library.max_depth == Some(0) {
            return Err("library.max_depth must be >= 1 when set".to_string());
        }
        Ok(())
    }
}

impl CatalogSettings {
    /// Resolve client credentials, preferring configured values over the
    /// `SPOTIPY_CLIENT_ID` / `SPOTIPY_CLIENT_SECRET` environment variables.
    pub fn credentials(&self) -> Option<Credentials> {
        let pick = |configured: &Option<String>, var: &str| {
            configured
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .or_else(|| {
                    env::var(var)
                        .ok()
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                })
        };

        Some(Credentials {
            client_id: pick(&self.client_id, "SPOTIPY_CLIENT_ID")?,
            client_secret: pick(&self.client_secret, "SPOTIPY_CLIENT_SECRET")?,
        })
    }
}

/// Resolve the config path from `BPM_TAGGER_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("BPM_TAGGER_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/bpm-tagger/config.toml`
/// or `~/.config/bpm-tagger/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("bpm-tagger").join("config.toml"))
}
