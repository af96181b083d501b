// src/config.rs
use chrono::Utc;
use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use toml;

pub const DEFAULT_DATE_FORMAT: &str = "%b %-d, %Y";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the movieapp_* keys live. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    pub theme: Option<String>,
    /// Exposes the full-reset command outside debug builds.
    #[serde(default)]
    pub debug_tools: bool,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            theme: None,
            debug_tools: false,
            date_format: default_date_format(),
        }
    }
}

impl Config {
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match project_dirs() {
            Some(dirs) => dirs.data_dir().to_path_buf(),
            None => {
                warn!("Could not determine data directory. Using ./reelnote-data");
                PathBuf::from("reelnote-data")
            }
        }
    }

    /// Debug builds always get the reset hook; release builds only on opt-in.
    pub fn debug_tools_enabled(&self) -> bool {
        cfg!(debug_assertions) || self.debug_tools
    }

    pub fn is_dark(&self) -> bool {
        self.theme.as_deref() != Some("light")
    }
}

/// Renders today's date with `format`. Unknown specifiers and time-only
/// fields such as `%H` both make the write fail.
fn is_valid_date_format(format: &str) -> bool {
    let mut rendered = String::new();
    write!(rendered, "{}", Utc::now().date_naive().format(format)).is_ok()
}

/// A bad `date_format` would fail at render time, so swap it for the default.
fn sanitize(mut config: Config) -> Config {
    if !is_valid_date_format(&config.date_format) {
        warn!(
            "Invalid date_format {:?} in config. Using {:?}",
            config.date_format, DEFAULT_DATE_FORMAT
        );
        config.date_format = default_date_format();
    }
    config
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "Reelnote", "Reelnote")
}

fn get_config_path() -> Option<PathBuf> {
    project_dirs().map(|proj_dirs| proj_dirs.config_dir().join("reelnote_config.toml"))
}

fn save_default_config(config_path: &Path, config: &Config) -> Result<(), String> {
    info!("Attempting to save default config to {:?}", config_path);
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)
                .map_err(|e| format!("Failed to create config directory {:?}: {}", parent_dir, e))?;
            info!("Created config directory: {:?}", parent_dir);
        }
    }

    let toml_string = toml::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize default config to TOML: {}", e))?;

    let mut file = fs::File::create(config_path)
        .map_err(|e| format!("Failed to create default config file {:?}: {}", config_path, e))?;

    file.write_all(toml_string.as_bytes())
        .map_err(|e| format!("Failed to write default config to {:?}: {}", config_path, e))?;

    info!("Saved default configuration to {:?}", config_path);
    Ok(())
}

fn load_config_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!(
            "Config file not found at {:?}. Creating and using default configuration.",
            config_path
        );
        let default_config = Config::default();
        if let Err(e) = save_default_config(config_path, &default_config) {
            warn!("Failed to save default configuration: {}", e);
        }
        return default_config;
    }

    info!("Loading configuration from {:?}", config_path);
    match fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(loaded_config) => {
                info!("Configuration loaded successfully.");
                sanitize(loaded_config)
            }
            Err(e) => {
                warn!(
                    "Failed to parse config file at {:?}: {}. Using default configuration.",
                    config_path, e
                );
                Config::default()
            }
        },
        Err(e) => {
            warn!(
                "Failed to read config file at {:?}: {}. Using default configuration.",
                config_path, e
            );
            Config::default()
        }
    }
}

pub fn load_config() -> Config {
    match get_config_path() {
        Some(config_path) => load_config_from(&config_path),
        None => {
            warn!("Could not determine config directory. Using default configuration.");
            Config::default()
        }
    }
}
