//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Working directory for snapshots and final rasters of a run.
    pub output_dir: PathBuf,

    /// Root of the background layout (`{base_images_dir}/{campaign}/...`).
    pub base_images_dir: PathBuf,

    /// Directory whose templates replace the built-in ones.
    pub templates_dir: Option<PathBuf>,

    /// File holding the user-editable dropdown option lists.
    pub option_catalog: PathBuf,

    /// Notice rendered on the expiry variants.
    pub expiry_text: String,

    /// Headless browser settings.
    pub capture: CaptureSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Headless browser launch and settle parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Explicit browser binary; auto-detected when unset.
    pub browser_executable: Option<PathBuf>,

    /// How long to wait for the browser process to come up.
    pub launch_timeout_ms: u64,

    /// Upper bound on the document readiness wait.
    pub ready_timeout_ms: u64,

    /// Interval between readiness probes.
    pub poll_interval_ms: u64,

    /// Fixed delay after readiness before the snapshot is taken.
    pub settle_delay_ms: u64,

    /// Run Chromium with its sandbox enabled.
    pub sandbox: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "promokit=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

pub const DEFAULT_EXPIRY_TEXT: &str = "*Offer Expire today midnight*";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            base_images_dir: PathBuf::from("base_images"),
            templates_dir: None,
            option_catalog: PathBuf::from("dropdown_config.json"),
            expiry_text: DEFAULT_EXPIRY_TEXT.to_string(),
            capture: CaptureSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            browser_executable: None,
            launch_timeout_ms: 30_000,
            ready_timeout_ms: 10_000,
            poll_interval_ms: 50,
            settle_delay_ms: 500,
            sandbox: false,
        }
    }
}

impl CaptureSettings {
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("promokit").join("config.json")
}
