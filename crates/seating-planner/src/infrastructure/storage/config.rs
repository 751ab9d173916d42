//! TOML-based configuration persistence for the planner.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\SeatingPlanner\config.toml`
//! - Linux:    `~/.config/seatingplanner/config.toml`
//! - macOS:    `~/Library/Application Support/SeatingPlanner/config.toml`
//!
//! ```toml
//! [planner]
//! log_level = "debug"
//!
//! [canvas]
//! grid_snap = 20.0
//!
//! [tables]
//! default_shape = "rectangular"
//! default_capacity = 10
//!
//! [storage]
//! plan_file = "/home/me/wedding.json"
//! ```
//!
//! Every field has a `#[serde(default = "...")]`, so a partial file, or no
//! file at all, yields a usable configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use seating_core::TableShape;

use crate::application::assignment::{EngineLimits, DEFAULT_MAX_CAPACITY};
use crate::application::interaction::InteractionSettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub tables: TablesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// General planner settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    /// Schema version string; bump when breaking changes are introduced.
    #[serde(default = "default_version")]
    pub version: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Canvas size and drag behaviour.  Moved tables stay within the canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: f64,
    #[serde(default = "default_canvas_height")]
    pub height: f64,
    /// Grid size dragged tables snap to.  `0` turns snapping off.
    #[serde(default)]
    pub grid_snap: f64,
}

/// Defaults and limits for new tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TablesConfig {
    #[serde(default)]
    pub default_shape: TableShape,
    #[serde(default = "default_capacity")]
    pub default_capacity: usize,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: usize,
}

/// Where the plan is read from and written to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// JSON plan file.  Absent means "start with an empty plan".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_file: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_version() -> String {
    "1.0".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_canvas_width() -> f64 {
    1600.0
}
fn default_canvas_height() -> f64 {
    1000.0
}
fn default_capacity() -> usize {
    8
}
fn default_max_capacity() -> usize {
    DEFAULT_MAX_CAPACITY
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            log_level: default_log_level(),
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            grid_snap: 0.0,
        }
    }
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            default_shape: TableShape::default(),
            default_capacity: default_capacity(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl AppConfig {
    /// Limits the assignment engine enforces.
    pub fn engine_limits(&self) -> EngineLimits {
        EngineLimits {
            max_capacity: self.tables.max_capacity,
        }
    }

    /// Settings the layout controller needs.
    pub fn interaction_settings(&self) -> InteractionSettings {
        InteractionSettings {
            default_shape: self.tables.default_shape,
            default_capacity: self.tables.default_capacity,
            grid_snap: self.canvas.grid_snap.max(0.0),
            canvas_width: self.canvas.width.max(0.0),
            canvas_height: self.canvas.height.max(0.0),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to the platform config file.
///
/// # Errors
///
/// See [`save_config_to`].
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &config_file_path()?)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory, including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("SeatingPlanner"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("seatingplanner"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("SeatingPlanner")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("seating_cfg_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    // ── AppConfig defaults ────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_table_settings() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.tables.default_shape, TableShape::Round);
        assert_eq!(cfg.tables.default_capacity, 8);
        assert_eq!(cfg.tables.max_capacity, 24);
    }

    #[test]
    fn test_app_config_default_canvas_has_snapping_off() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.canvas.width, 1600.0);
        assert_eq!(cfg.canvas.height, 1000.0);
        assert_eq!(cfg.canvas.grid_snap, 0.0);
    }

    #[test]
    fn test_planner_config_default_log_level_is_info() {
        assert_eq!(PlannerConfig::default().log_level, "info");
    }

    #[test]
    fn test_engine_limits_and_settings_follow_config() {
        let mut cfg = AppConfig::default();
        cfg.tables.max_capacity = 12;
        cfg.tables.default_shape = TableShape::Oval;
        cfg.canvas.grid_snap = -5.0;
        cfg.canvas.width = 2400.0;
        cfg.canvas.height = -1.0;

        assert_eq!(cfg.engine_limits().max_capacity, 12);
        let settings = cfg.interaction_settings();
        assert_eq!(settings.default_shape, TableShape::Oval);
        assert_eq!(settings.grid_snap, 0.0, "negative grid must disable snapping");
        assert_eq!(settings.canvas_width, 2400.0);
        assert_eq!(settings.canvas_height, 0.0);
    }

    // ── TOML parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_tables_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[tables]
default_shape = "square"
default_capacity = 4
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.tables.default_shape, TableShape::Square);
        assert_eq!(cfg.tables.default_capacity, 4);
        // Unspecified fields keep their defaults
        assert_eq!(cfg.tables.max_capacity, 24);
        assert_eq!(cfg.planner.log_level, "info");
    }

    #[test]
    fn test_deserialize_unknown_shape_returns_parse_error() {
        let result: Result<AppConfig, toml::de::Error> =
            toml::from_str("[tables]\ndefault_shape = \"hexagon\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_plan_file_is_omitted_from_toml() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(!toml_str.contains("plan_file"), "None plan_file must be omitted");
    }

    // ── load / save ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_config_from_missing_file_returns_default() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");
        let cfg = load_config_from(&path).expect("missing file is not an error");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_load_config_from_malformed_file_returns_parse_error() {
        let dir = temp_dir();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = load_config_from(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.planner.log_level = "debug".to_string();
        cfg.canvas.grid_snap = 10.0;
        cfg.storage.plan_file = Some(dir.join("plan.json"));

        // Act
        save_config_to(&cfg, &path).expect("save");
        let loaded = load_config_from(&path).expect("load");

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    // ── config_dir path formation ─────────────────────────────────────────────

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
        // NoPlatformConfigDir is acceptable in a stripped CI environment.
    }
}
