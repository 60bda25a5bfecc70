use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Environment variable that forces the build profile at runtime.
pub const PROFILE_ENV: &str = "SOLO_SHELL_ENV";

/// Geometry and title used when the main window has to be created.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Solo Shell".to_string(),
            width: 1024.0,
            height: 720.0,
            min_width: 640.0,
            min_height: 480.0,
        }
    }
}

/// Configuration structure for the application.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Settings for the main window.
    pub window: WindowSettings,
    /// Whether production builds check for updates at startup.
    pub auto_update: bool,
    /// Overrides the profile's default log level (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            auto_update: true,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Parses the configured log level, ignoring values `log` does not recognise.
    pub fn log_level_filter(&self) -> Option<log::LevelFilter> {
        self.log_level
            .as_deref()
            .and_then(|level| level.trim().parse().ok())
    }
}

/// State wrapper for the application configuration.
pub struct ConfigState(pub Mutex<AppConfig>);

/// Whether the shell runs with developer tooling or as a shipped build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProfile {
    Development,
    Production,
}

impl BuildProfile {
    /// Resolves the profile from `SOLO_SHELL_ENV`, falling back to `debug_assertions`.
    pub fn detect() -> Self {
        Self::from_env_value(std::env::var(PROFILE_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("development") | Some("dev") => BuildProfile::Development,
            Some("production") | Some("prod") => BuildProfile::Production,
            _ if cfg!(debug_assertions) => BuildProfile::Development,
            _ => BuildProfile::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == BuildProfile::Development
    }
}

/// Resolves the path to the configuration file.
///
/// Attempts to locate `config.json` in the same directory as the executable.
/// Defaults to `config.json` in the current working directory if the executable path cannot be determined.
fn get_config_path() -> PathBuf {
    std::env::current_exe()
        .map(|p| p.parent().unwrap_or(Path::new(".")).join("config.json"))
        .unwrap_or_else(|_| PathBuf::from("config.json"))
}

/// Where the loaded configuration came from.
///
/// Loading happens before the logger is installed, so the outcome is kept and
/// reported once logging is up.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Missing(PathBuf),
    Invalid { path: PathBuf, reason: String },
}

impl ConfigSource {
    /// Writes the load outcome to the log.
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => log::info!("Configuration loaded from {:?}", path),
            ConfigSource::Missing(path) => {
                log::info!("Configuration file {:?} not found, using defaults", path)
            }
            ConfigSource::Invalid { path, reason } => log::error!(
                "Configuration file {:?} is invalid, using defaults: {}",
                path,
                reason
            ),
        }
    }
}

/// Loads configuration from a specific file path.
///
/// Returns `AppConfig::default()` if the file does not exist or cannot be parsed.
/// Fields missing from the file take their default values.
pub fn load_config_from_path(path: &Path) -> (AppConfig, ConfigSource) {
    if !path.exists() {
        return (AppConfig::default(), ConfigSource::Missing(path.to_path_buf()));
    }
    let parsed = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read configuration file: {}", e))
        .and_then(|content| {
            serde_json::from_str::<AppConfig>(&content)
                .map_err(|e| format!("Failed to parse configuration: {}", e))
        });
    match parsed {
        Ok(config) => (config, ConfigSource::File(path.to_path_buf())),
        Err(reason) => (
            AppConfig::default(),
            ConfigSource::Invalid {
                path: path.to_path_buf(),
                reason,
            },
        ),
    }
}

/// Loads the initial configuration from the default location.
pub fn load_initial_config() -> (AppConfig, ConfigSource) {
    load_config_from_path(&get_config_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Tests loading configuration from an existing file.
    #[test]
    fn test_load_config_from_path_existing() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("config.json");
        let config = AppConfig {
            window: WindowSettings {
                title: "Custom".to_string(),
                ..WindowSettings::default()
            },
            auto_update: false,
            log_level: Some("debug".to_string()),
        };
        let json = serde_json::to_string(&config).unwrap();
        fs::write(&config_path, json).expect("failed to write config");

        let (loaded, source) = load_config_from_path(&config_path);
        assert_eq!(loaded, config);
        assert_eq!(source, ConfigSource::File(config_path));
    }

    /// Tests loading configuration from a missing file returns default.
    #[test]
    fn test_load_config_from_path_missing() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("missing.json");

        let (loaded, source) = load_config_from_path(&config_path);
        assert_eq!(loaded, AppConfig::default());
        assert_eq!(source, ConfigSource::Missing(config_path));
    }

    /// Tests that an unparseable file falls back to defaults.
    #[test]
    fn test_load_config_from_path_corrupt() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "{ not json").expect("failed to write config");

        let (loaded, source) = load_config_from_path(&config_path);
        assert_eq!(loaded, AppConfig::default());
        match source {
            ConfigSource::Invalid { path, reason } => {
                assert_eq!(path, config_path);
                assert!(reason.starts_with("Failed to parse configuration"));
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    /// Tests that fields absent from the file keep their defaults.
    #[test]
    fn test_load_config_partial_file_uses_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, r#"{"window":{"width":800.0}}"#).expect("failed to write config");

        let (loaded, _) = load_config_from_path(&config_path);
        assert_eq!(loaded.window.width, 800.0);
        assert_eq!(loaded.window.height, WindowSettings::default().height);
        assert!(loaded.auto_update);
        assert!(loaded.log_level.is_none());
    }

    #[test]
    fn test_log_level_filter_parsing() {
        let mut config = AppConfig::default();
        assert_eq!(config.log_level_filter(), None);

        config.log_level = Some("Warn".to_string());
        assert_eq!(config.log_level_filter(), Some(log::LevelFilter::Warn));

        config.log_level = Some("loud".to_string());
        assert_eq!(config.log_level_filter(), None);
    }

    /// Tests that explicit profile values win over the compile-time default.
    #[test]
    fn test_build_profile_from_env_value() {
        assert_eq!(
            BuildProfile::from_env_value(Some("development")),
            BuildProfile::Development
        );
        assert_eq!(
            BuildProfile::from_env_value(Some(" production ")),
            BuildProfile::Production
        );

        let fallback = if cfg!(debug_assertions) {
            BuildProfile::Development
        } else {
            BuildProfile::Production
        };
        assert_eq!(BuildProfile::from_env_value(None), fallback);
        assert_eq!(BuildProfile::from_env_value(Some("staging")), fallback);
    }
}
