// Globalhotkeys Settings
// Manager and backend options loaded from TOML

use std::path::{Path, PathBuf};
use std::time::Duration;

use globalhotkeys_core::DEFAULT_STOP_TIMEOUT;

/// Default number of tokio workers when the manager owns its runtime
pub const DEFAULT_WORKER_THREADS: usize = 2;

/// Default poll slice of the evdev message loop, in milliseconds
pub const DEFAULT_POLL_TIMEOUT_MS: i32 = 50;

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// Options for [`crate::HotkeyManager`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Bounded wait for the dedicated message-loop thread on stop
    pub stop_timeout: Duration,
    /// Worker threads of the runtime the manager builds for itself
    pub worker_threads: usize,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            worker_threads: DEFAULT_WORKER_THREADS,
        }
    }
}

/// Options for the evdev hook backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvdevOptions {
    /// Device names or paths to read; empty means autodetect
    pub devices: Vec<String>,
    /// Poll slice of the message loop, in milliseconds
    pub poll_timeout_ms: i32,
    /// Read pointer devices for mouse buttons
    pub include_mice: bool,
}

impl Default for EvdevOptions {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            poll_timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
            include_mice: true,
        }
    }
}

/// User settings.
///
/// Loaded from a TOML file (default: ~/.config/globalhotkeys/settings.toml):
///
/// ```toml
/// [manager]
/// stop_timeout_ms = 5000
/// worker_threads = 2
///
/// [evdev]
/// devices = ["/dev/input/event3"]
/// poll_timeout_ms = 50
/// include_mice = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub manager: ManagerOptions,
    pub evdev: EvdevOptions,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct SettingsToml {
    #[serde(default)]
    manager: Option<ManagerToml>,

    #[serde(default)]
    evdev: Option<EvdevToml>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct ManagerToml {
    #[serde(default)]
    stop_timeout_ms: Option<u64>,

    #[serde(default)]
    worker_threads: Option<usize>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct EvdevToml {
    #[serde(default)]
    devices: Option<Vec<String>>,

    #[serde(default)]
    poll_timeout_ms: Option<i32>,

    #[serde(default)]
    include_mice: Option<bool>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from a TOML string. Absent keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(manager) = toml_settings.manager {
            if let Some(ms) = manager.stop_timeout_ms {
                settings.manager.stop_timeout = Duration::from_millis(ms);
            }
            if let Some(workers) = manager.worker_threads {
                if workers == 0 {
                    return Err(SettingsError::InvalidValue(
                        "manager.worker_threads must be at least 1".to_string(),
                    ));
                }
                settings.manager.worker_threads = workers;
            }
        }

        if let Some(evdev) = toml_settings.evdev {
            if let Some(devices) = evdev.devices {
                settings.evdev.devices = devices;
            }
            if let Some(timeout) = evdev.poll_timeout_ms {
                // A negative poll timeout would block the loop past a quit request
                if timeout < 0 {
                    return Err(SettingsError::InvalidValue(format!(
                        "evdev.poll_timeout_ms must not be negative, got {}",
                        timeout
                    )));
                }
                settings.evdev.poll_timeout_ms = timeout;
            }
            if let Some(include_mice) = evdev.include_mice {
                settings.evdev.include_mice = include_mice;
            }
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("globalhotkeys").join("settings.toml"))
    }

    /// Load from the default location, falling back to defaults if absent
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::new())
    }

    /// Reload from the file this was loaded from, if any
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        if let Some(path) = self.source_path.clone() {
            *self = Self::from_file(path)?;
        }
        Ok(())
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert_eq!(settings.manager.stop_timeout, Duration::from_millis(5000));
        assert_eq!(settings.manager.worker_threads, 2);
        assert!(settings.evdev.devices.is_empty());
        assert_eq!(settings.evdev.poll_timeout_ms, 50);
        assert!(settings.evdev.include_mice);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::new());
    }

    #[test]
    fn test_parse_full() {
        let toml = r#"
[manager]
stop_timeout_ms = 250
worker_threads = 4

[evdev]
devices = ["/dev/input/event3", "AT Translated Set 2 keyboard"]
poll_timeout_ms = 10
include_mice = false
"#;
        let settings = Settings::from_toml(toml).unwrap();
        assert_eq!(settings.manager.stop_timeout, Duration::from_millis(250));
        assert_eq!(settings.manager.worker_threads, 4);
        assert_eq!(settings.evdev.devices.len(), 2);
        assert_eq!(settings.evdev.poll_timeout_ms, 10);
        assert!(!settings.evdev.include_mice);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let settings = Settings::from_toml("[evdev]\ninclude_mice = false\n").unwrap();
        assert_eq!(settings.evdev.poll_timeout_ms, DEFAULT_POLL_TIMEOUT_MS);
        assert_eq!(settings.manager, ManagerOptions::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let settings = Settings::from_toml("[other]\nx = 1\n[manager]\ncolor = \"red\"\n");
        assert!(settings.is_ok());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Settings::from_toml("[manager]\nworker_threads = 0\n"),
            Err(SettingsError::InvalidValue(_))
        ));
        assert!(matches!(
            Settings::from_toml("[evdev]\npoll_timeout_ms = -1\n"),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Settings::from_toml("[manager\n"),
            Err(SettingsError::TomlParse(_))
        ));
    }

    #[test]
    fn test_from_file_and_reload() {
        let path = std::env::temp_dir().join(format!(
            "globalhotkeys-settings-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[manager]\nworker_threads = 3\n").unwrap();

        let mut settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.manager.worker_threads, 3);
        assert_eq!(settings.source_path(), Some(path.as_path()));

        std::fs::write(&path, "[manager]\nworker_threads = 5\n").unwrap();
        settings.reload().unwrap();
        assert_eq!(settings.manager.worker_threads, 5);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Settings::from_file("/nonexistent/globalhotkeys/settings.toml"),
            Err(SettingsError::Io(_))
        ));
    }
}
