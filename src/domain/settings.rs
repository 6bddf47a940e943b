use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_true")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_true")]
    pub console_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
    #[serde(default = "default_true")]
    pub show_file_line: bool,
    #[serde(default = "default_false")]
    pub show_thread_ids: bool,
    #[serde(default = "default_true")]
    pub show_target: bool,
    #[serde(default = "default_true")]
    pub ansi_colors: bool,
    #[serde(default = "default_rotation")]
    pub rotation: String, // "daily", "hourly", "minutely", "never"
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file_logging_enabled: default_true(),
            console_logging_enabled: default_true(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
            show_file_line: default_true(),
            show_thread_ids: default_false(),
            show_target: default_true(),
            ansi_colors: default_true(),
            rotation: default_rotation(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_prefix() -> String {
    "bleboss".to_string()
}
fn default_rotation() -> String {
    "daily".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // Adapter & Scan Settings
    #[serde(default)]
    pub adapter_index: usize,
    /// Service UUIDs to filter advertisements on; empty lists every device
    #[serde(default)]
    pub scan_service_filter: Vec<String>,
    #[serde(default = "default_false")]
    pub show_unnamed_devices: bool,

    // Connection Settings
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_connect_max_retries")]
    pub connect_max_retries: u32,
    #[serde(default = "default_connect_retry_delay_ms")]
    pub connect_retry_delay_ms: u64,
    #[serde(default = "default_discover_timeout_ms")]
    pub discover_timeout_ms: u64,

    // UI
    #[serde(default = "default_false")]
    pub dark_mode: bool,

    // Logging Settings
    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            adapter_index: 0,
            scan_service_filter: Vec::new(),
            show_unnamed_devices: false,
            connect_timeout_ms: default_connect_timeout_ms(),
            connect_max_retries: default_connect_max_retries(),
            connect_retry_delay_ms: default_connect_retry_delay_ms(),
            discover_timeout_ms: default_discover_timeout_ms(),
            dark_mode: false,
            log_settings: LogSettings::default(),
        }
    }
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}
fn default_connect_max_retries() -> u32 {
    3
}
fn default_connect_retry_delay_ms() -> u64 {
    1000
}
fn default_discover_timeout_ms() -> u64 {
    10_000
}

pub struct SettingsService {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Ok(Self::with_path(settings_path))
    }

    /// Load from `path`, falling back to defaults when the file is missing or unreadable.
    pub fn with_path(settings_path: PathBuf) -> Self {
        let settings = Self::load_from_file(&settings_path).unwrap_or_default();
        Self {
            settings,
            settings_path,
        }
    }

    fn get_settings_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("BleBoss");
        fs::create_dir_all(&path)?;
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &Path) -> anyhow::Result<Settings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "show_unnamed_devices": true }"#).unwrap();
        assert!(settings.show_unnamed_devices);
        assert_eq!(settings.connect_max_retries, 3);
        assert_eq!(settings.connect_timeout_ms, 10_000);
        assert!(settings.scan_service_filter.is_empty());
        assert_eq!(settings.log_settings, LogSettings::default());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = SettingsService::with_path(dir.path().join("settings.json"));
        assert_eq!(service.get(), &Settings::default());
    }

    #[test]
    fn test_save_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut service = SettingsService::with_path(path.clone());
        service.get_mut().scan_service_filter = vec!["180d".to_string()];
        service.get_mut().log_settings.level = "debug".to_string();
        service.save().unwrap();

        let reloaded = SettingsService::with_path(path);
        assert_eq!(reloaded.get().scan_service_filter, vec!["180d".to_string()]);
        assert_eq!(reloaded.get().log_settings.level, "debug");
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let service = SettingsService::with_path(path);
        assert_eq!(service.get(), &Settings::default());
    }
}
