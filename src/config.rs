use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use strum_macros::Display;

use crate::internal::audio::{AudioCategory, SoundBackendKind};
use crate::internal::ui::app::Action;

const DEFAULT_BASE_URL: &str = "https://api.api-ninjas.com/v1";

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "BASE_URL";
/// Environment variable overriding `api.api_key`.
pub const API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub sound: SoundConfig,
    pub logging: LoggingConfig,
    pub theme: ThemeConfig,
    pub keybindings: KeyBindingConfig,
}

/// Endpoint and credential for the joke API.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL without the trailing `/dadjokes` path segment.
    pub base_url: String,
    /// Sent verbatim as the `X-Api-Key` header.
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SoundConfig {
    /// Initial value of the in-app sound toggle.
    pub enabled: bool,
    /// Volume applied to every cue, 0.0 to 1.0.
    pub volume: f32,
    pub category: AudioCategory,
    pub backend: SoundBackendKind,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 1.0,
            category: AudioCategory::Playback,
            backend: SoundBackendKind::Bell,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Display, Default)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Per-module overrides, e.g. `{"dadabase_tui::api": Debug}`.
    pub module_levels: HashMap<String, LogLevel>,
    /// Directory for the rolling log file. Defaults to `logs`.
    pub log_directory: Option<String>,
}

impl LoggingConfig {
    /// Build an `EnvFilter` directive string from the configured levels.
    pub fn filter_directive(&self) -> String {
        let mut modules: Vec<_> = self.module_levels.iter().collect();
        modules.sort_by(|a, b| a.0.cmp(b.0));

        let mut filter_str = self.level.to_string();
        for (module, level) in modules {
            filter_str.push_str(&format!(",{}={}", module, level));
        }
        filter_str
    }
}

/// Hex colours for the screen. Any value `ratatui::style::Color` can parse
/// (named colours, indices) is accepted too.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ThemeConfig {
    pub page: String,
    pub accent: String,
    pub error: String,
    pub text: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            page: "#F4D545".to_string(),
            accent: "#4564F4".to_string(),
            error: "#F03737".to_string(),
            text: "#FFFFFF".to_string(),
        }
    }
}

/// Key overrides, keyed by strings such as `"j"`, `"Enter"` or `"Ctrl+C"`.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct KeyBindingConfig {
    pub global: HashMap<String, Action>,
    /// Bindings active while the bonus overlay is open.
    pub modal: HashMap<String, Action>,
}

/// What happened while locating and reading the config file.
///
/// Loading runs before the tracing subscriber exists, so events are collected
/// here and emitted with [`ConfigReport::log`] once logging is set up.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigReport {
    /// The file the config was read from, `None` when defaults were used.
    pub source: Option<PathBuf>,
    /// Candidates that existed but could not be read or parsed.
    pub errors: Vec<(PathBuf, String)>,
    pub missing_api_key: bool,
}

impl ConfigReport {
    pub fn log(&self) {
        for (path, error) in &self.errors {
            tracing::error!("Failed to parse config at {}: {}", path.display(), error);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {}", path.display()),
            None => tracing::info!("No config file found, using defaults"),
        }
        if self.missing_api_key {
            tracing::warn!("No API key configured; joke requests will likely fail");
        }
    }
}

impl AppConfig {
    pub fn load() -> (Self, ConfigReport) {
        let (mut config, mut report) = Self::load_from(Self::candidate_paths());
        config.apply_env(|key| std::env::var(key).ok());
        report.missing_api_key = config.api.api_key.is_empty();
        (config, report)
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from("config.ron")];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("dadabase").join("config.ron"));
        }

        candidates
    }

    /// Return the first candidate that exists and parses, or defaults.
    pub fn load_from(candidates: impl IntoIterator<Item = PathBuf>) -> (Self, ConfigReport) {
        let mut report = ConfigReport::default();

        for path in candidates {
            if !path.exists() {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    ron::from_str::<AppConfig>(&content).map_err(|e| e.to_string())
                });
            match parsed {
                Ok(config) => {
                    report.source = Some(path);
                    return (config, report);
                }
                Err(e) => report.errors.push((path, e)),
            }
        }

        (Self::default(), report)
    }

    /// Overlay `BASE_URL` / `API_KEY` from the environment. Called once at startup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.api.base_url = base_url;
        }
        if let Some(api_key) = lookup(API_KEY_ENV) {
            self.api.api_key = api_key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = ron::from_str("(sound: (enabled: false))").unwrap();
        assert!(!config.sound.enabled);
        assert_eq!(config.sound.volume, 1.0);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.theme.page, "#F4D545");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::default();
        config.api.api_key = "from-file".to_string();

        config.apply_env(|key| match key {
            BASE_URL_ENV => Some("http://localhost:9999".to_string()),
            _ => None,
        });

        assert_eq!(config.api.base_url, "http://localhost:9999");
        assert_eq!(config.api.api_key, "from-file");
    }

    #[test]
    fn test_load_from_skips_unparsable_candidate() {
        let temp_dir = std::env::temp_dir();
        let broken = temp_dir.join("dadabase_config_broken.ron");
        let valid = temp_dir.join("dadabase_config_valid.ron");

        {
            let mut file = fs::File::create(&broken).unwrap();
            file.write_all(b"(api: (base_url: ").unwrap();
            let mut file = fs::File::create(&valid).unwrap();
            file.write_all(br#"(api: (api_key: "secret"))"#).unwrap();
        }

        let (config, report) = AppConfig::load_from([
            temp_dir.join("dadabase_config_missing.ron"),
            broken.clone(),
            valid.clone(),
        ]);

        assert_eq!(config.api.api_key, "secret");
        assert_eq!(report.source.as_ref(), Some(&valid));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].0, broken);

        let _ = fs::remove_file(broken);
        let _ = fs::remove_file(valid);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_report_logs_parse_errors_once_subscriber_exists() {
        let temp_dir = std::env::temp_dir();
        let broken = temp_dir.join("dadabase_config_report_broken.ron");
        fs::write(&broken, "(sound: (volume: ").unwrap();

        // Loading itself happens with no subscriber installed.
        let (_, mut report) = AppConfig::load_from([broken.clone()]);
        report.missing_api_key = true;
        let _ = fs::remove_file(&broken);

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || report.log());

        let text = logs.text();
        assert!(text.contains("Failed to parse config at"));
        assert!(text.contains("dadabase_config_report_broken.ron"));
        assert!(text.contains("No config file found, using defaults"));
        assert!(text.contains("No API key configured"));
    }

    #[test]
    fn test_filter_directive_includes_module_levels() {
        let mut logging = LoggingConfig {
            level: LogLevel::Warn,
            ..Default::default()
        };
        logging
            .module_levels
            .insert("dadabase_tui::api".to_string(), LogLevel::Debug);

        assert_eq!(logging.filter_directive(), "warn,dadabase_tui::api=debug");
    }

    #[test]
    fn test_keybinding_overrides_parse() {
        let config: AppConfig =
            ron::from_str(r#"(keybindings: (global: {"r": RequestJoke}))"#).unwrap();
        assert_eq!(config.keybindings.global.get("r"), Some(&Action::RequestJoke));
    }
}
