//! Configuration loading and types for quillkey
//!
//! Configuration is loaded in layers:
//! 1. Built-in defaults
//! 2. Config file (~/.config/quillkey/config.toml)
//! 3. Environment variables (QUILLKEY_*)
//! 4. CLI arguments (highest priority)

use crate::error::QuillkeyError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = r#"# quillkey configuration
#
# Location: ~/.config/quillkey/config.toml
# All settings can be overridden via CLI flags

# Applications where the hotkey does nothing (exact name match).
# Terminals are excluded so select-all + paste never lands in a shell.
excluded_apps = ["Terminal", "iTerm2", "iTerm"]

[hotkey]
# Chord variants; holding every key of any one of them fires the rewrite.
# Left and right modifiers are distinct keys, so list each combination.
chords = [
    ["LEFTCTRL", "LEFTALT", "X"],
    ["RIGHTCTRL", "RIGHTALT", "X"],
    ["LEFTCTRL", "RIGHTALT", "X"],
    ["RIGHTCTRL", "LEFTALT", "X"],
]

# Keys that are never tracked as held
ignore = ["LEFTMETA", "RIGHTMETA"]

# Raw key codes that are never tracked as held (macOS function-key range)
ignore_code_range = [63232, 63743]

[rewrite]
# Ollama generate endpoint
endpoint = "http://localhost:11434/api/generate"

# Endpoint listing installed models, checked once at startup
models_endpoint = "http://localhost:11434/api/tags"

model = "qwen2.5:3b"
temperature = 0.3

# Request timeout; on timeout the selection is left untouched
timeout_ms = 30000

# [input]
# Modifier for the select-all / copy / paste shortcuts.
# Defaults to LEFTMETA (Command) on macOS and LEFTCTRL elsewhere.
# shortcut_modifier = "LEFTCTRL"

[timing]
# Minimum time between accepted triggers
debounce_ms = 1000
# Wait after the hotkey before touching the focused app
settle_ms = 500
# Wait after select-all
select_settle_ms = 500
# Wait after copy for the clipboard to update
copy_settle_ms = 600
# Wait around paste and cursor movement
paste_settle_ms = 200
"#;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Focused applications for which the trigger is ignored
    #[serde(default = "default_excluded_apps")]
    pub excluded_apps: Vec<String>,

    #[serde(default)]
    pub hotkey: HotkeyConfig,

    #[serde(default)]
    pub rewrite: RewriteConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub timing: TimingConfig,
}

/// Hotkey detection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HotkeyConfig {
    /// Equivalent chord variants, each a list of key names
    /// Example: [["LEFTCTRL", "LEFTALT", "X"], ["RIGHTCTRL", "RIGHTALT", "X"]]
    #[serde(default = "default_chords")]
    pub chords: Vec<Vec<String>>,

    /// Keys that are never recorded as pressed
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Inclusive range of raw key codes that are never recorded as pressed
    #[serde(default = "default_ignore_code_range")]
    pub ignore_code_range: Option<[u32; 2]>,
}

/// Rewrite service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RewriteConfig {
    /// Generate endpoint (POST)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model listing endpoint (GET), used for the startup check
    #[serde(default = "default_models_endpoint")]
    pub models_endpoint: String,

    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Request timeout in milliseconds (default: 30000 = 30 seconds)
    #[serde(default = "default_rewrite_timeout")]
    pub timeout_ms: u64,
}

/// Synthetic input configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Modifier held for select-all, copy and paste
    #[serde(default = "default_shortcut_modifier")]
    pub shortcut_modifier: String,
}

/// Delays and debounce window, all in milliseconds
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct TimingConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_select_settle_ms")]
    pub select_settle_ms: u64,
    #[serde(default = "default_copy_settle_ms")]
    pub copy_settle_ms: u64,
    #[serde(default = "default_paste_settle_ms")]
    pub paste_settle_ms: u64,
}

impl TimingConfig {
    /// All delays and the debounce window set to zero
    pub fn immediate() -> Self {
        Self {
            debounce_ms: 0,
            settle_ms: 0,
            select_settle_ms: 0,
            copy_settle_ms: 0,
            paste_settle_ms: 0,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn select_settle(&self) -> Duration {
        Duration::from_millis(self.select_settle_ms)
    }

    pub fn copy_settle(&self) -> Duration {
        Duration::from_millis(self.copy_settle_ms)
    }

    pub fn paste_settle(&self) -> Duration {
        Duration::from_millis(self.paste_settle_ms)
    }
}

fn default_excluded_apps() -> Vec<String> {
    vec!["Terminal".to_string(), "iTerm2".to_string(), "iTerm".to_string()]
}

fn default_chords() -> Vec<Vec<String>> {
    [
        ["LEFTCTRL", "LEFTALT", "X"],
        ["RIGHTCTRL", "RIGHTALT", "X"],
        ["LEFTCTRL", "RIGHTALT", "X"],
        ["RIGHTCTRL", "LEFTALT", "X"],
    ]
    .iter()
    .map(|chord| chord.iter().map(|k| k.to_string()).collect())
    .collect()
}

fn default_ignore() -> Vec<String> {
    vec!["LEFTMETA".to_string(), "RIGHTMETA".to_string()]
}

fn default_ignore_code_range() -> Option<[u32; 2]> {
    Some([0xF700, 0xF8FF])
}

fn default_endpoint() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_models_endpoint() -> String {
    "http://localhost:11434/api/tags".to_string()
}

fn default_model() -> String {
    "qwen2.5:3b".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_rewrite_timeout() -> u64 {
    30000 // 30 seconds - generous for a local LLM
}

fn default_shortcut_modifier() -> String {
    if cfg!(target_os = "macos") {
        "LEFTMETA".to_string()
    } else {
        "LEFTCTRL".to_string()
    }
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_settle_ms() -> u64 {
    500
}

fn default_select_settle_ms() -> u64 {
    500
}

fn default_copy_settle_ms() -> u64 {
    600
}

fn default_paste_settle_ms() -> u64 {
    200
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            chords: default_chords(),
            ignore: default_ignore(),
            ignore_code_range: default_ignore_code_range(),
        }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            models_endpoint: default_models_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_ms: default_rewrite_timeout(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            shortcut_modifier: default_shortcut_modifier(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            settle_ms: default_settle_ms(),
            select_settle_ms: default_select_settle_ms(),
            copy_settle_ms: default_copy_settle_ms(),
            paste_settle_ms: default_paste_settle_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_apps: default_excluded_apps(),
            hotkey: HotkeyConfig::default(),
            rewrite: RewriteConfig::default(),
            input: InputConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "quillkey")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Parse a chord list from the QUILLKEY_HOTKEY format
///
/// Chords are separated by `;`, keys within a chord by `+`:
/// `LEFTCTRL+LEFTALT+X;RIGHTCTRL+RIGHTALT+X`
pub fn parse_chord_list(raw: &str) -> Vec<Vec<String>> {
    raw.split(';')
        .map(|chord| {
            chord
                .split('+')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|chord| !chord.is_empty())
        .collect()
}

/// Load configuration from file, with defaults for missing values
pub fn load_config(path: Option<&Path>) -> Result<Config, QuillkeyError> {
    // Start with defaults
    let mut config = Config::default();

    // Determine config file path
    let config_path = path.map(PathBuf::from).or_else(Config::default_path);

    // Load from file if it exists
    if let Some(ref path) = config_path {
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(path)
                .map_err(|e| QuillkeyError::Config(format!("Failed to read config: {}", e)))?;

            config = toml::from_str(&contents)
                .map_err(|e| QuillkeyError::Config(format!("Invalid config: {}", e)))?;
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
        }
    }

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    Ok(config)
}

/// Write the commented default config to `path`
///
/// Refuses to overwrite an existing file.
pub fn write_default_config(path: &Path) -> Result<(), QuillkeyError> {
    if path.exists() {
        return Err(QuillkeyError::Config(format!(
            "Config file already exists: {:?}",
            path
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    tracing::debug!("Default config written to {:?}", path);
    Ok(())
}

/// Override config values from QUILLKEY_* environment variables
fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(model) = var("QUILLKEY_MODEL") {
        config.rewrite.model = model;
    }
    if let Some(endpoint) = var("QUILLKEY_ENDPOINT") {
        config.rewrite.endpoint = endpoint;
    }
    if let Some(hotkey) = var("QUILLKEY_HOTKEY") {
        let chords = parse_chord_list(&hotkey);
        if chords.is_empty() {
            tracing::warn!("Ignoring empty QUILLKEY_HOTKEY");
        } else {
            config.hotkey.chords = chords;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.excluded_apps, vec!["Terminal", "iTerm2", "iTerm"]);
        assert_eq!(config.hotkey.chords.len(), 4);
        assert_eq!(config.hotkey.ignore_code_range, Some([0xF700, 0xF8FF]));
        assert_eq!(
            config.rewrite.endpoint,
            "http://localhost:11434/api/generate"
        );
        assert_eq!(config.rewrite.timeout_ms, 30000);
        assert_eq!(config.timing.debounce_ms, 1000);
        assert_eq!(config.timing.copy_settle_ms, 600);
    }

    #[test]
    fn test_default_config_text_matches_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.excluded_apps, defaults.excluded_apps);
        assert_eq!(parsed.hotkey.chords, defaults.hotkey.chords);
        assert_eq!(parsed.hotkey.ignore, defaults.hotkey.ignore);
        assert_eq!(parsed.rewrite.model, defaults.rewrite.model);
        assert_eq!(parsed.timing, defaults.timing);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
            excluded_apps = ["Alacritty"]

            [hotkey]
            chords = [["LEFTCTRL", "LEFTSHIFT", "R"]]

            [rewrite]
            model = "llama3.2:1b"

            [timing]
            debounce_ms = 250
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.excluded_apps, vec!["Alacritty"]);
        assert_eq!(config.hotkey.chords, vec![vec!["LEFTCTRL", "LEFTSHIFT", "R"]]);
        assert_eq!(config.hotkey.ignore, vec!["LEFTMETA", "RIGHTMETA"]); // default
        assert_eq!(config.rewrite.model, "llama3.2:1b");
        assert_eq!(config.rewrite.temperature, 0.3); // default
        assert_eq!(config.timing.debounce_ms, 250);
        assert_eq!(config.timing.settle_ms, 500); // default
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.hotkey.chords, default_chords());
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[rewrite]\ntimeout_ms = 5000\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.rewrite.timeout_ms, 5000);
    }

    #[test]
    fn test_load_config_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timing]\ndebounce_ms = \"soon\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.rewrite.model, "qwen2.5:3b");
    }

    #[test]
    fn test_write_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quillkey").join("config.toml");

        write_default_config(&path).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.hotkey.chords, default_chords());

        // Second write must not clobber the file
        assert!(write_default_config(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("QUILLKEY_MODEL", "gemma3:4b"),
            ("QUILLKEY_ENDPOINT", "http://127.0.0.1:9999/api/generate"),
            ("QUILLKEY_HOTKEY", "LEFTCTRL+LEFTSHIFT+R; RIGHTCTRL+RIGHTSHIFT+R"),
        ]);
        let mut config = Config::default();
        apply_env_overrides(&mut config, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.rewrite.model, "gemma3:4b");
        assert_eq!(config.rewrite.endpoint, "http://127.0.0.1:9999/api/generate");
        assert_eq!(
            config.hotkey.chords,
            vec![
                vec!["LEFTCTRL", "LEFTSHIFT", "R"],
                vec!["RIGHTCTRL", "RIGHTSHIFT", "R"],
            ]
        );
    }

    #[test]
    fn test_empty_hotkey_env_is_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |name| {
            (name == "QUILLKEY_HOTKEY").then(|| " ; ".to_string())
        });
        assert_eq!(config.hotkey.chords, default_chords());
    }

    #[test]
    fn test_timing_durations() {
        let timing = TimingConfig::default();
        assert_eq!(timing.debounce(), Duration::from_secs(1));
        assert_eq!(timing.copy_settle(), Duration::from_millis(600));
        assert_eq!(TimingConfig::immediate().settle(), Duration::ZERO);
    }
}
