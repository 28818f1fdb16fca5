use std::path::{Path, PathBuf};
use serde::Deserialize;

/// All configuration for the venue tool.
///
/// Precedence (lowest to highest): defaults → config file → env var → CLI arg.
/// CLI arg merging is done by the caller after `Config::load()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Server
    pub port: u16,

    // Logging
    pub log_level: String,
    pub utc: bool,

    // Validation
    pub pin_length: usize,
    pub max_party_size: Option<u32>,
}

/// Config file layout (~/.venue/config.toml). All fields optional; they layer
/// on top of compiled-in defaults.
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    port: Option<u16>,
    log_level: Option<String>,
    utc: Option<bool>,
    pin_length: Option<usize>,
    max_party_size: Option<u32>,
}

impl Config {
    /// Config directory: ~/.venue/
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".venue")
    }

    /// Config file path: ~/.venue/config.toml
    pub fn file_path() -> PathBuf {
        Self::dir().join("config.toml")
    }

    /// Load config: defaults → config file → env vars.
    /// CLI args should be merged by the caller afterward.
    pub fn load() -> Self {
        Self::load_from(&Self::file_path())
    }

    /// Same as [`Config::load`] with an explicit config file. A missing or
    /// unparsable file is skipped.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::defaults();

        // Layer 2: config file
        if let Ok(contents) = std::fs::read_to_string(path) {
            if let Ok(file) = toml::from_str::<FileConfig>(&contents) {
                config.apply_file(file);
            }
        }

        // Layer 3: environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    // --- Private helpers ---

    fn defaults() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_string(),
            utc: false,
            pin_length: 4,
            max_party_size: None,
        }
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.port { self.port = v; }
        if let Some(v) = file.log_level { self.log_level = v; }
        if let Some(v) = file.utc { self.utc = v; }
        if let Some(v) = file.pin_length.filter(|n| *n > 0) { self.pin_length = v; }
        if let Some(v) = file.max_party_size { self.max_party_size = Some(v); }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("VENUE_PORT") {
            if let Ok(p) = v.parse() { self.port = p; }
        }
        if let Some(v) = var("VENUE_LOG_LEVEL") { self.log_level = v; }
        if let Some(v) = var("VENUE_UTC") {
            self.utc = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Some(v) = var("VENUE_PIN_LENGTH") {
            if let Ok(n) = v.parse::<usize>() {
                if n > 0 { self.pin_length = n; }
            }
        }
        if let Some(v) = var("VENUE_MAX_PARTY_SIZE") {
            // 0 or empty lifts the cap
            self.max_party_size = v.parse().ok().filter(|n: &u32| *n > 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn file_layers_over_defaults() {
        let mut config = Config::defaults();
        let file: FileConfig = toml::from_str("port = 8080\npin_length = 6\n").unwrap();
        config.apply_file(file);

        assert_eq!(config.port, 8080);
        assert_eq!(config.pin_length, 6);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_party_size, None);
    }

    #[test]
    fn unknown_file_keys_keep_the_valid_ones() {
        let mut config = Config::defaults();
        let file: FileConfig = toml::from_str("port = 8080\nmax_party = 100\n").unwrap();
        config.apply_file(file);

        assert_eq!(config.port, 8080);
        assert_eq!(config.max_party_size, None);
    }

    #[test]
    fn zero_pin_length_keeps_previous() {
        let mut config = Config::defaults();
        config.apply_file(toml::from_str("pin_length = 0\n").unwrap());
        assert_eq!(config.pin_length, 4);

        config.apply_env(|k| (k == "VENUE_PIN_LENGTH").then(|| "0".to_string()));
        assert_eq!(config.pin_length, 4);

        config.apply_env(|k| (k == "VENUE_PIN_LENGTH").then(|| "6".to_string()));
        assert_eq!(config.pin_length, 6);
    }

    #[test]
    fn env_layers_over_file() {
        let mut config = Config::defaults();
        config.apply_file(toml::from_str("port = 8080\nmax_party_size = 150\n").unwrap());

        let env: HashMap<&str, &str> = [
            ("VENUE_PORT", "9090"),
            ("VENUE_UTC", "TRUE"),
            ("VENUE_PIN_LENGTH", "six"),
        ]
        .into_iter()
        .collect();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.port, 9090);
        assert!(config.utc);
        assert_eq!(config.pin_length, 4);
        assert_eq!(config.max_party_size, Some(150));
    }

    #[test]
    fn zero_party_size_lifts_cap() {
        let mut config = Config::defaults();
        config.max_party_size = Some(100);
        config.apply_env(|k| (k == "VENUE_MAX_PARTY_SIZE").then(|| "0".to_string()));
        assert_eq!(config.max_party_size, None);
    }

    #[test]
    fn empty_env_keeps_defaults() {
        let mut config = Config::defaults();
        config.apply_env(|_| None);
        assert_eq!(config, Config::defaults());
    }
}
