//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::glitch::{EngineConfig, Intensity, DEFAULT_ALPHABET};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub glitch: GlitchConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Glitch effect configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GlitchConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_revert_delay")]
    pub revert_delay_ms: u64,

    /// Kept as a string so unknown levels fall back instead of failing the load
    #[serde(default = "default_intensity")]
    pub default_intensity: String,

    #[serde(default = "default_alphabet")]
    pub alphabet: String,

    #[serde(default = "default_restore_on_detach")]
    pub restore_on_detach: bool,

    /// Fixed seed for reproducible glitches
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_tick_interval() -> u64 {
    crate::glitch::DEFAULT_TICK_INTERVAL_MS
}

fn default_revert_delay() -> u64 {
    crate::glitch::DEFAULT_REVERT_DELAY_MS
}

fn default_intensity() -> String {
    Intensity::default().to_string()
}

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}

fn default_restore_on_detach() -> bool {
    true
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            revert_delay_ms: default_revert_delay(),
            default_intensity: default_intensity(),
            alphabet: default_alphabet(),
            restore_on_detach: default_restore_on_detach(),
            seed: None,
        }
    }
}

impl GlitchConfig {
    /// Configured default intensity, `medium` if unrecognized
    pub fn intensity(&self) -> Intensity {
        Intensity::parse_or_default(&self.default_intensity)
    }

    /// Engine settings derived from this section
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .timing(
                Duration::from_millis(self.tick_interval_ms),
                Duration::from_millis(self.revert_delay_ms),
            )
            .alphabet(&self.alphabet)
            .restore_on_detach(self.restore_on_detach)
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_subtitle")]
    pub subtitle: String,

    /// Stop the live dashboard after this many seconds (0 = until ctrl-c)
    #[serde(default)]
    pub run_secs: u64,

    #[serde(default = "default_clear_screen")]
    pub clear_screen: bool,
}

fn default_title() -> String {
    "AGENT-TOGA".to_string()
}

fn default_subtitle() -> String {
    "AGI AVATAR SYSTEM // STATUS: ONLINE // V.1.0.0".to_string()
}

fn default_clear_screen() -> bool {
    true
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            run_secs: 0,
            clear_screen: default_clear_screen(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over the configured level. Output goes to stderr so it
    /// does not tear the rendered dashboard on stdout.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("glitchboard={}", self.level)));

        let registry = tracing_subscriber::registry().with(filter);
        let result = if self.format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialized: {}", e);
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("glitchboard").join("config.toml")),
            Some(PathBuf::from("/etc/glitchboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Glitch overrides
        if let Ok(tick) = std::env::var("GLITCHBOARD_TICK_MS") {
            if let Ok(ms) = tick.parse() {
                self.glitch.tick_interval_ms = ms;
            }
        }
        if let Ok(revert) = std::env::var("GLITCHBOARD_REVERT_MS") {
            if let Ok(ms) = revert.parse() {
                self.glitch.revert_delay_ms = ms;
            }
        }
        if let Ok(intensity) = std::env::var("GLITCHBOARD_INTENSITY") {
            self.glitch.default_intensity = intensity;
        }
        if let Ok(seed) = std::env::var("GLITCHBOARD_SEED") {
            if let Ok(s) = seed.parse() {
                self.glitch.seed = Some(s);
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("GLITCHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GLITCHBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Glitchboard Configuration
#
# Environment variables override these settings:
# - GLITCHBOARD_TICK_MS
# - GLITCHBOARD_REVERT_MS
# - GLITCHBOARD_INTENSITY
# - GLITCHBOARD_SEED
# - GLITCHBOARD_LOG_LEVEL
# - GLITCHBOARD_LOG_FORMAT

[glitch]
# How often each glitching label rolls for a corruption (ms)
tick_interval_ms = 2000

# How long a corrupted character stays visible (ms)
revert_delay_ms = 100

# Intensity of the header title: low, medium, high
# Unknown values fall back to medium
default_intensity = "medium"

# Characters a corrupted position may show
alphabet = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>?"

# Show the clean text again when an effect is detached
restore_on_detach = true

# Fixed seed for reproducible glitches
# seed = 42

[dashboard]
# Header text
title = "AGENT-TOGA"

# Line under the header
subtitle = "AGI AVATAR SYSTEM // STATUS: ONLINE // V.1.0.0"

# Stop after this many seconds (0 = run until ctrl-c)
run_secs = 0

# Clear the terminal before each frame
clear_screen = true

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.glitch.tick_interval_ms, 2000);
        assert_eq!(config.glitch.revert_delay_ms, 100);
        assert_eq!(config.glitch.intensity(), Intensity::Medium);
        assert!(config.glitch.restore_on_detach);
        assert_eq!(config.dashboard.title, "AGENT-TOGA");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(config.glitch.tick_interval_ms, defaults.glitch.tick_interval_ms);
        assert_eq!(config.glitch.alphabet, defaults.glitch.alphabet);
        assert_eq!(config.glitch.seed, None);
        assert_eq!(config.dashboard.subtitle, defaults.dashboard.subtitle);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[glitch]\ntick_interval_ms = 500\ndefault_intensity = \"high\"\nseed = 7\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.glitch.tick_interval_ms, 500);
        assert_eq!(config.glitch.revert_delay_ms, 100);
        assert_eq!(config.glitch.intensity(), Intensity::High);
        assert_eq!(config.glitch.seed, Some(7));
        assert_eq!(config.dashboard.title, "AGENT-TOGA");
    }

    #[test]
    fn test_unknown_intensity_falls_back() {
        let config: Config = toml::from_str("[glitch]\ndefault_intensity = \"ludicrous\"\n").unwrap();
        assert_eq!(config.glitch.intensity(), Intensity::Medium);
    }

    #[test]
    fn test_engine_config_from_section() {
        let glitch = GlitchConfig {
            tick_interval_ms: 250,
            revert_delay_ms: 50,
            alphabet: "#@".to_string(),
            restore_on_detach: false,
            ..GlitchConfig::default()
        };

        let engine = glitch.engine_config();
        assert_eq!(engine.tick_interval, Duration::from_millis(250));
        assert_eq!(engine.revert_delay, Duration::from_millis(50));
        assert_eq!(engine.alphabet, vec!['#', '@']);
        assert!(!engine.restore_on_detach);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[glitch\ntick_interval_ms = ").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse { .. })));
    }
}
