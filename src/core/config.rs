//! # Configuration Module
//!
//! Provides configuration management for the HtmlSift pipeline. Settings can
//! come from a TOML file, environment variables and programmatic overrides,
//! applied in that order.
//!
//! The element filter rules are fixed and deliberately absent from this
//! module; only the converter invocation and intermediate-file handling are
//! configurable.
//!
//! ## Example
//!
//! ```rust,no_run
//! use htmlsift::core::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .with_file("htmlsift.toml")
//!     .with_env_prefix("HTMLSIFT_")
//!     .with_override("converter.timeout_secs", "120")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.read().converter.timeout_secs, Some(120));
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use toml::Value as TomlValue;

use crate::core::error::{HtmlSiftError, Result};

/// Word that every intermediate file name must contain so that post-run
/// cleanup can find it.
pub const INTERMEDIATE_MARKER: &str = "processed";

/// Dotted keys accepted from the environment.
const KNOWN_KEYS: &[&str] = &[
    "converter.program",
    "converter.from",
    "converter.to",
    "converter.timeout_secs",
    "output.keep_intermediate",
    "output.intermediate_suffix",
];

/// Represents the main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    /// Settings for the external document converter.
    pub converter: ConverterConfig,

    #[serde(default)]
    /// Settings for intermediate and output files.
    pub output: OutputConfig,
}

/// Configuration for the external document converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default = "default_program")]
    /// Executable to run, looked up on `PATH` when not absolute.
    pub program: String,

    #[serde(default = "default_from")]
    /// Source format passed with `-f`.
    pub from: String,

    #[serde(default = "default_to")]
    /// Target format passed with `-t`.
    pub to: String,

    #[serde(default)]
    /// Kill the converter after this many seconds. `None` waits forever.
    pub timeout_secs: Option<u64>,
}

impl ConverterConfig {
    /// Returns the configured timeout as a `Duration`.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            from: default_from(),
            to: default_to(),
            timeout_secs: None,
        }
    }
}

/// Configuration for intermediate and output files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    /// Leave `*_processed.html` intermediates in place after the run.
    pub keep_intermediate: bool,

    #[serde(default = "default_intermediate_suffix")]
    /// Suffix that replaces `.html` when naming the assembled shell.
    pub intermediate_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            keep_intermediate: false,
            intermediate_suffix: default_intermediate_suffix(),
        }
    }
}

/// Builds a `Config` from a file, the environment and explicit overrides.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
    overrides: Vec<(String, TomlValue)>,
}

impl ConfigBuilder {
    /// Initialises a new `ConfigBuilder` instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a TOML configuration file to the builder.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a prefix for environment variables to override configuration values.
    ///
    /// `HTMLSIFT_CONVERTER_PROGRAM` with prefix `HTMLSIFT_` sets
    /// `converter.program`.
    pub fn with_env_prefix<S: Into<String>>(
        mut self,
        prefix: S,
    ) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Adds a dotted `section.key` override, applied after file and environment.
    pub fn with_override<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<TomlValue>,
    {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Builds the final configuration by applying all specified settings and overrides.
    pub fn build(self) -> Result<Arc<RwLock<Config>>> {
        let mut config = if let Some(path) = self.config_file {
            load_from_file(&path)?
        } else {
            Config::default()
        };

        if let Some(prefix) = self.env_prefix {
            apply_env_overrides(&mut config, &prefix)?;
        }

        for (key, value) in &self.overrides {
            apply_config_value(&mut config, key, &override_text(value))?;
        }
        validate_config(&config)?;

        Ok(Arc::new(RwLock::new(config)))
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_config(self)
    }
}

fn load_from_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        HtmlSiftError::config_error(
            format!("Failed to read config file: {}", e),
            Some(path.to_path_buf()),
        )
    })?;

    toml::from_str(&content).map_err(|e| {
        HtmlSiftError::config_error(
            format!("Failed to parse config file: {}", e),
            Some(path.to_path_buf()),
        )
    })
}

fn apply_env_overrides(
    config: &mut Config,
    prefix: &str,
) -> Result<()> {
    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(prefix) {
            let stripped =
                stripped.trim_start_matches('_').to_lowercase();
            // CONVERTER_TIMEOUT_SECS -> converter.timeout_secs
            let config_key = match stripped.split_once('_') {
                Some((section, rest)) => format!("{}.{}", section, rest),
                None => stripped,
            };
            // Other tools may share the prefix, e.g. HTMLSIFT_LOG.
            if !KNOWN_KEYS.contains(&config_key.as_str()) {
                debug!("Ignoring unrelated environment variable {}", key);
                continue;
            }
            apply_config_value(config, &config_key, &value)?;
        }
    }
    Ok(())
}

/// Renders an override as the plain text the setting parsers expect.
fn override_text(value: &TomlValue) -> String {
    match value {
        TomlValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn apply_config_value(
    config: &mut Config,
    key: &str,
    value: &str,
) -> Result<()> {
    match key.split_once('.') {
        Some(("converter", key)) => {
            apply_converter_value(&mut config.converter, key, value)
        }
        Some(("output", key)) => {
            apply_output_value(&mut config.output, key, value)
        }
        Some((section, _)) => Err(HtmlSiftError::config_error(
            format!("Unknown configuration section: {}", section),
            None,
        )),
        None => Err(HtmlSiftError::config_error(
            format!("Unknown configuration key: {}", key),
            None,
        )),
    }
}

fn apply_converter_value(
    config: &mut ConverterConfig,
    key: &str,
    value: &str,
) -> Result<()> {
    match key {
        "program" => config.program = value.to_string(),
        "from" => config.from = value.to_string(),
        "to" => config.to = value.to_string(),
        "timeout_secs" => {
            config.timeout_secs = Some(value.parse().map_err(|e| {
                HtmlSiftError::config_error(
                    format!("Invalid timeout_secs value '{}': {}", value, e),
                    None,
                )
            })?);
        }
        _ => {
            return Err(HtmlSiftError::config_error(
                format!("Unknown converter setting: {}", key),
                None,
            ))
        }
    }
    Ok(())
}

fn apply_output_value(
    config: &mut OutputConfig,
    key: &str,
    value: &str,
) -> Result<()> {
    match key {
        "keep_intermediate" => {
            config.keep_intermediate = value.parse().map_err(|e| {
                HtmlSiftError::config_error(
                    format!(
                        "Invalid keep_intermediate value '{}': {}",
                        value, e
                    ),
                    None,
                )
            })?;
        }
        "intermediate_suffix" => {
            config.intermediate_suffix = value.to_string();
        }
        _ => {
            return Err(HtmlSiftError::config_error(
                format!("Unknown output setting: {}", key),
                None,
            ))
        }
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    if config.converter.program.trim().is_empty() {
        return Err(HtmlSiftError::config_error(
            "Converter program cannot be empty",
            None,
        ));
    }

    if config.converter.timeout_secs == Some(0) {
        return Err(HtmlSiftError::config_error(
            "Converter timeout must be at least one second",
            None,
        ));
    }

    if !config.output.intermediate_suffix.contains(INTERMEDIATE_MARKER) {
        return Err(HtmlSiftError::config_error(
            format!(
                "Intermediate suffix '{}' must contain '{}'",
                config.output.intermediate_suffix, INTERMEDIATE_MARKER
            ),
            None,
        ));
    }

    Ok(())
}

// Default value functions
fn default_program() -> String {
    "pandoc".to_string()
}

fn default_from() -> String {
    "html".to_string()
}

fn default_to() -> String {
    "markdown".to_string()
}

fn default_intermediate_suffix() -> String {
    "_processed.html".to_string()
}

/// Tests for the configuration module.
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.converter.program, "pandoc");
        assert_eq!(config.converter.from, "html");
        assert_eq!(config.converter.to, "markdown");
        assert!(config.converter.timeout().is_none());
        assert!(!config.output.keep_intermediate);
        assert_eq!(config.output.intermediate_suffix, "_processed.html");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("htmlsift.toml");
        fs::write(
            &config_file,
            "[converter]\nprogram = '/opt/pandoc/bin/pandoc'\ntimeout_secs = 30\n",
        )
        .unwrap();

        let config = load_from_file(&config_file).unwrap();
        assert_eq!(config.converter.program, "/opt/pandoc/bin/pandoc");
        assert_eq!(
            config.converter.timeout(),
            Some(Duration::from_secs(30))
        );
        assert_eq!(config.converter.to, "markdown");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ConfigBuilder::new()
            .with_file("does/not/exist.toml")
            .build()
            .unwrap_err();
        assert!(matches!(err, HtmlSiftError::ConfigError { .. }));
    }

    #[test]
    fn test_apply_overrides() {
        let config = ConfigBuilder::new()
            .with_override("converter.program", "pandoc-3")
            .with_override("output.keep_intermediate", true)
            .build()
            .unwrap();

        let config = config.read();
        assert_eq!(config.converter.program, "pandoc-3");
        assert!(config.output.keep_intermediate);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = ConfigBuilder::new()
            .with_override("converter.flags", "--standalone")
            .build();
        assert!(result.is_err());

        let result = ConfigBuilder::new()
            .with_override("filters.paragraph", "off")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("HTMLSIFT_TEST_ENV_CONVERTER_TIMEOUT_SECS", "45");
        let mut config = Config::default();

        apply_env_overrides(&mut config, "HTMLSIFT_TEST_ENV").unwrap();
        assert_eq!(config.converter.timeout_secs, Some(45));
        env::remove_var("HTMLSIFT_TEST_ENV_CONVERTER_TIMEOUT_SECS");
    }

    #[test]
    fn test_string_overrides_are_taken_verbatim() {
        let config = ConfigBuilder::new()
            .with_override("converter.program", r"C:\tools\pandoc.exe")
            .with_override("converter.to", "gfm\"strict\"")
            .with_override("converter.timeout_secs", 90_i64)
            .build()
            .unwrap();

        let config = config.read();
        assert_eq!(config.converter.program, r"C:\tools\pandoc.exe");
        assert_eq!(config.converter.to, "gfm\"strict\"");
        assert_eq!(config.converter.timeout_secs, Some(90));
    }

    #[test]
    fn test_env_ignores_unrelated_variables() {
        env::set_var("HTMLSIFT_TEST_UNRELATED_LOG", "debug");
        env::set_var("HTMLSIFT_TEST_UNRELATED_OUTPUT_KEEP_INTERMEDIATE", "true");
        let mut config = Config::default();

        apply_env_overrides(&mut config, "HTMLSIFT_TEST_UNRELATED").unwrap();
        assert!(config.output.keep_intermediate);
        env::remove_var("HTMLSIFT_TEST_UNRELATED_LOG");
        env::remove_var("HTMLSIFT_TEST_UNRELATED_OUTPUT_KEEP_INTERMEDIATE");

        // Explicit overrides stay strict.
        assert!(ConfigBuilder::new().with_override("log", "debug").build().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.converter.timeout_secs = Some(0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.intermediate_suffix = "_tmp.html".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.converter.program = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
