//! Configuration file schema for smellcheck.
//!
//! A config selects which checks run and tunes them. Every field has a
//! default, so an empty file (or no file at all) is a valid config.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detect::{DEFAULT_ENTRY_POINTS, DEFAULT_LONG_METHOD_THRESHOLD};

/// File names searched for, in order, when no config is given.
pub const CONFIG_FILE_NAMES: &[&str] = &["smellcheck.yaml", ".smellcheck.yaml"];

/// Default config written by `smellcheck init`.
pub const DEFAULT_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    /// Glob patterns for paths to exclude from analysis (e.g. "**/obj/**").
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    #[serde(default)]
    pub long_methods: LongMethodsConfig,
    #[serde(default)]
    pub magic_numbers: ToggleConfig,
    #[serde(default)]
    pub naming: ToggleConfig,
    #[serde(default)]
    pub dead_code: DeadCodeConfig,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a config from YAML text. Blank text is the default config.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Look for a config file in `dir`.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|path| path.is_file())
    }
}

/// Settings for the long method check.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LongMethodsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Statement count at or above which a method is reported.
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

impl Default for LongMethodsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_LONG_METHOD_THRESHOLD,
        }
    }
}

/// A check with no settings besides being on or off.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToggleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Settings for dead code detection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeadCodeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Declarations that are alive without any reference.
    #[serde(default = "default_entry_points")]
    pub entry_points: Vec<String>,
    /// Namespace -> names it provides, for libraries outside the project.
    #[serde(default)]
    pub known_namespaces: HashMap<String, Vec<String>>,
}

impl Default for DeadCodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            entry_points: default_entry_points(),
            known_namespaces: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> usize {
    DEFAULT_LONG_METHOD_THRESHOLD
}

fn default_entry_points() -> Vec<String> {
    DEFAULT_ENTRY_POINTS.iter().map(|s| s.to_string()).collect()
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    // Validate excluded_paths glob patterns compile
    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    for name in &config.dead_code.entry_points {
        if name.trim().is_empty() {
            anyhow::bail!("dead_code.entry_points must not contain blank names");
        }
    }

    for namespace in config.dead_code.known_namespaces.keys() {
        if namespace.trim().is_empty() {
            anyhow::bail!("dead_code.known_namespaces must not contain a blank namespace");
        }
    }

    Ok(())
}
