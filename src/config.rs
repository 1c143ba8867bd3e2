//! Run configuration for the reachability report.

use anyhow::Context;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::reachability::{NodeId, StartNodePolicy};
use crate::simulation::propagation::ModelKind;

/// Log verbosity accepted in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Log level for this crate's targets.
    pub log_level: LogLevel,
    /// Model used to compute link probabilities from the scene.
    pub propagation_model: ModelKind,
    /// Root selection for the connectivity check.
    pub connectivity_start: StartNodePolicy,
    /// Nodes toggled inactive after the initial rebuild.
    pub inactive_nodes: Vec<NodeId>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path).with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Derive the config path from a scene file path.
    ///
    /// Replaces the scene filename with "config.toml" in the same directory.
    pub fn config_path_from_scene(scene_path: &Path) -> PathBuf {
        scene_path.parent().unwrap_or(Path::new(".")).join("config.toml")
    }
}
