// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration
//!
//! Values come from command line flags layered over an optional TOML file.
//! Flags win; anything unset falls back to the built-in defaults.

use clap::{Parser, ValueEnum};
use karness_engine::{DispatchErrorPolicy, ProcessorConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the processor treats a failed dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchErrors {
    /// Fail the scenario
    #[default]
    Fail,
    /// Retry the same event on the next tick
    Retry,
}

impl From<DispatchErrors> for DispatchErrorPolicy {
    fn from(value: DispatchErrors) -> Self {
        match value {
            DispatchErrors::Fail => DispatchErrorPolicy::Fail,
            DispatchErrors::Retry => DispatchErrorPolicy::Retry,
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(name = "karnessd", version, about = "Karness - scenario runner daemon")]
pub struct Args {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory scanned for scenario manifests
    #[arg(long)]
    pub manifests: Option<PathBuf>,
    /// Number of reconcile workers
    #[arg(long)]
    pub workers: Option<usize>,
    /// Interval between scenario steps (e.g. "1s", "500ms")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub tick: Option<Duration>,
    /// Manifest directory poll interval
    #[arg(long, value_parser = humantime::parse_duration)]
    pub rescan: Option<Duration>,
    /// What to do when an action cannot be dispatched
    #[arg(long, value_enum)]
    pub dispatch_errors: Option<DispatchErrors>,
    /// grpcurl binary used for remote calls
    #[arg(long)]
    pub grpcurl: Option<PathBuf>,
    /// Call servers without TLS
    #[arg(long)]
    pub plaintext: Option<bool>,
    /// grpcurl connect timeout
    #[arg(long, value_parser = humantime::parse_duration)]
    pub connect_timeout: Option<Duration>,
    /// Overall timeout of HTTP actions
    #[arg(long, value_parser = humantime::parse_duration)]
    pub http_timeout: Option<Duration>,
    /// Tracing filter directive (RUST_LOG takes precedence)
    #[arg(long)]
    pub log_filter: Option<String>,
    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Contents of the TOML configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub manifests: Option<PathBuf>,
    pub workers: Option<usize>,
    #[serde(with = "humantime_serde")]
    pub tick: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub rescan: Option<Duration>,
    pub dispatch_errors: Option<DispatchErrors>,
    pub grpcurl: Option<PathBuf>,
    pub plaintext: Option<bool>,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub http_timeout: Option<Duration>,
    pub log_filter: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved daemon configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub manifests: PathBuf,
    pub workers: usize,
    pub tick: Duration,
    pub rescan: Duration,
    pub dispatch_errors: DispatchErrors,
    pub grpcurl: PathBuf,
    pub plaintext: bool,
    pub connect_timeout: Duration,
    pub http_timeout: Duration,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifests: PathBuf::from("./scenarios"),
            workers: 2,
            tick: Duration::from_secs(1),
            rescan: Duration::from_secs(2),
            dispatch_errors: DispatchErrors::Fail,
            grpcurl: PathBuf::from("grpcurl"),
            plaintext: true,
            connect_timeout: Duration::from_secs(10),
            http_timeout: Duration::from_secs(30),
            log_filter: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Build the configuration from parsed flags, reading `--config` if given
    pub fn load(args: Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(args, file)
    }

    /// Layer flags over file values over defaults
    pub fn resolve(args: Args, file: FileConfig) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let config = Config {
            manifests: args
                .manifests
                .or(file.manifests)
                .unwrap_or(defaults.manifests),
            workers: args.workers.or(file.workers).unwrap_or(defaults.workers),
            tick: args.tick.or(file.tick).unwrap_or(defaults.tick),
            rescan: args.rescan.or(file.rescan).unwrap_or(defaults.rescan),
            dispatch_errors: args
                .dispatch_errors
                .or(file.dispatch_errors)
                .unwrap_or(defaults.dispatch_errors),
            grpcurl: args.grpcurl.or(file.grpcurl).unwrap_or(defaults.grpcurl),
            plaintext: args
                .plaintext
                .or(file.plaintext)
                .unwrap_or(defaults.plaintext),
            connect_timeout: args
                .connect_timeout
                .or(file.connect_timeout)
                .unwrap_or(defaults.connect_timeout),
            http_timeout: args
                .http_timeout
                .or(file.http_timeout)
                .unwrap_or(defaults.http_timeout),
            log_filter: args
                .log_filter
                .or(file.log_filter)
                .unwrap_or(defaults.log_filter),
            log_file: args.log_file.or(file.log_file),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".to_string()));
        }
        for (name, value) in [
            ("tick", self.tick),
            ("rescan", self.rescan),
            ("connect_timeout", self.connect_timeout),
            ("http_timeout", self.http_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::Invalid(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }

    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            tick: self.tick,
            on_dispatch_error: self.dispatch_errors.into(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
