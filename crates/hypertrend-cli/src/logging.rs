// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Subscriber setup. The terminal belongs to the TUI, so events go to a
//! log file or nowhere.

use std::env;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const LEVEL_ENV: &str = "HYPERTREND_LOG_LEVEL";
pub const FORMAT_ENV: &str = "HYPERTREND_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// `None` discards every event.
    pub path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Pretty,
            path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingInitError {
    #[error("open log file {path}: {source}")]
    OpenFile { path: PathBuf, source: io::Error },
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Environment values win over the config file. Blank or unknown values
/// are ignored.
pub fn apply_env_overrides(mut config: LoggingConfig) -> LoggingConfig {
    if let Ok(level) = env::var(LEVEL_ENV) {
        let trimmed = level.trim();
        if !trimmed.is_empty() {
            config.level = trimmed.to_owned();
        }
    }

    if let Ok(format) = env::var(FORMAT_ENV)
        && let Some(parsed) = LogFormat::parse(&format)
    {
        config.format = parsed;
    }

    config
}

pub fn valid_level(level: &str) -> bool {
    EnvFilter::try_new(level).is_ok()
}

pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingInitError> {
    let env_filter =
        EnvFilter::try_new(config.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let writer = match &config.path {
        Some(path) => BoxMakeWriter::new(Mutex::new(open_log_file(path)?)),
        None => BoxMakeWriter::new(io::sink),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false);

    match config.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.pretty().finish())?,
    }

    Ok(())
}

pub fn log_app_start(config: &LoggingConfig, config_path: &Path) {
    info!(
        component = "cli",
        event = "app.start",
        log_level = %config.level,
        log_format = config.format.as_str(),
        config_path = %config_path.display()
    );
}

fn open_log_file(path: &Path) -> Result<fs::File, LoggingInitError> {
    let open_error = |source| LoggingInitError::OpenFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(open_error)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_error)
}
