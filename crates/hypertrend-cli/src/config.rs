// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use hypertrend_app::{ColumnKey, DEFAULT_ITEMS_PER_PAGE, HoldingColumn, SortSpec};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::logging::{self, LogFormat, LoggingConfig};

const CONFIG_VERSION: i64 = 1;
const DEFAULT_SORT: &str = "currentValue:desc";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "info";
const MAX_ITEMS_PER_PAGE: i64 = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            api: Api::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
    pub holdings_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub items_per_page: Option<i64>,
    pub default_sort: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            items_per_page: Some(DEFAULT_ITEMS_PER_PAGE as i64),
            default_sort: Some(DEFAULT_SORT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    pub token: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            base_url: Some(hypertrend_api::DEFAULT_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub format: Option<String>,
    pub path: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            format: Some(LogFormat::Pretty.as_str().to_owned()),
            path: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("HYPERTREND_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set HYPERTREND_CONFIG_PATH to the config file"
            )
        })?;

        let app_dir = config_root.join(hypertrend_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [storage], [ui], [api], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        info!(
            component = "config",
            event = "config.load",
            path = %path.display(),
            api_enabled = config.api_enabled()
        );
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            hypertrend_db::validate_db_path(db_path)?;
        }

        if let Some(holdings_path) = &self.storage.holdings_path
            && holdings_path.trim().is_empty()
        {
            bail!(
                "storage.holdings_path in {} is empty; remove it to use the built-in sample holdings",
                path.display()
            );
        }

        if let Some(items) = self.ui.items_per_page
            && !(1..=MAX_ITEMS_PER_PAGE).contains(&items)
        {
            bail!(
                "ui.items_per_page in {} must be between 1 and {MAX_ITEMS_PER_PAGE}, got {items}",
                path.display()
            );
        }

        if let Some(sort) = &self.ui.default_sort {
            parse_sort(sort).with_context(|| format!("ui.default_sort in {}", path.display()))?;
        }

        if let Some(base_url) = &self.api.base_url {
            let parsed = Url::parse(base_url).with_context(|| {
                format!(
                    "api.base_url {base_url:?} in {} is not a valid URL",
                    path.display()
                )
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!(
                    "api.base_url in {} must use http:// or https://, got {base_url:?}",
                    path.display()
                );
            }
        }

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed.is_zero() {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(level) = &self.log.level
            && !logging::valid_level(level)
        {
            bail!(
                "log.level {level:?} in {} is not a valid filter; use error, warn, info, debug, or trace",
                path.display()
            );
        }

        if let Some(format) = &self.log.format
            && LogFormat::parse(format).is_none()
        {
            bail!(
                "log.format {format:?} in {} is not supported; use \"pretty\" or \"json\"",
                path.display()
            );
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => hypertrend_db::default_db_path(),
        }
    }

    pub fn holdings_path(&self) -> Option<PathBuf> {
        self.storage.holdings_path.as_deref().map(PathBuf::from)
    }

    pub fn items_per_page(&self) -> usize {
        self.ui
            .items_per_page
            .and_then(|items| usize::try_from(items).ok())
            .filter(|items| *items > 0)
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
    }

    pub fn default_sort(&self) -> Result<SortSpec<HoldingColumn>> {
        parse_sort(self.ui.default_sort.as_deref().unwrap_or(DEFAULT_SORT))
    }

    pub fn api_enabled(&self) -> bool {
        self.api.enabled.unwrap_or(true)
    }

    pub fn api_base_url(&self) -> &str {
        self.api
            .base_url
            .as_deref()
            .unwrap_or(hypertrend_api::DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn api_timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api.token.as_deref()
    }

    /// Config-file logging settings with environment overrides applied.
    pub fn logging(&self) -> Result<LoggingConfig> {
        let format = match self.log.format.as_deref() {
            Some(raw) => LogFormat::parse(raw)
                .ok_or_else(|| anyhow!("log.format {raw:?} is not supported"))?,
            None => LogFormat::Pretty,
        };
        let path = match &self.log.path {
            Some(path) => PathBuf::from(path),
            None => default_log_path()?,
        };
        Ok(logging::apply_env_overrides(LoggingConfig {
            level: self
                .log
                .level
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            format,
            path: Some(path),
        }))
    }

    pub fn example_config(path: &Path) -> String {
        let columns = HoldingColumn::ALL
            .iter()
            .map(|column| column.key())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "# hypertrend config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is the platform data dir (for example ~/.local/share/hypertrend/hypertrend.db)\n# db_path = \"/absolute/path/to/hypertrend.db\"\n# Optional JSON array of holdings; the built-in sample is used when unset\n# holdings_path = \"/absolute/path/to/holdings.json\"\n\n[ui]\nitems_per_page = {}\n# <column>[:asc|desc]; columns: {columns}\ndefault_sort = \"{}\"\n\n[api]\nenabled = true\nbase_url = \"{}\"\ntimeout = \"{}\"\n# token = \"\"\n\n[log]\nlevel = \"{}\"\nformat = \"pretty\"\n# path = \"/absolute/path/to/hypertrend.log\"\n",
            path.display(),
            DEFAULT_ITEMS_PER_PAGE,
            DEFAULT_SORT,
            hypertrend_api::DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

pub fn parse_sort(raw: &str) -> Result<SortSpec<HoldingColumn>> {
    SortSpec::parse(raw).ok_or_else(|| {
        let columns = HoldingColumn::ALL
            .iter()
            .map(|column| column.key())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("invalid sort {raw:?}; use <column>[:asc|desc] with one of: {columns}")
    })
}

fn default_log_path() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set [log].path to a writable file")
    })?;
    Ok(data_root
        .join(hypertrend_db::APP_NAME)
        .join("hypertrend.log"))
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}
