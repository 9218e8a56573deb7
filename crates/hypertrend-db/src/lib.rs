// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use hypertrend_app::{Holding, SettingKey, ThemeMode};
use rusqlite::{Connection, OptionalExtension, params};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

pub const APP_NAME: &str = "hypertrend";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[("settings", &["key", "value", "updated_at"])];

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        info!(
            component = "store",
            event = "store.open",
            path = %path.display()
        );
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }
        Ok(())
    }

    pub fn get_setting(&self, key: SettingKey) -> Result<Option<String>> {
        let key = key.as_str();
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("read setting {key}"))
    }

    pub fn put_setting(&self, key: SettingKey, value: &str) -> Result<()> {
        let key = key.as_str();
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO settings (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, now],
            )
            .with_context(|| format!("upsert setting {key}"))?;
        Ok(())
    }

    pub fn theme_preference(&self) -> ThemePreference<'_> {
        ThemePreference { store: self }
    }
}

/// Light/dark preference persisted under the `theme` setting.
pub struct ThemePreference<'a> {
    store: &'a Store,
}

impl ThemePreference<'_> {
    /// Missing or unrecognized values read as light.
    pub fn get(&self) -> Result<ThemeMode> {
        let Some(raw) = self.store.get_setting(SettingKey::Theme)? else {
            return Ok(ThemeMode::Light);
        };
        match ThemeMode::parse(&raw) {
            Some(mode) => Ok(mode),
            None => {
                warn!(
                    component = "store",
                    event = "theme.invalid",
                    value = %raw,
                    "unrecognized theme value, using light"
                );
                Ok(ThemeMode::Light)
            }
        }
    }

    pub fn set(&self, mode: ThemeMode) -> Result<()> {
        self.store.put_setting(SettingKey::Theme, mode.as_str())
    }
}

/// Reads a JSON array of holdings with camelCase field names.
pub fn read_holdings_file(path: &Path) -> Result<Vec<Holding>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read holdings file {}", path.display()))?;
    let holdings: Vec<Holding> = serde_json::from_str(&raw).with_context(|| {
        format!(
            "parse holdings file {} -- expected a JSON array of objects with symbol, company, qty, avgPrice, ltp, currentValue, pnl, pnlPercent, dayChange, dayChangePercent",
            path.display()
        )
    })?;
    info!(
        component = "store",
        event = "holdings.load",
        path = %path.display(),
        count = holdings.len()
    );
    Ok(holdings)
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("HYPERTREND_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set HYPERTREND_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("hypertrend.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        let columns = table_columns(conn, table)?;
        if columns.is_empty() {
            bail!(
                "database is missing required table `{table}`; point [storage].db_path at a hypertrend database"
            );
        }

        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.iter().any(|existing| existing == column))
            .collect();
        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; delete the database to recreate it",
                missing.join(", ")
            );
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?)")
        .with_context(|| format!("prepare column query for {table}"))?;
    let rows = stmt
        .query_map(params![table], |row| row.get::<_, String>(0))
        .with_context(|| format!("query columns for {table}"))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}
