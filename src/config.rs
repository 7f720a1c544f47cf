// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::ledger::Granularity;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Logbook", "logbook"));

pub const EXPORT_FILE: &str = "Business_logbook.xlsx";
pub const DEFAULT_CURRENCY: &str = "₦";

pub const KEY_CURRENCY: &str = "currency";
pub const KEY_GRANULARITY: &str = "granularity";
pub const KEY_EXPORT_PATH: &str = "export_path";
pub const KEYS: [&str; 3] = [KEY_CURRENCY, KEY_GRANULARITY, KEY_EXPORT_PATH];

pub fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let dir = proj.data_dir();
    fs::create_dir_all(dir).context("Failed to create data dir")?;
    Ok(dir.to_path_buf())
}

/// User preferences persisted in the `settings` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub currency: String,
    pub granularity: Granularity,
    pub export_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency: DEFAULT_CURRENCY.to_string(),
            granularity: Granularity::Day,
            export_path: None,
        }
    }
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Settings> {
        let mut s = Settings::default();
        if let Some(v) = get(conn, KEY_CURRENCY)? {
            s.currency = v;
        }
        if let Some(v) = get(conn, KEY_GRANULARITY)? {
            s.granularity = v
                .parse()
                .with_context(|| format!("Invalid stored granularity '{}'", v))?;
        }
        if let Some(v) = get(conn, KEY_EXPORT_PATH)? {
            s.export_path = Some(PathBuf::from(v));
        }
        Ok(s)
    }

    /// Where `export` writes when no `--out` is given.
    pub fn resolved_export_path(&self) -> Result<PathBuf> {
        match &self.export_path {
            Some(p) => Ok(p.clone()),
            None => Ok(data_dir()?.join(EXPORT_FILE)),
        }
    }
}

pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

/// Validates and stores a setting. Unknown keys are rejected.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        KEY_CURRENCY => {
            if value.is_empty() {
                return Err(anyhow!("Currency must not be empty"));
            }
        }
        KEY_GRANULARITY => {
            value.parse::<Granularity>()?;
        }
        KEY_EXPORT_PATH => {
            if value.is_empty() {
                return Err(anyhow!("Export path must not be empty"));
            }
        }
        other => {
            return Err(anyhow!(
                "Unknown setting '{}' (expected one of: {})",
                other,
                KEYS.join(", ")
            ));
        }
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
