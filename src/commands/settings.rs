// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{self, KEY_CURRENCY, KEY_EXPORT_PATH, KEY_GRANULARITY, Settings};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            println!("{}", value_of(&Settings::load(conn)?, key)?);
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap();
            config::set(conn, key, value)?;
            println!("{} = {}", key, value.trim());
        }
        Some(("list", sub)) => {
            let settings = Settings::load(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &settings)? {
                let mut rows = Vec::new();
                for key in config::KEYS {
                    rows.push(vec![key.to_string(), value_of(&settings, key)?]);
                }
                println!("{}", pretty_table(&["Key", "Value"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn value_of(settings: &Settings, key: &str) -> Result<String> {
    match key {
        KEY_CURRENCY => Ok(settings.currency.clone()),
        KEY_GRANULARITY => Ok(settings.granularity.to_string()),
        KEY_EXPORT_PATH => Ok(settings.resolved_export_path()?.display().to_string()),
        other => Err(anyhow!("Unknown setting '{}'", other)),
    }
}
