// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine settings document.
//!
//! A TOML file read once at boot. Loading never fails the engine: a
//! missing or malformed setting degrades to an empty string with a
//! logged warning, and the collaborators that need the value surface
//! the fault downstream.

use std::path::Path;

/// Engine-wide settings.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Folder watched for `*.xml` workflow definitions.
    pub workflows_folder: String,
    /// Where removed definition files are moved by front-ends.
    pub trash_folder: String,
    /// Scratch directory for task execution; created at boot if absent.
    pub temp_folder: String,
    /// Path of the workflow schema.
    pub xsd: String,
    /// Task catalog file, consumed by the loader's collaborators.
    pub tasks_names_file: String,
    /// Task settings file, consumed by the loader's collaborators.
    pub tasks_settings_file: String,
    /// Passed verbatim to the persistence collaborator.
    pub connection_string: String,
}

impl Settings {
    /// Read settings from `path`. IO and parse failures yield all-empty
    /// settings; the engine still boots.
    pub fn load(path: &Path) -> Settings {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "settings file unreadable, using empty settings");
                return Settings::default();
            }
        };

        let table = match content.parse::<toml::Table>() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "settings file malformed, using empty settings");
                toml::Table::new()
            }
        };

        let settings = Settings {
            workflows_folder: setting(&table, "workflows_folder"),
            trash_folder: setting(&table, "trash_folder"),
            temp_folder: setting(&table, "temp_folder"),
            xsd: setting(&table, "xsd"),
            tasks_names_file: setting(&table, "tasks_names_file"),
            tasks_settings_file: setting(&table, "tasks_settings_file"),
            connection_string: setting(&table, "connection_string"),
        };
        settings.ensure_temp_folder();
        settings
    }

    fn ensure_temp_folder(&self) {
        if self.temp_folder.is_empty() {
            return;
        }
        let path = Path::new(&self.temp_folder);
        if path.is_dir() {
            return;
        }
        if let Err(e) = std::fs::create_dir_all(path) {
            tracing::error!(path = %path.display(), error = %e, "failed to create temp folder");
        }
    }
}

fn setting(table: &toml::Table, name: &str) -> String {
    match table.get(name) {
        Some(toml::Value::String(value)) => value.clone(),
        Some(other) => {
            tracing::warn!(
                setting = name,
                found = other.type_str(),
                "setting malformed, defaulting to empty"
            );
            String::new()
        }
        None => {
            tracing::warn!(setting = name, "setting missing, defaulting to empty");
            String::new()
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
