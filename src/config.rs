// discuss-kit - Mention-aware input and threaded discussions
// Copyright (C) 2025  The discuss-kit authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::mention::{DEFAULT_DEBOUNCE, DEFAULT_MAX_SUGGESTIONS, SessionOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEBOUNCE_ENV: &str = "DISCUSS_DEBOUNCE_MS";
pub const MAX_SUGGESTIONS_ENV: &str = "DISCUSS_MAX_SUGGESTIONS";
pub const DIRECTORY_URL_ENV: &str = "DISCUSS_DIRECTORY_URL";

const CONFIG_DIR_NAME: &str = "discuss-kit";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 4000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {path} is invalid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("environment variable {name} has invalid value `{value}`")]
    InvalidEnv { name: &'static str, value: String },
}

/// Tunables for the mention session. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub debounce_ms: u64,
    pub max_suggestions: usize,
    pub directory_url: Option<String>,
    pub request_timeout_ms: u64,
}

impl Default for Settings {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            directory_url: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// Defaults, then the settings file, then environment overrides.
    ///
    /// An explicit `path` must exist. Without one the per-user config file is
    /// read when present and silently skipped otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        settings.apply_env(|name| std::env::var(name).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let settings = serde_json::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        tracing::debug!(path = %path.display(), "loaded settings file");
        Ok(settings)
    }

    /// Apply `DISCUSS_*` overrides looked up through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup(DEBOUNCE_ENV) {
            self.debounce_ms = parse_env(DEBOUNCE_ENV, value)?;
        }
        if let Some(value) = lookup(MAX_SUGGESTIONS_ENV) {
            self.max_suggestions = parse_env(MAX_SUGGESTIONS_ENV, value)?;
        }
        if let Some(value) = lookup(DIRECTORY_URL_ENV) {
            let value = value.trim();
            self.directory_url = (!value.is_empty()).then(|| value.to_owned());
        }
        Ok(())
    }

    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            debounce: Duration::from_millis(self.debounce_ms),
            max_suggestions: self.max_suggestions,
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv { name, value })
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE))
}
