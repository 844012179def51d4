use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::log_warn;

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "bitvoyager::settings";

pub const DATA_DIR_ENV: &str = "BITVOYAGER_DATA_DIR";
pub const DEBUG_ENV: &str = "BITVOYAGER_DEBUG";
const DEFAULT_DATA_DIR: &str = ".bitvoyager";
const SETTINGS_FILE: &str = "settings.json";

/// Operator-tunable settings, read from `settings.json` in the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerSettings {
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub database_file: String,
    /// Where exports land; the data directory when unset.
    pub export_dir: Option<PathBuf>,
    /// Question ids `1..=question_count` are offered to the selector.
    pub question_count: u32,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            database_file: "bitvoyager.sqlite3".into(),
            export_dir: None,
            question_count: 29,
        }
    }
}

impl TrackerSettings {
    pub fn load(data_dir: PathBuf) -> Result<Self> {
        let path = data_dir.join(SETTINGS_FILE);
        let mut settings = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring malformed {}: {err}", path.display());
                TrackerSettings::default()
            })
        } else {
            TrackerSettings::default()
        };

        settings.data_dir = data_dir;
        Ok(settings)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn export_dir(&self) -> &Path {
        self.export_dir.as_deref().unwrap_or(&self.data_dir)
    }
}

/// `--data-dir` wins, then `BITVOYAGER_DATA_DIR`, then `./.bitvoyager`.
pub fn resolve_data_dir(cli_override: Option<PathBuf>) -> PathBuf {
    cli_override
        .or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn debug_enabled() -> bool {
    env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
