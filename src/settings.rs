use crate::error::Result;
use crate::ingest::IngestOptions;
use crate::utils::constants::{CONFIG_FILE_STEM, DEFAULT_DB_FILE, DEFAULT_JSON_FILE, ENV_PREFIX};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Layered configuration: built-in defaults, then `cwa-temps.toml` (or an
/// explicit file), then `CWA_TEMPS_*` environment variables. CLI flags are
/// applied on top by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub json_path: PathBuf,
    pub db_path: PathBuf,
    pub strict_series: bool,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            .set_default("json_path", DEFAULT_JSON_FILE)?
            .set_default("db_path", DEFAULT_DB_FILE)?
            .set_default("strict_series", false)?;

        let builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(CONFIG_FILE_STEM).required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn with_json_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.json_path = path;
        }
        self
    }

    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.db_path = path;
        }
        self
    }

    /// A CLI flag can only switch strict mode on
    pub fn with_strict_series(mut self, strict: bool) -> Self {
        self.strict_series |= strict;
        self
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions::new(&self.json_path, &self.db_path).with_strict_series(self.strict_series)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            json_path: PathBuf::from(DEFAULT_JSON_FILE),
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            strict_series: false,
        }
    }
}
