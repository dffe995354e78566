use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_CONFIG_FILE, DEFAULT_PREVIEW_DEBOUNCE_MS, DEFAULT_STORE_DIR,
    ENV_PREFIX,
};

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct Settings {
    /// Directory of the file-backed snapshot store
    pub store_dir: PathBuf,

    #[validate(range(min = 1))]
    pub chunk_size: usize,

    #[validate(range(max = 10000))]
    pub preview_debounce_ms: u64,
}

impl Settings {
    /// Load defaults, then the config file (explicit path, or `rtwqms.toml` when
    /// present), then `RTWQMS_*` environment variables.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let file_source = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("store_dir", DEFAULT_STORE_DIR)?
            .set_default("chunk_size", DEFAULT_CHUNK_SIZE as u64)?
            .set_default("preview_debounce_ms", DEFAULT_PREVIEW_DEBOUNCE_MS)?
            .add_source(file_source)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            chunk_size: DEFAULT_CHUNK_SIZE,
            preview_debounce_ms: DEFAULT_PREVIEW_DEBOUNCE_MS,
        }
    }
}
