// config.rs - Persistent settings for the command-line frontend

use crate::symspell::{DEFAULT_COUNT_THRESHOLD, DEFAULT_MAX_EDIT_DISTANCE, DEFAULT_PREFIX_LENGTH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Frequency dictionary loaded when no --dictionary flag is given.
    pub dictionary: Option<PathBuf>,
    pub term_index: usize,
    pub count_index: usize,
    pub max_edit_distance: usize,
    pub prefix_length: usize,
    pub count_threshold: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: None,
            term_index: 0,
            count_index: 1,
            max_edit_distance: DEFAULT_MAX_EDIT_DISTANCE,
            prefix_length: DEFAULT_PREFIX_LENGTH,
            count_threshold: DEFAULT_COUNT_THRESHOLD,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, confy::ConfyError> {
        match confy::load("spellfix", Some("config")) {
            Ok(config) => Ok(config),
            Err(err) => {
                eprintln!("Failed to load config, using defaults: {err}");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store("spellfix", Some("config"), self)
    }
}
