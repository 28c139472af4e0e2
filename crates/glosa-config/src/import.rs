use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{env_flag, env_or};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Directory holding one XML file per entry
    pub input_directory: PathBuf,
    /// Extension of entry files, without the dot
    pub extension: String,
    /// Abort the batch at the first failing entry
    pub fail_fast: bool,
}

impl ImportConfig {
    pub fn new() -> Self {
        Self {
            input_directory: PathBuf::from(env_or("GLOSA_INPUT_DIR", "data")),
            extension: env_or("GLOSA_INPUT_EXTENSION", "xml"),
            fail_fast: env_flag("GLOSA_FAIL_FAST", false),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::new()
    }
}
