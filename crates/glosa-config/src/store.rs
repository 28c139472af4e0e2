use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env_or;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one JSON file per entry
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(env_or("GLOSA_STORE_PATH", "glosa-store")),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}
