use serde::{Deserialize, Serialize};

use crate::env_or;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
    pub format: LogFormat,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            filter: env_or("GLOSA_LOG", "info"),
            format: LogFormat::parse(&env_or("GLOSA_LOG_FORMAT", "pretty")),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}
