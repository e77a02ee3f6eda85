use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Output options for encoding a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Pretty-print JSON text
    #[serde(default = "default_true")]
    pub pretty: bool,
    /// Emit a readable `kindString` next to the numeric `kind`
    #[serde(default = "default_true")]
    pub kind_strings: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            kind_strings: true,
        }
    }
}

impl SerializerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(content)?)
    }
}

impl FromStr for SerializerConfig {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
