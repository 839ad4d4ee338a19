use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Publish-to-web identifier of the sheet the calendar ships with.
const DEFAULT_SHEET_ID: &str =
    "2PACX-1vTzGJ8fZJ0jl7ivdqAYZk2YmAaOBqmjm7rA932tMkES-xqONk7vqLJXnlDjYIICAbm8A2orUW-zuhGK";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub sheet: SheetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetConfig {
    pub sheet_id: String,
    pub gid: u32,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sheetcal")
            .join("config.toml")
    }

    /// A missing config file is not an error; the embedded sheet
    /// identifier applies. Nothing is ever written back.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet: SheetConfig {
                sheet_id: DEFAULT_SHEET_ID.to_string(),
                gid: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn default_config_carries_the_embedded_sheet_id() {
        let config = Config::default();

        assert!(!config.sheet.sheet_id.is_empty());
        assert_eq!(config.sheet.gid, 0);
    }

    #[test]
    fn parses_a_minimal_toml_config() {
        let config = Config::from_toml("[sheet]\nsheet_id = \"MY-SHEET\"\ngid = 3\n").unwrap();

        assert_eq!(config.sheet.sheet_id, "MY-SHEET");
        assert_eq!(config.sheet.gid, 3);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let result = Config::from_toml("[sheet]\nsheet_id = 42\n");

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn loads_from_a_file_on_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[sheet]\nsheet_id = \"FROM-DISK\"\ngid = 1\n").unwrap();

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.sheet.sheet_id, "FROM-DISK");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = Config::load_from(Path::new("/nonexistent/sheetcal.toml"));

        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
