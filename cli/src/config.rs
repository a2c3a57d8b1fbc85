use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use ruletree::EditorConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub editor: EditorConfig,
}

impl Config {
    /// Load `ruletree.toml`, from inside `path` when it is a directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path = if path.is_dir() {
            path.join("ruletree.toml")
        } else {
            path.to_owned()
        };
        let string = read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&path, &string)
    }

    fn parse(path: &Path, string: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str(string).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!(?config, "Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use ruletree::MovePolicy;

    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse(Path::new("ruletree.toml"), "").unwrap();
        assert_eq!(config.editor, EditorConfig::default());
    }

    #[test]
    fn reads_editor_settings() {
        let toml = r#"
            move_policy = "reject"
            default_relation = "or"
        "#;
        let config = Config::parse(Path::new("ruletree.toml"), toml).unwrap();
        assert_eq!(config.editor.move_policy, MovePolicy::Reject);
        assert_eq!(config.editor.default_relation, "or");
    }

    #[test]
    fn parse_errors_name_the_file() {
        let err = Config::parse(Path::new("conf/ruletree.toml"), "move_policy = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("conf/ruletree.toml"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load(Path::new("/nonexistent/ruletree.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
