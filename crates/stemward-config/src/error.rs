use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error(
        "Config file not found. Looked in:\n\
        - current directory: stemward.local.yml, stemward.yml\n\
        - ./.stemward/ directory\n\
        - ~/.config/stemward/stemward.yml\n\
        Set STEMWARD_CONFIG to point at a file directly"
    )]
    ConfigFileNotFound,

    #[error("Invalid config {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
