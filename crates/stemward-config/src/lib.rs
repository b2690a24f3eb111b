pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing directly at a config file
pub const CONFIG_ENV: &str = "STEMWARD_CONFIG";

const CANDIDATES: [&str; 2] = ["stemward.local.yml", "stemward.yml"];

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StemwardConfig {
    /// Directory holding `state.json`
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    pub cpi: CpiConfig,
}

/// How to reach the CPI executable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpiConfig {
    pub command: PathBuf,

    #[serde(default)]
    pub args: Vec<String>,

    /// Upper bound for a single CPI call
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub director_uuid: Option<String>,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".stemward")
}

impl StemwardConfig {
    /// Parse a config file, resolving relative paths against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: StemwardConfig = serde_yaml::from_str(&content)?;

        if config.cpi.command.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: "cpi.command must not be empty".to_string(),
            });
        }

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        if config.state_dir.is_relative() {
            config.state_dir = base.join(&config.state_dir);
        }
        // bare names are looked up on PATH
        if config.cpi.command.is_relative() && config.cpi.command.components().count() > 1 {
            config.cpi.command = base.join(&config.cpi.command);
        }

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// stemward's global config directory (not created)
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("stemward"))
}

/// Locate the config file
///
/// Search order:
/// 1. `STEMWARD_CONFIG`
/// 2. current directory: stemward.local.yml, stemward.yml
/// 3. `./.stemward/` with the same names
/// 4. `~/.config/stemward/stemward.yml`
pub fn find_config_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(CONFIG_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!("{} points at missing file {}", CONFIG_ENV, path.display());
    }

    let current_dir = std::env::current_dir()?;

    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let local_dir = current_dir.join(".stemward");
    if local_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = local_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    if let Ok(config_dir) = get_config_dir() {
        let global_config = config_dir.join("stemward.yml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}
