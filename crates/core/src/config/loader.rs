use crate::config::types::{ConfigFile, ConfigOverrides, LoggingConfig, ResolvedConfig};
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("home directory not available to expand '{0}'")]
    NoHome(String),

    #[error("the specified org-roam root '{0}' does not exist or is not a directory")]
    InvalidRoamRoot(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration and apply command-line overrides.
    ///
    /// An explicit `config_path` must exist. Without one, the default location
    /// is used when present and built-in defaults otherwise.
    pub fn load(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<ResolvedConfig, ConfigError> {
        let (cf, loaded_from) = match config_path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.display().to_string()));
                }
                (read_config(p)?, Some(p.to_path_buf()))
            }
            None => {
                let p = default_config_path();
                if p.exists() {
                    let cf = read_config(&p)?;
                    (cf, Some(p))
                } else {
                    (ConfigFile::default(), None)
                }
            }
        };

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }

        Self::resolve(cf, loaded_from, overrides)
    }

    fn resolve(
        cf: ConfigFile,
        config_path: Option<PathBuf>,
        overrides: &ConfigOverrides,
    ) -> Result<ResolvedConfig, ConfigError> {
        let roam_root = match &overrides.roam_root {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(ConfigError::InvalidRoamRoot(dir.display().to_string()));
                }
                dir.clone()
            }
            None => expand_path(&cf.paths.roam_root)?,
        };

        let database = match &overrides.database {
            Some(p) => p.clone(),
            None => expand_path(&cf.paths.database)?,
        };
        let input_dir = match &overrides.input_dir {
            Some(p) => p.clone(),
            None => expand_path(&cf.paths.input_dir)?,
        };
        let output_dir = match &overrides.output_dir {
            Some(p) => p.clone(),
            None => expand_path(&cf.paths.output_dir)?,
        };

        let mut converter = cf.converter;
        if let Some(program) = &overrides.program {
            converter.program = program.clone();
        }

        // Resolve log file path if present
        let log_file = cf
            .logging
            .file
            .as_ref()
            .map(|file| expand_path(&file.to_string_lossy()))
            .transpose()?;
        let mut logging = LoggingConfig { file: log_file, ..cf.logging };
        if overrides.debug {
            logging.level = "debug".to_string();
            logging.debug = true;
        }

        Ok(ResolvedConfig {
            config_path,
            database,
            input_dir,
            output_dir,
            roam_root,
            converter,
            logging,
        })
    }
}

fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let s = fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

    toml::from_str(&s).map_err(|e| ConfigError::ParseError(path.display().to_string(), e))
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("roam2md").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("roam2md").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome(input.to_string()))?;
    Ok(PathBuf::from(expanded.to_string()))
}
