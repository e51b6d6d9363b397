use std::path::PathBuf;

use serde::Deserialize;

use crate::convert::WrapMode;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: 1,
            paths: PathsConfig::default(),
            converter: ConverterConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where the org-roam database and note tree live, and where output goes.
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// The org-roam SQLite database (`org-roam.db`).
    #[serde(default = "default_database")]
    pub database: String,
    /// Local copy of the org-roam directory tree.
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// The org-roam directory as recorded in the database's `file` column.
    /// Everything after it in a node's file path is rebased under `input_dir`.
    #[serde(default = "default_roam_root")]
    pub roam_root: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            roam_root: default_roam_root(),
        }
    }
}

fn default_database() -> String {
    "./input/org-roam.db".to_string()
}

fn default_input_dir() -> String {
    "input/roam".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_roam_root() -> String {
    "~/org-roam".to_string()
}

/// External converter invocation.
#[derive(Debug, Deserialize, Clone)]
pub struct ConverterConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_to")]
    pub to: String,
    #[serde(default)]
    pub wrap: WrapMode,
    #[serde(default = "default_standalone")]
    pub standalone: bool,
    /// Only notes whose source file has this extension are converted.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
    #[serde(default = "default_target_extension")]
    pub target_extension: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            from: default_from(),
            to: default_to(),
            wrap: WrapMode::default(),
            standalone: default_standalone(),
            source_extension: default_source_extension(),
            target_extension: default_target_extension(),
        }
    }
}

fn default_program() -> String {
    "pandoc".to_string()
}

fn default_from() -> String {
    "org".to_string()
}

fn default_to() -> String {
    "gfm".to_string()
}

fn default_standalone() -> bool {
    true
}

fn default_source_extension() -> String {
    "org".to_string()
}

fn default_target_extension() -> String {
    "md".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Set by `--debug`; forces debug output on stderr even when `RUST_LOG` is set.
    #[serde(skip)]
    pub debug: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None, debug: false }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub debug: bool,
    pub roam_root: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub program: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The config file that was read, if any.
    pub config_path: Option<PathBuf>,
    pub database: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub roam_root: PathBuf,
    pub converter: ConverterConfig,
    pub logging: LoggingConfig,
}
