//! The external markup converter.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use serde::Deserialize;
use thiserror::Error;

use crate::config::ConverterConfig;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to start converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("converter I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("converter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("converter produced output that is not valid UTF-8")]
    InvalidUtf8,
}

/// Line wrapping applied by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    /// No wrapping. Keeps link syntax on one line.
    #[default]
    None,
    Auto,
    Preserve,
}

impl WrapMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Auto => "auto",
            Self::Preserve => "preserve",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub from: String,
    pub to: String,
    pub wrap: WrapMode,
    pub standalone: bool,
}

impl ConvertOptions {
    pub fn from_config(cfg: &ConverterConfig) -> Self {
        Self {
            from: cfg.from.clone(),
            to: cfg.to.clone(),
            wrap: cfg.wrap,
            standalone: cfg.standalone,
        }
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::from_config(&ConverterConfig::default())
    }
}

/// Converts note text from one markup format to another.
pub trait Converter {
    fn convert(&self, source: &str, options: &ConvertOptions) -> Result<String, ConversionError>;
}

/// Runs `pandoc` (or a compatible program), feeding the note on stdin.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: PathBuf,
}

impl PandocConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    pub fn args(options: &ConvertOptions) -> Vec<String> {
        let mut args = vec![
            "--from".to_string(),
            options.from.clone(),
            "--to".to_string(),
            options.to.clone(),
            format!("--wrap={}", options.wrap.as_str()),
        ];
        if options.standalone {
            args.push("--standalone".to_string());
        }
        args
    }
}

impl Converter for PandocConverter {
    fn convert(&self, source: &str, options: &ConvertOptions) -> Result<String, ConversionError> {
        let mut child = Command::new(&self.program)
            .args(Self::args(options))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ConversionError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // Write stdin from a separate thread so a large document cannot
        // deadlock against a full stdout pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("converter stdin unavailable"))?;
        let input = source.to_owned();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;

        match writer.join() {
            Ok(Ok(())) => {}
            // The exit status below explains why the converter stopped reading.
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(ConversionError::Io(e)),
            Err(_) => return Err(io::Error::other("converter stdin writer panicked").into()),
        }

        if !output.status.success() {
            return Err(ConversionError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ConversionError::InvalidUtf8)
    }
}
