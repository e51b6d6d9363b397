//! Converting every indexed note and writing it to the output tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use super::converter::{ConversionError, ConvertOptions, Converter};
use super::links::rewrite_links;
use crate::index::{Note, NoteId, NoteIndex};

/// Why a single note could not be converted. Never fatal to a run.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("failed to read source file {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A note that failed to convert.
#[derive(Debug)]
pub struct NoteFailure {
    pub id: NoteId,
    pub title: String,
    pub error: NoteError,
}

/// The result of converting one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedNote {
    pub output_path: PathBuf,
    pub links_resolved: usize,
    pub links_missing: usize,
}

/// Statistics from a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertStats {
    /// Number of notes attempted.
    pub notes: usize,
    /// Number of output files written.
    pub converted: usize,
    /// Number of notes that failed.
    pub failed: usize,
    /// Number of `id:` links rewritten to wikilinks.
    pub links_resolved: usize,
    /// Number of `id:` links whose target was not in the index.
    pub links_missing: usize,
    /// Run duration in milliseconds.
    pub duration_ms: u64,
}

#[derive(Debug, Default)]
pub struct ConvertReport {
    pub stats: ConvertStats,
    pub failures: Vec<NoteFailure>,
}

impl ConvertReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Converts the notes of a [`NoteIndex`] one at a time.
pub struct ConversionPipeline<'a> {
    index: &'a NoteIndex,
    converter: &'a dyn Converter,
    options: ConvertOptions,
    output_dir: PathBuf,
}

impl<'a> ConversionPipeline<'a> {
    pub fn new(
        index: &'a NoteIndex,
        converter: &'a dyn Converter,
        options: ConvertOptions,
        output_dir: &Path,
    ) -> Self {
        Self { index, converter, options, output_dir: output_dir.to_path_buf() }
    }

    /// Convert every note in index order.
    ///
    /// A failing note is logged and recorded in the report; the run continues.
    pub fn run(&self) -> ConvertReport {
        let start = Instant::now();
        let mut report = ConvertReport::default();

        for note in self.index.iter() {
            report.stats.notes += 1;
            tracing::info!("Converting: {}", note.raw_title);

            match self.convert_one(note) {
                Ok(converted) => {
                    report.stats.converted += 1;
                    report.stats.links_resolved += converted.links_resolved;
                    report.stats.links_missing += converted.links_missing;
                }
                Err(e) => {
                    tracing::warn!("Failed to convert and write note: {}", note.raw_title);
                    tracing::warn!("\tError: {}", e);
                    tracing::debug!("\t{:?}", e);
                    report.stats.failed += 1;
                    report.failures.push(NoteFailure {
                        id: note.id.clone(),
                        title: note.raw_title.clone(),
                        error: e,
                    });
                }
            }
        }

        report.stats.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!("Done converting.");
        report
    }

    /// Read, convert, rewrite and write a single note.
    pub fn convert_one(&self, note: &Note) -> Result<ConvertedNote, NoteError> {
        let raw = fs::read_to_string(&note.source_path).map_err(|source| {
            NoteError::SourceRead { path: note.source_path.clone(), source }
        })?;

        let converted = self.converter.convert(&raw, &self.options)?;
        let rewritten = rewrite_links(&converted, self.index);

        let out_path = self.output_dir.join(&note.output_path);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|source| NoteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&out_path, &rewritten.text)
            .map_err(|source| NoteError::Write { path: out_path.clone(), source })?;

        tracing::debug!("\twrote {}", out_path.display());
        Ok(ConvertedNote {
            output_path: out_path,
            links_resolved: rewritten.resolved,
            links_missing: rewritten.unresolved,
        })
    }
}
