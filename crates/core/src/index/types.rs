//! Note records read from org-roam and the notes built from them.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use thiserror::Error;

use super::title::sanitize_title;
use crate::config::ResolvedConfig;

/// Stable org-roam node identifier, also the target of `id:` links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NoteId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Why a database row could not become a [`NoteRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unsupported value for field '{field}': {kind}")]
    UnsupportedValue { field: &'static str, kind: &'static str },
}

/// One row of the org-roam `nodes` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub id: NoteId,
    /// Absolute path of the note on the machine that built the database.
    pub file: String,
    pub title: String,
}

impl NoteRecord {
    /// Build a record from raw column values.
    ///
    /// org-roam stores text columns as printed elisp strings, so every `"`
    /// is dropped. Integer ids are accepted and stringified.
    pub fn from_values(id: Value, file: Value, title: Value) -> Result<Self, RecordError> {
        let id = match id {
            Value::Integer(n) => n.to_string(),
            other => text_field("id", other)?,
        };

        Ok(Self {
            id: NoteId::new(id),
            file: text_field("file", file)?,
            title: text_field("title", title)?,
        })
    }
}

fn text_field(field: &'static str, value: Value) -> Result<String, RecordError> {
    match value {
        Value::Text(s) => Ok(s.replace('"', "")),
        Value::Null => Err(RecordError::MissingField(field)),
        Value::Integer(_) => Err(RecordError::UnsupportedValue { field, kind: "integer" }),
        Value::Real(_) => Err(RecordError::UnsupportedValue { field, kind: "real" }),
        Value::Blob(_) => Err(RecordError::UnsupportedValue { field, kind: "blob" }),
    }
}

/// A record whose source file is not in the convertible markup format.
#[derive(Debug, Clone, Error)]
#[error("unsupported file extension '{extension}' for note '{title}' ({path})")]
pub struct UnsupportedFormatError {
    pub title: String,
    pub path: PathBuf,
    pub extension: String,
}

/// How record file paths map onto the local input and output trees.
#[derive(Debug, Clone)]
pub struct NoteLayout {
    /// Directory marker searched for in each record's `file`.
    pub roam_root: PathBuf,
    pub input_dir: PathBuf,
    pub source_extension: String,
    pub target_extension: String,
}

impl NoteLayout {
    pub fn from_config(cfg: &ResolvedConfig) -> Self {
        Self {
            roam_root: cfg.roam_root.clone(),
            input_dir: cfg.input_dir.clone(),
            source_extension: cfg.converter.source_extension.clone(),
            target_extension: cfg.converter.target_extension.clone(),
        }
    }

    /// The part of `file` after the roam root, without leading separators.
    ///
    /// When the root does not occur in `file` the whole path is kept, so the
    /// note lands under the input dir at its full original path.
    pub fn roam_relative<'f>(&self, file: &'f str) -> &'f str {
        let marker = self.roam_root.to_string_lossy();
        let rest = match file.find(marker.as_ref()) {
            Some(pos) => &file[pos + marker.len()..],
            None => file,
        };
        rest.trim_start_matches(['/', '\\'])
    }
}

/// A convertible note. Built once from a [`NoteRecord`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    /// The note file relative to the roam root.
    pub roam_path: PathBuf,
    /// Where the note is read from: `input_dir / roam_path`.
    pub source_path: PathBuf,
    /// Directory of `roam_path`, mirrored in the output tree.
    pub relative_dir: PathBuf,
    pub raw_title: String,
    pub safe_title: String,
    /// Output file relative to the output directory.
    pub output_path: PathBuf,
}

impl Note {
    /// Build a note, rejecting records whose source extension is not convertible.
    pub fn from_record(
        record: &NoteRecord,
        layout: &NoteLayout,
    ) -> Result<Self, UnsupportedFormatError> {
        let roam_path = PathBuf::from(layout.roam_relative(&record.file));
        let source_path = layout.input_dir.join(&roam_path);

        let extension = source_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        if extension != layout.source_extension {
            return Err(UnsupportedFormatError {
                title: record.title.clone(),
                path: source_path,
                extension,
            });
        }

        let relative_dir =
            roam_path.parent().map(Path::to_path_buf).unwrap_or_default();
        let safe_title = sanitize_title(&record.title);
        let output_path =
            relative_dir.join(format!("{}.{}", safe_title, layout.target_extension));

        Ok(Self {
            id: record.id.clone(),
            roam_path,
            source_path,
            relative_dir,
            raw_title: record.title.clone(),
            safe_title,
            output_path,
        })
    }
}
