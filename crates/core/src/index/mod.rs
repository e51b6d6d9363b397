//! In-memory index of org-roam notes.
//!
//! This module covers the loading half of a conversion:
//! - Reading node records from the org-roam SQLite database
//! - Mapping each record's file onto the local input tree
//! - Dropping notes that are not in the source markup format
//! - Sanitizing titles into output file names
//!
//! # Example
//!
//! ```no_run
//! use roam2md_core::index::{NoteIndex, NoteLayout, RoamDb};
//! use std::path::{Path, PathBuf};
//!
//! let db = RoamDb::open(Path::new("input/org-roam.db")).unwrap();
//! let layout = NoteLayout {
//!     roam_root: PathBuf::from("/home/me/org-roam"),
//!     input_dir: PathBuf::from("input/roam"),
//!     source_extension: "org".into(),
//!     target_extension: "md".into(),
//! };
//! let (index, stats) = NoteIndex::load(&db, &layout).unwrap();
//! println!("{} notes loaded, {} skipped", stats.loaded, stats.skipped);
//! ```

pub mod builder;
pub mod db;
pub mod title;
pub mod types;

pub use builder::{IndexStats, NoteIndex};
pub use db::{DataSourceError, RecordSet, RoamDb};
pub use title::sanitize_title;
pub use types::{Note, NoteId, NoteLayout, NoteRecord, RecordError, UnsupportedFormatError};
