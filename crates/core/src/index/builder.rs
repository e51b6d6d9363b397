//! In-memory note index construction.

use std::collections::HashMap;
use std::time::Instant;

use super::db::{DataSourceError, RoamDb};
use super::title::is_safe_title;
use super::types::{Note, NoteId, NoteLayout, NoteRecord};

/// Statistics from building a [`NoteIndex`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of records considered.
    pub records: usize,
    /// Number of notes loaded into the index.
    pub loaded: usize,
    /// Number of records skipped for an unsupported file extension.
    pub skipped: usize,
    /// Number of database rows dropped as malformed.
    pub quarantined: usize,
    /// Number of records that replaced an earlier record with the same id.
    pub replaced: usize,
    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// All convertible notes keyed by id, in load order.
///
/// Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct NoteIndex {
    notes: Vec<Note>,
    positions: HashMap<NoteId, usize>,
}

impl NoteIndex {
    /// Load every record from `db` and index the convertible ones.
    pub fn load(
        db: &RoamDb,
        layout: &NoteLayout,
    ) -> Result<(Self, IndexStats), DataSourceError> {
        let start = Instant::now();
        let set = db.load_records()?;
        if set.records.is_empty() {
            tracing::warn!("No nodes found in database {}", db.path().display());
        }

        let (index, mut stats) = Self::from_records(set.records, layout);
        stats.quarantined = set.quarantined;
        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok((index, stats))
    }

    /// Index `records` in iteration order.
    ///
    /// Records whose source file is not convertible are left out. A record
    /// whose id is already present replaces the earlier note in place.
    pub fn from_records(
        records: impl IntoIterator<Item = NoteRecord>,
        layout: &NoteLayout,
    ) -> (Self, IndexStats) {
        let mut index = Self::default();
        let mut stats = IndexStats::default();

        for record in records {
            stats.records += 1;

            let note = match Note::from_record(&record, layout) {
                Ok(note) => note,
                Err(e) => {
                    tracing::warn!("Skipping (unsupported file extension): {}", record.title);
                    tracing::debug!("\tinput file: {}", e.path.display());
                    tracing::debug!(
                        "\tfile relative to roam dir: {}",
                        layout.roam_relative(&record.file)
                    );
                    tracing::debug!("\textension: {}", e.extension);
                    stats.skipped += 1;
                    continue;
                }
            };

            tracing::info!("Loading: {}", note.raw_title);
            if !is_safe_title(&note.raw_title) {
                tracing::debug!("\toutput name: {}", note.safe_title);
            }
            if index.insert(note) {
                stats.replaced += 1;
            }
        }

        stats.loaded = index.len();
        tracing::info!("Done loading.");
        (index, stats)
    }

    /// Returns true if a note with the same id was replaced.
    fn insert(&mut self, note: Note) -> bool {
        match self.positions.get(&note.id) {
            Some(&pos) => {
                tracing::debug!("Note id {} appears more than once, keeping the later record", note.id);
                self.notes[pos] = note;
                true
            }
            None => {
                self.positions.insert(note.id.clone(), self.notes.len());
                self.notes.push(note);
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.positions.get(id).map(|&pos| &self.notes[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Notes in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn layout() -> NoteLayout {
        NoteLayout {
            roam_root: PathBuf::from("/home/someone/org-roam"),
            input_dir: PathBuf::from("input/roam"),
            source_extension: "org".to_string(),
            target_extension: "md".to_string(),
        }
    }

    fn record(id: &str, file: &str, title: &str) -> NoteRecord {
        NoteRecord {
            id: NoteId::new(id),
            file: format!("/home/someone/org-roam/{file}"),
            title: title.to_string(),
        }
    }

    #[test]
    fn unsupported_notes_are_left_out() {
        let (index, stats) = NoteIndex::from_records(
            vec![
                record("3", "c.org", "C"),
                record("2", "secret.org.gpg", "Secret"),
                record("1", "a.org", "A"),
            ],
            &layout(),
        );

        assert_eq!(index.len(), 2);
        assert!(index.get("2").is_none());
        assert!(!index.contains("2"));
        assert_eq!(stats.records, 3);
        assert_eq!(stats.loaded, 2);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn later_duplicate_replaces_earlier_in_place() {
        let (index, stats) = NoteIndex::from_records(
            vec![
                record("2", "first.org", "First"),
                record("1", "other.org", "Other"),
                record("2", "second.org", "Second"),
            ],
            &layout(),
        );

        assert_eq!(index.len(), 2);
        assert_eq!(stats.replaced, 1);
        assert_eq!(index.get("2").unwrap().raw_title, "Second");

        let order: Vec<_> = index.iter().map(|n| n.raw_title.as_str()).collect();
        assert_eq!(order, ["Second", "Other"]);
    }

    #[test]
    fn iteration_follows_record_order() {
        let (index, _) = NoteIndex::from_records(
            vec![record("9", "z.org", "Z"), record("10", "y.org", "Y"), record("1", "x.org", "X")],
            &layout(),
        );

        let ids: Vec<_> = index.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["9", "10", "1"]);
    }

    #[test]
    fn empty_input_gives_empty_index() {
        let (index, stats) = NoteIndex::from_records(Vec::new(), &layout());
        assert!(index.is_empty());
        assert_eq!(stats, IndexStats::default());
    }

    #[test]
    fn unknown_ids_are_absent() {
        let (index, _) = NoteIndex::from_records(vec![record("1", "a.org", "A")], &layout());
        assert!(index.get("missing").is_none());
        assert!(index.get("").is_none());
    }
}
