//! Practice log: free-text notes with a store-assigned timestamp.
//!
//! The store owns ids and timestamps; callers only supply text. Nothing is
//! validated or merged, the log is single-user and append-only.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::CompanionError;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub id: u64,
    pub text: String,
    /// Unix seconds, assigned by the store
    pub created_at: u64,
}

pub trait NoteStore {
    fn add(&mut self, text: &str) -> Result<NoteEntry, CompanionError>;

    /// Up to `limit` entries, newest first.
    fn recent(&self, limit: usize) -> Vec<NoteEntry>;
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn newest_first(entries: &[NoteEntry], limit: usize) -> Vec<NoteEntry> {
    entries.iter().rev().take(limit).cloned().collect()
}

fn next_entry(entries: &[NoteEntry], text: &str) -> NoteEntry {
    NoteEntry {
        id: entries.last().map(|e| e.id + 1).unwrap_or(1),
        text: text.to_owned(),
        created_at: unix_now(),
    }
}

/// Volatile store, for tests and for running without a writable disk.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    entries: Vec<NoteEntry>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteStore for MemoryNoteStore {
    fn add(&mut self, text: &str) -> Result<NoteEntry, CompanionError> {
        let entry = next_entry(&self.entries, text);
        self.entries.push(entry.clone());
        Ok(entry)
    }

    fn recent(&self, limit: usize) -> Vec<NoteEntry> {
        newest_first(&self.entries, limit)
    }
}

#[cfg(feature = "serde")]
pub use self::json::JsonNoteStore;

#[cfg(feature = "serde")]
mod json {
    use std::{
        fs,
        io::ErrorKind,
        path::{Path, PathBuf},
    };
    use tracing::info;

    use super::{newest_first, next_entry, NoteEntry, NoteStore};
    use crate::error::CompanionError;

    /// Notes kept as a pretty-printed JSON array, rewritten on every add.
    #[derive(Debug)]
    pub struct JsonNoteStore {
        path: PathBuf,
        entries: Vec<NoteEntry>,
    }

    impl JsonNoteStore {
        /// Load the file at `path`; a missing file is an empty log.
        pub fn open(path: impl AsRef<Path>) -> Result<Self, CompanionError> {
            let path = path.as_ref().to_path_buf();
            let shown = path.display().to_string();

            let entries = match fs::read_to_string(&path) {
                Ok(text) => serde_json::from_str(&text).map_err(|source| {
                    CompanionError::Json {
                        path: shown.clone(),
                        source,
                    }
                })?,
                Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
                Err(e) => return Err(CompanionError::io(shown, e)),
            };

            info!(path = %shown, notes = entries.len(), "note store opened");
            Ok(Self { path, entries })
        }

        fn persist(&self) -> Result<(), CompanionError> {
            let shown = self.path.display().to_string();
            let text = serde_json::to_string_pretty(&self.entries).map_err(|source| {
                CompanionError::Json {
                    path: shown.clone(),
                    source,
                }
            })?;
            fs::write(&self.path, text).map_err(|e| CompanionError::io(shown, e))
        }
    }

    impl NoteStore for JsonNoteStore {
        fn add(&mut self, text: &str) -> Result<NoteEntry, CompanionError> {
            let entry = next_entry(&self.entries, text);
            self.entries.push(entry.clone());
            if let Err(e) = self.persist() {
                self.entries.pop();
                return Err(e);
            }
            Ok(entry)
        }

        fn recent(&self, limit: usize) -> Vec<NoteEntry> {
            newest_first(&self.entries, limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_assigns_ids_and_orders_newest_first() {
        let mut store = MemoryNoteStore::new();
        let first = store.add("scales at 80").unwrap();
        let second = store.add("arpeggios clean").unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.created_at >= first.created_at);

        let recent = store.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].text, "arpeggios clean");
        assert_eq!(store.recent(1), vec![second]);
    }

    #[cfg(feature = "serde")]
    fn unique_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "practice_companion_test_{}_{}",
            name,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_store_survives_reopen() {
        let path = unique_path("notes.json");

        let mut store = JsonNoteStore::open(&path).unwrap();
        assert!(store.recent(5).is_empty());
        store.add("long tones, 10 min").unwrap();
        store.add("sight-reading p.12").unwrap();
        drop(store);

        let reopened = JsonNoteStore::open(&path).unwrap();
        let recent = reopened.recent(5);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, 2);
        assert_eq!(recent[1].text, "long tones, 10 min");

        let _ = std::fs::remove_file(&path);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_store_rejects_garbage() {
        let path = unique_path("garbage.json");
        std::fs::write(&path, "not json").unwrap();

        let result = JsonNoteStore::open(&path);
        assert!(matches!(result, Err(CompanionError::Json { .. })));

        let _ = std::fs::remove_file(&path);
    }
}
