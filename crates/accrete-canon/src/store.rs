//! The content-addressed canon store backed by a single JSON file.
//!
//! Keys are combo keys (see `accrete_types::combo_key`); values are
//! [`CanonEntry`] records. The on-disk format is a wrapper object with an
//! `entries` list, loaded once at startup and rewritten in full on every
//! [`CanonStore::put`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use accrete_types::{CanonEntry, GenerationResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CanonError;

/// On-disk wrapper: a flat list of entries.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CanonFile {
    /// All persisted canon entries.
    #[serde(default)]
    entries: Vec<CanonEntry>,
}

/// In-memory canon map with write-through JSON persistence.
#[derive(Debug)]
pub struct CanonStore {
    /// Path of the persisted JSON file.
    path: PathBuf,

    /// Entries keyed by combo key.
    entries: BTreeMap<String, CanonEntry>,
}

impl CanonStore {
    /// Load the canon from `path`.
    ///
    /// A missing file yields an empty store. A file that cannot be read
    /// or parsed also yields an empty store, with a warning -- corruption
    /// of the canon must never halt the simulation.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<CanonFile>(&contents) {
                Ok(file) => file
                    .entries
                    .into_iter()
                    .map(|entry| (entry.key.clone(), entry))
                    .collect(),
                Err(error) => {
                    warn!(path = %path.display(), %error, "canon file corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => {
                warn!(path = %path.display(), %error, "canon file unreadable, starting empty");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), entry_count = entries.len(), "canon loaded");
        Self { path, entries }
    }

    /// Look up a result by combo key.
    pub fn get(&self, key: &str) -> Option<&GenerationResult> {
        self.entries.get(key).map(|entry| &entry.result)
    }

    /// Whether an entry exists for the given combo key.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert (or overwrite) an entry and rewrite the whole file.
    ///
    /// Overwrites are idempotent by design: two dispatches racing on the
    /// same key do duplicate generation work but cannot corrupt the
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization or the file write fails.
    /// The in-memory entry is kept either way, so lookups within this
    /// process still hit.
    pub fn put(
        &mut self,
        key: &str,
        tier: u32,
        result: GenerationResult,
    ) -> Result<(), CanonError> {
        self.entries
            .insert(key.to_owned(), CanonEntry::new(key, tier, result));
        self.save()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path of the persisted file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize every entry and overwrite the persisted file.
    fn save(&self) -> Result<(), CanonError> {
        let file = CanonFile {
            entries: self.entries.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A unique canon path under the system temp directory.
    fn temp_canon_path() -> PathBuf {
        std::env::temp_dir().join(format!("accrete-canon-{}.json", uuid::Uuid::now_v7()))
    }

    fn sample_result(name: &str) -> GenerationResult {
        GenerationResult {
            emoji: "🔥".to_owned(),
            name: name.to_owned(),
            gloss: String::new(),
            weight: 4,
            tags: std::collections::BTreeSet::new(),
        }
    }

    #[test]
    fn missing_file_is_empty_store() {
        let store = CanonStore::load(temp_canon_path());
        assert!(store.is_empty());
    }

    #[test]
    fn put_then_get_roundtrips() {
        let path = temp_canon_path();
        let mut store = CanonStore::load(&path);
        store
            .put("Fusion:Cat+Fox", 2, sample_result("Cafox"))
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Fusion:Cat+Fox").unwrap().name, "Cafox");
        assert!(store.get("Action:Cat+Fox").is_none());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn entries_survive_reload() {
        let path = temp_canon_path();
        {
            let mut store = CanonStore::load(&path);
            store
                .put("Fusion:Ox+Rat", 2, sample_result("Oxrat"))
                .unwrap();
            store
                .put("Action:Ox+Tiger", 3, sample_result("Ox Pouncer"))
                .unwrap();
        }

        let reloaded = CanonStore::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("Fusion:Ox+Rat").unwrap().name, "Oxrat");
        assert!(reloaded.contains("Action:Ox+Tiger"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_fails_open() {
        let path = temp_canon_path();
        std::fs::write(&path, "not json {{{").unwrap();

        let store = CanonStore::load(&path);
        assert!(store.is_empty());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn put_overwrites_existing_key() {
        let path = temp_canon_path();
        let mut store = CanonStore::load(&path);
        store.put("Fusion:A+B", 2, sample_result("First")).unwrap();
        store.put("Fusion:A+B", 2, sample_result("Second")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Fusion:A+B").unwrap().name, "Second");

        let _ = std::fs::remove_file(path);
    }
}
