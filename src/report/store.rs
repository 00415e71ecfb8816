//! Short-id report store.
//!
//! Associates an opaque 8-character base62 identifier with an encoded report
//! snapshot. Backed by an in-memory map behind a `Mutex`, with best-effort
//! JSON file persistence: load on open, atomic tmp-then-rename on write.
//! Random identifiers keep concurrent stores collision-free at the system's
//! expected scale; `retrieve` of an unknown id returns `None`, never errors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CostwiseResult;
use crate::report::codec::{decode, encode};
use crate::types::ReportData;

const ID_LENGTH: usize = 8;
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Serialize, Deserialize)]
struct PersistedStore {
    v: u32,
    entries: HashMap<String, String>,
}

pub struct ReportStore {
    entries: Mutex<HashMap<String, String>>,
    persist_path: Option<PathBuf>,
}

impl ReportStore {
    /// In-memory only store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            persist_path: None,
        }
    }

    /// Store backed by a JSON file. Existing entries are loaded best-effort:
    /// an unreadable or unrecognized file starts the store empty rather than
    /// failing to open.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load_best_effort(&path);
        Self {
            entries: Mutex::new(entries),
            persist_path: Some(path),
        }
    }

    /// Store a snapshot and return its short opaque identifier.
    pub fn store(&self, report: &ReportData) -> CostwiseResult<String> {
        let token = encode(report)?;

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut id = random_id();
        while entries.contains_key(&id) {
            id = random_id();
        }
        entries.insert(id.clone(), token);

        if let Some(path) = &self.persist_path {
            Self::persist_best_effort(path, &entries);
        }

        Ok(id)
    }

    /// Retrieve a stored snapshot. Unknown ids and entries that no longer
    /// decode both yield `None`.
    pub fn retrieve(&self, id: &str) -> Option<ReportData> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let token = entries.get(id)?;
        decode(token).ok()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load_best_effort(path: &Path) -> HashMap<String, String> {
        let Ok(bytes) = std::fs::read(path) else {
            return HashMap::new();
        };
        let Ok(persisted) = serde_json::from_slice::<PersistedStore>(&bytes) else {
            return HashMap::new();
        };
        if persisted.v != 1 {
            return HashMap::new();
        }
        persisted.entries
    }

    fn persist_best_effort(path: &Path, entries: &HashMap<String, String>) {
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return;
            }
        }

        let persisted = PersistedStore {
            v: 1,
            entries: entries.clone(),
        };
        let Ok(data) = serde_json::to_vec(&persisted) else {
            return;
        };

        let tmp = path.with_extension("tmp");
        if std::fs::write(&tmp, &data).is_err() {
            return;
        }
        let _ = std::fs::rename(&tmp, path);
    }
}

impl Default for ReportStore {
    fn default() -> Self {
        Self::new()
    }
}

fn random_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PricingState;
    use pretty_assertions::assert_eq;

    fn report(name: &str) -> ReportData {
        ReportData {
            project_name: name.to_string(),
            created_at: "2026-08-28T00:00:00+00:00".to_string(),
            state: PricingState::default(),
            notes: Default::default(),
            selected_mockup: None,
        }
    }

    #[test]
    fn test_store_and_retrieve() {
        let store = ReportStore::new();
        let id = store.store(&report("Alpha")).unwrap();

        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));

        let retrieved = store.retrieve(&id).unwrap();
        assert_eq!(retrieved.project_name, "Alpha");
    }

    #[test]
    fn test_unknown_id_returns_none() {
        let store = ReportStore::new();
        assert_eq!(store.retrieve("nope1234"), None);
    }

    #[test]
    fn test_ids_are_distinct() {
        let store = ReportStore::new();
        let a = store.store(&report("A")).unwrap();
        let b = store.store(&report("A")).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.json");

        let id = {
            let store = ReportStore::with_path(&path);
            store.store(&report("Persisted")).unwrap()
        };

        let reopened = ReportStore::with_path(&path);
        let retrieved = reopened.retrieve(&id).unwrap();
        assert_eq!(retrieved.project_name, "Persisted");
    }

    #[test]
    fn test_corrupt_persistence_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = ReportStore::with_path(&path);
        assert!(store.is_empty());
    }
}
