//! Mapping persistence.
//!
//! Only the most recent mapping is kept, under a single fixed key. Each
//! anonymize run overwrites it and revert reads it back, possibly from a
//! later process.

use crate::error::{AnonymizerError, Result};
use crate::privacy::NameMapping;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Key under which the latest mapping is stored.
pub const MAPPING_KEY: &str = "codeAnonymizerMapping";

/// Current on-disk format version.
const STORE_VERSION: u32 = 1;

/// A saved mapping with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMapping {
    /// Placeholder -> original
    pub mapping: NameMapping,
    /// When the mapping was saved
    pub saved_at: DateTime<Utc>,
    /// Fingerprint of the anonymized text the mapping belongs to
    #[serde(default)]
    pub fingerprint: Option<String>,
    /// Format version
    pub version: u32,
}

impl StoredMapping {
    pub fn new(mapping: NameMapping, anonymized: Option<&str>) -> Self {
        Self {
            mapping,
            saved_at: Utc::now(),
            fingerprint: anonymized.map(compute_fingerprint),
            version: STORE_VERSION,
        }
    }

    /// Whether `text` is exactly the anonymized output this mapping was made for.
    pub fn matches(&self, text: &str) -> bool {
        self.fingerprint.as_deref() == Some(compute_fingerprint(text).as_str())
    }
}

/// Persistence for the most recent mapping.
pub trait MappingStore {
    /// Replace any saved mapping with `entry`.
    fn save(&mut self, entry: StoredMapping) -> Result<()>;

    /// The most recently saved mapping, or `None` if nothing was saved.
    fn load(&self) -> Result<Option<StoredMapping>>;

    /// Forget the saved mapping.
    fn clear(&mut self) -> Result<()>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryMappingStore {
    entry: Option<StoredMapping>,
}

impl MemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MappingStore for MemoryMappingStore {
    fn save(&mut self, entry: StoredMapping) -> Result<()> {
        self.entry = Some(entry);
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredMapping>> {
        Ok(self.entry.clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.entry = None;
        Ok(())
    }
}

/// Store backed by a JSON state file.
///
/// The file is a keyed object so other state can live next to the mapping:
///
/// ```json
/// { "codeAnonymizerMapping": { "mapping": { "var1": "total" }, ... } }
/// ```
#[derive(Debug, Clone)]
pub struct FileMappingStore {
    path: PathBuf,
}

impl FileMappingStore {
    /// Create a store at `path`. The file is created on first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a store in the default location (`<data dir>/code_anonymizer/state.json`).
    pub fn default_store() -> Result<Self> {
        let base = dirs::data_dir().ok_or(AnonymizerError::StorePath)?;
        Ok(Self::new(base.join("code_anonymizer").join("state.json")))
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_state(&self) -> Result<HashMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_state(&self, state: &HashMap<String, serde_json::Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl MappingStore for FileMappingStore {
    fn save(&mut self, entry: StoredMapping) -> Result<()> {
        let mut state = self.read_state()?;
        let count = entry.mapping.len();
        state.insert(MAPPING_KEY.to_string(), serde_json::to_value(entry)?);
        self.write_state(&state)?;

        info!("Saved mapping of {} identifiers to {}", count, self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredMapping>> {
        let mut state = self.read_state()?;
        let Some(value) = state.remove(MAPPING_KEY) else {
            debug!("No mapping stored in {}", self.path.display());
            return Ok(None);
        };

        let entry: StoredMapping = serde_json::from_value(value)?;
        if entry.version != STORE_VERSION {
            warn!(
                "Ignoring stored mapping with unsupported version {} (expected {})",
                entry.version, STORE_VERSION
            );
            return Ok(None);
        }

        Ok(Some(entry))
    }

    fn clear(&mut self) -> Result<()> {
        let mut state = self.read_state()?;
        if state.remove(MAPPING_KEY).is_some() {
            self.write_state(&state)?;
            info!("Cleared stored mapping in {}", self.path.display());
        }
        Ok(())
    }
}

/// Short content fingerprint of anonymized text.
pub fn compute_fingerprint(content: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mapping() -> NameMapping {
        let mut mapping = NameMapping::new();
        mapping.insert("var1", "invoice");
        mapping.insert("var2", "customerId");
        mapping
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryMappingStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(StoredMapping::new(sample_mapping(), None)).unwrap();
        assert_eq!(store.load().unwrap().unwrap().mapping, sample_mapping());

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_absent_before_first_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileMappingStore::new(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut store = FileMappingStore::new(&path);
        store
            .save(StoredMapping::new(sample_mapping(), Some("var1(var2)")))
            .unwrap();

        let reopened = FileMappingStore::new(&path);
        let entry = reopened.load().unwrap().unwrap();
        assert_eq!(entry.mapping, sample_mapping());
        assert!(entry.matches("var1(var2)"));
        assert!(!entry.matches("var1(var2);"));
    }

    #[test]
    fn test_file_store_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileMappingStore::new(dir.path().join("state.json"));

        store.save(StoredMapping::new(sample_mapping(), None)).unwrap();
        let mut newer = NameMapping::new();
        newer.insert("var1", "other");
        store.save(StoredMapping::new(newer.clone(), None)).unwrap();

        assert_eq!(store.load().unwrap().unwrap().mapping, newer);
    }

    #[test]
    fn test_file_store_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"otherSetting": 3}"#).unwrap();

        let mut store = FileMappingStore::new(&path);
        store.save(StoredMapping::new(sample_mapping(), None)).unwrap();
        store.clear().unwrap();

        assert!(store.load().unwrap().is_none());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("otherSetting"));
    }

    #[test]
    fn test_file_store_ignores_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"codeAnonymizerMapping": {"mapping": {"var1": "x"}, "saved_at": "2024-01-01T00:00:00Z", "version": 99}}"#,
        )
        .unwrap();

        let store = FileMappingStore::new(&path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_rejects_corrupt_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileMappingStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(AnonymizerError::Serialization(_))
        ));
    }

    #[test]
    fn test_fingerprint() {
        let hash1 = compute_fingerprint("var1 + var2");
        let hash2 = compute_fingerprint("var1 + var2");
        let hash3 = compute_fingerprint("var1 - var2");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 16);
    }
}
