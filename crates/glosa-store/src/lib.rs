use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use glosa_core::{DictionaryRecord, RecordStore, StorageError};
use serde::{Deserialize, Serialize};

const ROW_EXTENSION: &str = "json";

/// Row bookkeeping, kept next to the record and never compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Unix seconds of the first save
    pub created_at: u64,
    /// Unix seconds of the latest save
    pub updated_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Row {
    record: DictionaryRecord,
    #[serde(flatten)]
    timestamps: Timestamps,
}

/// Store persisted as one JSON file per record, `<dir>/<id>.json`.
///
/// A save writes only the affected record's file, through a temporary
/// sibling renamed into place, so a failed write leaves the previous row
/// intact. All rows are read into memory on open.
pub struct JsonFileStore {
    dir: PathBuf,
    rows: BTreeMap<u64, Row>,
}

impl JsonFileStore {
    /// Open the store in `dir`, creating the directory if it does not exist yet
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();

        match fs::create_dir(&dir) {
            Ok(()) => tracing::info!("Created empty store at {}", dir.display()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }

        let mut rows = BTreeMap::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != ROW_EXTENSION) {
                continue;
            }

            let json = fs::read_to_string(&path)?;
            let row: Row = serde_json::from_str(&json)
                .map_err(|e| StorageError::Serialization(format!("{}: {e}", path.display())))?;
            rows.insert(row.record.id, row);
        }
        tracing::debug!("Loaded {} entries from {}", rows.len(), dir.display());

        Ok(Self { dir, rows })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn timestamps(&self, id: u64) -> Option<Timestamps> {
        self.rows.get(&id).map(|row| row.timestamps)
    }

    fn row_path(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{id}.{ROW_EXTENSION}"))
    }

    fn write_row(&self, row: &Row) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(row)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let path = self.row_path(row.record.id);
        let tmp = self.dir.join(format!("{}.{ROW_EXTENSION}.tmp", row.record.id));

        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::warn!("Cannot remove {}: {cleanup}", tmp.display());
            }
            return Err(e.into());
        }
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn find_by_id(&self, id: u64) -> Result<Option<DictionaryRecord>, StorageError> {
        Ok(self.rows.get(&id).map(|row| row.record.clone()))
    }

    fn save(&mut self, record: &DictionaryRecord) -> Result<(), StorageError> {
        let now = unix_now();
        let created_at = self
            .rows
            .get(&record.id)
            .map_or(now, |row| row.timestamps.created_at);

        let row = Row {
            record: record.clone(),
            timestamps: Timestamps {
                created_at,
                updated_at: now,
            },
        };

        // Memory only follows once the row is on disk.
        self.write_row(&row)?;
        self.rows.insert(record.id, row);
        Ok(())
    }

    fn records(&self) -> Result<Vec<DictionaryRecord>, StorageError> {
        Ok(self.rows.values().map(|row| row.record.clone()).collect())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glosa_core::{Importer, Outcome, extract};

    const ENTRY: &str = r#"<entry id="3917">
  <titleWord md5hash="56ef7f1ea1078edecf215a3521343127">ECLISIARHÍE</titleWord>
  <titleWordNormalized md5hash="0da5e09d295d842d3878a995f0b0228a">ECLISIARHIE</titleWordNormalized>
  <body md5hash="9721086245e27c0ce40701a887440209">
    <paragraph>**ECLISIARHÍE**  s. f.  v. **ecleziarhie**.</paragraph>
  </body>
</entry>"#;

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_open_creates_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store")).unwrap();
        assert!(store.is_empty());
        assert!(store.path().is_dir());
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            let outcome = Importer::new(&mut store)
                .import_document("3917", ENTRY)
                .unwrap();
            assert_eq!(outcome, Outcome::Created);
        }

        let mut store = JsonFileStore::open(&path).unwrap();
        let record = store.find_by_id(3917).unwrap().unwrap();
        assert_eq!(record.title_word, "ECLISIARHÍE");
        assert_eq!(record.version(), 1);

        let outcome = Importer::new(&mut store)
            .import_document("3917", ENTRY)
            .unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[test]
    fn test_save_writes_only_its_own_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();

        let mut first = DictionaryRecord::new(1);
        first.title_word = "A".to_string();
        let mut second = DictionaryRecord::new(2);
        second.title_word = "B".to_string();
        store.save(&first).unwrap();
        store.save(&second).unwrap();

        // Any rewrite of 1.json would replace this marker.
        let first_path = dir.path().join("1.json");
        fs::write(&first_path, "untouched").unwrap();

        second.title_word = "BB".to_string();
        store.save(&second).unwrap();

        assert_eq!(fs::read_to_string(&first_path).unwrap(), "untouched");
        assert_eq!(file_names(dir.path()), ["1.json", "2.json"]);
        assert!(fs::read_to_string(dir.path().join("2.json")).unwrap().contains("BB"));
    }

    #[test]
    fn test_update_keeps_creation_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();

        let mut importer = Importer::new(&mut store);
        importer.reconcile(extract(ENTRY).unwrap()).unwrap();
        let mut changed = extract(ENTRY).unwrap();
        changed.body_checksum = "00000000000000000000000000000000".to_string();
        assert_eq!(importer.reconcile(changed).unwrap(), Outcome::Updated);

        let timestamps = store.timestamps(3917).unwrap();
        assert!(timestamps.updated_at >= timestamps.created_at);
        assert_eq!(store.find_by_id(3917).unwrap().unwrap().version(), 2);
    }

    #[test]
    fn test_failed_write_leaves_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();

        // A non-empty directory where the row file belongs makes the rename fail.
        let blocker = dir.path().join("3917.json");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "").unwrap();

        let err = Importer::new(&mut store)
            .import_document("3917", ENTRY)
            .unwrap_err();

        assert!(err.to_string().contains("3917"));
        assert!(store.find_by_id(3917).unwrap().is_none());
        assert!(!dir.path().join("3917.json.tmp").exists());
        assert_eq!(file_names(dir.path()), ["3917.json"]);
    }

    #[test]
    fn test_corrupt_row() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1.json"), "[1, 2").unwrap();

        assert!(matches!(
            JsonFileStore::open(dir.path()),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_other_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README"), "notes").unwrap();
        fs::write(dir.path().join("5.json.tmp"), "partial").unwrap();

        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.is_empty());
    }
}
