use std::collections::BTreeMap;

use crate::error::StorageError;
use crate::record::DictionaryRecord;

/// Persisted state the importer reconciles against
pub trait RecordStore {
    /// Look up a stored record by id
    fn find_by_id(&self, id: u64) -> Result<Option<DictionaryRecord>, StorageError>;

    /// Insert or replace the record with the same id
    fn save(&mut self, record: &DictionaryRecord) -> Result<(), StorageError>;

    /// All stored records, in no particular order
    fn records(&self) -> Result<Vec<DictionaryRecord>, StorageError>;

    /// Whether `stored` already holds everything in `candidate`.
    /// Stores with bookkeeping of their own must leave it out of the comparison.
    fn is_content_equal(&self, stored: &DictionaryRecord, candidate: &DictionaryRecord) -> bool {
        stored.content_eq(candidate)
    }
}

/// Volatile store keyed by id
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<u64, DictionaryRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn find_by_id(&self, id: u64) -> Result<Option<DictionaryRecord>, StorageError> {
        Ok(self.records.get(&id).cloned())
    }

    fn save(&mut self, record: &DictionaryRecord) -> Result<(), StorageError> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    fn records(&self) -> Result<Vec<DictionaryRecord>, StorageError> {
        Ok(self.records.values().cloned().collect())
    }
}
