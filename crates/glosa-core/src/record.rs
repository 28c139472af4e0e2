use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// A dictionary entry as extracted from its source document and as persisted.
///
/// Checksums are carried verbatim from the source and only ever compared,
/// never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryRecord {
    pub id: u64,
    pub title_word: String,
    pub title_word_checksum: String,
    pub title_word_normalized: String,
    pub title_word_normalized_checksum: String,
    pub body_html: String,
    pub body_checksum: String,
    /// 0 until the record is first persisted
    #[serde(default)]
    version: u32,
}

impl DictionaryRecord {
    /// Empty candidate with the given id; all text fields start out empty
    pub fn new(id: u64) -> Self {
        Self {
            id,
            title_word: String::new(),
            title_word_checksum: String::new(),
            title_word_normalized: String::new(),
            title_word_normalized_checksum: String::new(),
            body_html: String::new(),
            body_checksum: String::new(),
            version: 0,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn is_persisted(&self) -> bool {
        self.version > 0
    }

    /// Equality over every field except `version`
    pub fn content_eq(&self, other: &DictionaryRecord) -> bool {
        self.id == other.id
            && self.title_word == other.title_word
            && self.title_word_checksum == other.title_word_checksum
            && self.title_word_normalized == other.title_word_normalized
            && self.title_word_normalized_checksum == other.title_word_normalized_checksum
            && self.body_html == other.body_html
            && self.body_checksum == other.body_checksum
    }

    pub(crate) fn mark_created(&mut self) {
        self.version = 1;
    }

    /// Full overwrite of the comparable fields, bumping the version by one.
    /// The id is kept; callers only pass candidates looked up by that id.
    /// A version already at `u32::MAX` is an error and leaves `self` untouched.
    pub(crate) fn overwrite_from(
        &mut self,
        candidate: &DictionaryRecord,
    ) -> Result<(), StorageError> {
        let version = self.version.checked_add(1).ok_or_else(|| {
            StorageError::Backend(format!("version overflow for entry {}", self.id))
        })?;

        self.title_word.clone_from(&candidate.title_word);
        self.title_word_checksum.clone_from(&candidate.title_word_checksum);
        self.title_word_normalized.clone_from(&candidate.title_word_normalized);
        self.title_word_normalized_checksum
            .clone_from(&candidate.title_word_normalized_checksum);
        self.body_html.clone_from(&candidate.body_html);
        self.body_checksum.clone_from(&candidate.body_checksum);
        self.version = version;
        Ok(())
    }
}

impl fmt::Display for DictionaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title_word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DictionaryRecord {
        let mut record = DictionaryRecord::new(3917);
        record.title_word = "ECLISIARHÍE".to_string();
        record.title_word_checksum = "56ef7f1ea1078edecf215a3521343127".to_string();
        record.title_word_normalized = "ECLISIARHIE".to_string();
        record.title_word_normalized_checksum = "0da5e09d295d842d3878a995f0b0228a".to_string();
        record.body_html = "<article>\n\n</article>".to_string();
        record.body_checksum = "9721086245e27c0ce40701a887440209".to_string();
        record
    }

    #[test]
    fn test_content_eq_ignores_version() {
        let candidate = sample();
        let mut stored = sample();
        stored.mark_created();
        stored.version = 7;

        assert!(stored.content_eq(&candidate));
        assert_ne!(stored, candidate);
    }

    #[test]
    fn test_content_eq_detects_each_field() {
        let base = sample();
        let edits: [fn(&mut DictionaryRecord); 7] = [
            |r| r.id += 1,
            |r| r.title_word.push('X'),
            |r| r.title_word_checksum.clear(),
            |r| r.title_word_normalized.push('X'),
            |r| r.title_word_normalized_checksum.clear(),
            |r| r.body_html.clear(),
            |r| r.body_checksum.clear(),
        ];

        for edit in edits {
            let mut changed = sample();
            edit(&mut changed);
            assert!(!base.content_eq(&changed));
        }
    }

    #[test]
    fn test_overwrite_bumps_version_once() {
        let mut stored = sample();
        stored.mark_created();

        let mut candidate = sample();
        candidate.body_html = "<article>\nnew\n</article>".to_string();
        stored.overwrite_from(&candidate).unwrap();

        assert_eq!(stored.version(), 2);
        assert!(stored.content_eq(&candidate));
    }

    #[test]
    fn test_overwrite_at_max_version_fails() {
        let mut stored = sample();
        stored.version = u32::MAX;

        let mut candidate = sample();
        candidate.body_html = "<article>\nnew\n</article>".to_string();

        let err = stored.overwrite_from(&candidate).unwrap_err();
        assert!(matches!(err, StorageError::Backend(ref msg) if msg.contains("3917")));
        assert_eq!(stored.version(), u32::MAX);
        assert_eq!(stored.body_html, "<article>\n\n</article>");
    }

    #[test]
    fn test_display_is_title_word() {
        assert_eq!(sample().to_string(), "ECLISIARHÍE");
    }
}
