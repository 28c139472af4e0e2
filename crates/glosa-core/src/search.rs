use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::canonical_combining_class;

use crate::error::StorageError;
use crate::record::DictionaryRecord;
use crate::store::RecordStore;

/// Canonical, accent-free form of a search term: NFKD with every combining
/// character dropped.
pub fn normalize_term(term: &str) -> String {
    term.nfkd()
        .filter(|&c| canonical_combining_class(c) == 0)
        .collect()
}

/// Whether `record` matches `term` raw or `normalized` accent-free,
/// both case-insensitively
fn matches(record: &DictionaryRecord, term: &str, normalized: &str) -> bool {
    record.title_word_normalized.to_lowercase().contains(normalized)
        || record.title_word.to_lowercase().contains(term)
}

/// Records whose title contains `term`, ordered by title word.
/// A blank term matches nothing.
pub fn search<S: RecordStore + ?Sized>(
    store: &S,
    term: &str,
) -> Result<Vec<DictionaryRecord>, StorageError> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let raw = term.to_lowercase();
    let normalized = normalize_term(term).to_lowercase();

    let mut results: Vec<DictionaryRecord> = store
        .records()?
        .into_iter()
        .filter(|record| matches(record, &raw, &normalized))
        .collect();
    results.sort_by(|a, b| a.title_word.cmp(&b.title_word).then(a.id.cmp(&b.id)));

    tracing::debug!("search {term:?}: {} results", results.len());
    Ok(results)
}
