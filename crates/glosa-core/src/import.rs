use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ImportError, StorageError};
use crate::extract::extract;
use crate::record::DictionaryRecord;
use crate::store::RecordStore;

const DEFAULT_EXTENSION: &str = "xml";

/// What reconciling one document did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Unchanged,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Created => "created",
            Outcome::Updated => "updated",
            Outcome::Unchanged => "unchanged",
        }
    }

    /// Whether the store was written
    pub fn is_write(self) -> bool {
        !matches!(self, Outcome::Unchanged)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives per-document results of a directory import
pub trait Reporter {
    fn outcome(&mut self, label: &str, outcome: Outcome);

    fn failure(&mut self, label: &str, error: &ImportError) {
        let _ = (label, error);
    }
}

/// Totals of a directory import
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failures: Vec<ImportError>,
}

impl ImportSummary {
    pub fn processed(&self) -> usize {
        self.created + self.updated + self.unchanged + self.failures.len()
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Unchanged => self.unchanged += 1,
        }
    }
}

/// Reconciles extracted entries against a store.
///
/// Documents are processed one at a time, each running extract, compare and
/// save to completion before the next one starts.
pub struct Importer<'a, S: RecordStore + ?Sized> {
    store: &'a mut S,
    extension: String,
    fail_fast: bool,
}

impl<'a, S: RecordStore + ?Sized> Importer<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            extension: DEFAULT_EXTENSION.to_string(),
            fail_fast: false,
        }
    }

    /// File extension picked up by [`Importer::import_directory`], without the dot
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Stop a directory import at the first failing document
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Insert, overwrite or skip `candidate` depending on what is stored under its id
    pub fn reconcile(&mut self, candidate: DictionaryRecord) -> Result<Outcome, StorageError> {
        let Some(mut stored) = self.store.find_by_id(candidate.id)? else {
            let mut record = candidate;
            record.mark_created();
            self.store.save(&record)?;
            return Ok(Outcome::Created);
        };

        if self.store.is_content_equal(&stored, &candidate) {
            return Ok(Outcome::Unchanged);
        }

        stored.overwrite_from(&candidate)?;
        self.store.save(&stored)?;
        Ok(Outcome::Updated)
    }

    /// Extract and reconcile one XML document
    pub fn import_document(&mut self, label: &str, xml: &str) -> Result<Outcome, ImportError> {
        let candidate = extract(xml).map_err(|source| ImportError::Malformed {
            label: label.to_string(),
            source,
        })?;

        self.reconcile(candidate)
            .map_err(|source| ImportError::Storage {
                label: label.to_string(),
                source,
            })
    }

    /// Import one file, labelled by its file stem
    pub fn import_file(&mut self, path: &Path) -> Result<Outcome, ImportError> {
        let xml = fs::read_to_string(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.import_document(&label_of(path), &xml)
    }

    /// Import every matching file directly inside `dir`, in file name order.
    ///
    /// A failing document is reported and counted, and the rest of the batch
    /// still runs, unless fail-fast is on. Only an unreadable `dir` fails the
    /// whole call up front.
    pub fn import_directory(
        &mut self,
        dir: &Path,
        reporter: &mut dyn Reporter,
    ) -> Result<ImportSummary, ImportError> {
        let files = self.source_files(dir)?;
        tracing::info!("Importing {} entries from {}", files.len(), dir.display());

        let mut summary = ImportSummary::default();
        for path in files {
            let label = label_of(&path);
            match self.import_file(&path) {
                Ok(outcome) => {
                    tracing::debug!("Entry {label} {outcome}");
                    reporter.outcome(&label, outcome);
                    summary.record(outcome);
                }
                Err(e) => {
                    tracing::warn!("{e}");
                    reporter.failure(&label, &e);
                    if self.fail_fast {
                        return Err(e);
                    }
                    summary.failures.push(e);
                }
            }
        }

        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            failed = summary.failures.len(),
            "Finished importing data"
        );
        Ok(summary)
    }

    fn source_files(&self, dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
        let to_error = |source| ImportError::SourceDirectory {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(to_error)? {
            let path = entry.map_err(to_error)?.path();
            let matches = path
                .extension()
                .is_some_and(|ext| ext == self.extension.as_str());
            if matches && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn label_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
