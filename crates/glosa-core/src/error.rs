use std::path::PathBuf;

/// Document could not be turned into a record
#[derive(Debug, thiserror::Error)]
pub enum MalformedDocument {
    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("root element has no id attribute")]
    MissingId,

    #[error("invalid id attribute: {0:?}")]
    InvalidId(String),
}

impl From<roxmltree::Error> for MalformedDocument {
    fn from(e: roxmltree::Error) -> Self {
        MalformedDocument::Xml(e.to_string())
    }
}

/// Persisted-state read or write failure
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Failure of one import step, labelled with the offending document
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Cannot list source directory {}: {source}", path.display())]
    SourceDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Entry {label}: malformed document: {source}")]
    Malformed {
        label: String,
        source: MalformedDocument,
    },

    #[error("Entry {label}: {source}")]
    Storage { label: String, source: StorageError },
}

impl ImportError {
    /// Label of the document the error belongs to, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            ImportError::Malformed { label, .. } | ImportError::Storage { label, .. } => {
                Some(label)
            }
            ImportError::SourceDirectory { .. } | ImportError::Read { .. } => None,
        }
    }
}
