pub mod error;
pub mod extract;
pub mod import;
pub mod markup;
pub mod record;
pub mod search;
pub mod store;

pub use error::{ImportError, MalformedDocument, StorageError};
pub use extract::extract;
pub use import::{ImportSummary, Importer, Outcome, Reporter};
pub use markup::render;
pub use record::DictionaryRecord;
pub use search::{normalize_term, search};
pub use store::{MemoryStore, RecordStore};
