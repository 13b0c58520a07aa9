//! Persisted file state: the managed-file index and the content bodies it points at.
//! The two are only mutated together through `crate::controller::AccessController`.

pub mod paths;
pub mod fsio;
pub mod index;
pub mod content;

pub use paths::{normalize_nfc, validate_filename, canonical_filename};
pub use index::ManagedFileIndex;
pub use content::FileContentStore;
