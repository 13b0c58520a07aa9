//! Managed-file index: the persisted, insertion-ordered set of filenames the
//! system knows about. One filename per line; deletes rewrite the whole file.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{CmsError, CmsResult};

use super::fsio;

pub struct ManagedFileIndex {
    path: PathBuf,
    // Serializes read-modify-write cycles on the index file.
    lock: Mutex<()>,
}

impl ManagedFileIndex {
    pub fn open(path: impl Into<PathBuf>) -> CmsResult<Self> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            fsio::ensure_dir(dir)?;
        }
        Ok(Self { path, lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Current filenames in insertion order. A missing index file is an empty list;
    /// an unreadable one is a storage error.
    pub fn list(&self) -> CmsResult<Vec<String>> {
        let _g = self.lock.lock();
        self.read_entries()
    }

    pub fn contains(&self, filename: &str) -> CmsResult<bool> {
        Ok(self.list()?.iter().any(|f| f == filename))
    }

    pub fn add(&self, filename: &str) -> CmsResult<()> {
        let _g = self.lock.lock();
        if self.read_entries()?.iter().any(|f| f == filename) {
            return Err(CmsError::AlreadyManaged(filename.to_string()));
        }
        fsio::append_line(&self.path, filename)?;
        debug!(target: "rolegate::index", "index.add: '{}'", filename);
        Ok(())
    }

    pub fn remove(&self, filename: &str) -> CmsResult<()> {
        let _g = self.lock.lock();
        let entries = self.read_entries()?;
        if !entries.iter().any(|f| f == filename) {
            return Err(CmsError::NotManaged(filename.to_string()));
        }
        let mut body = String::new();
        for f in entries.iter().filter(|f| f.as_str() != filename) {
            body.push_str(f);
            body.push('\n');
        }
        fsio::write_atomic(&self.path, body.as_bytes())?;
        debug!(target: "rolegate::index", "index.remove: '{}' ({} remain)", filename, entries.len() - 1);
        Ok(())
    }

    fn read_entries(&self) -> CmsResult<Vec<String>> {
        let text = fsio::read_text_or_empty(&self.path)?;
        Ok(text.split_whitespace().map(str::to_string).collect())
    }
}
