//! Byte bodies of managed files, one file per filename under the content directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CmsError, CmsResult};

use super::fsio;

pub struct FileContentStore {
    dir: PathBuf,
}

impl FileContentStore {
    pub fn open(dir: impl Into<PathBuf>) -> CmsResult<Self> {
        let dir = dir.into();
        fsio::ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path { &self.dir }

    /// Callers pass canonical filenames (see `paths::canonical_filename`).
    fn body_path(&self, filename: &str) -> PathBuf { self.dir.join(filename) }

    pub fn exists(&self, filename: &str) -> bool { self.body_path(filename).is_file() }

    pub fn read(&self, filename: &str) -> CmsResult<Vec<u8>> {
        fsio::read_optional(&self.body_path(filename))?
            .ok_or_else(|| CmsError::NotFound(filename.to_string()))
    }

    /// Create or fully replace the body.
    pub fn write(&self, filename: &str, bytes: &[u8]) -> CmsResult<()> {
        fsio::write_atomic(&self.body_path(filename), bytes)?;
        debug!(target: "rolegate::content", "content.write: '{}' {} bytes", filename, bytes.len());
        Ok(())
    }

    pub fn delete(&self, filename: &str) -> CmsResult<()> {
        if !fsio::remove_if_exists(&self.body_path(filename))? {
            return Err(CmsError::NotFound(filename.to_string()));
        }
        debug!(target: "rolegate::content", "content.delete: '{}'", filename);
        Ok(())
    }
}
