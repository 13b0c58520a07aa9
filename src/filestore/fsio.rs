//! Small filesystem primitives shared by the ledger, the index and the content store.
//! All I/O errors surface as `CmsError::Storage` tagged with the operation and path.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use crate::error::{CmsError, CmsResult};

/// Read a whole file; `Ok(None)` when it does not exist.
pub fn read_optional(path: &Path) -> CmsResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CmsError::storage("read", path, e)),
    }
}

/// Read a text file; a missing file reads as empty.
pub fn read_text_or_empty(path: &Path) -> CmsResult<String> {
    let bytes = read_optional(path)?.unwrap_or_default();
    String::from_utf8(bytes).map_err(|e| {
        CmsError::storage("decode", path, std::io::Error::new(ErrorKind::InvalidData, e))
    })
}

pub fn ensure_dir(dir: &Path) -> CmsResult<()> {
    fs::create_dir_all(dir).map_err(|e| CmsError::storage("create_dir", dir, e))
}

/// Replace `path` with `bytes` via a sibling temp file and rename,
/// so readers see either the old body or the new one, never a torn write.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> CmsResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("body");
    let tmp = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));
    let written = (|| -> std::io::Result<()> {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(CmsError::storage("write", path, e));
    }
    debug!(target: "rolegate::fsio", "write_atomic: path='{}' bytes={}", path.display(), bytes.len());
    Ok(())
}

/// Append one record line with a single write so concurrent appenders never interleave fields.
pub fn append_line(path: &Path, line: &str) -> CmsResult<()> {
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CmsError::storage("open", path, e))?;
    f.write_all(buf.as_bytes()).map_err(|e| CmsError::storage("append", path, e))
}

/// Remove a file; `Ok(false)` when it was already absent.
pub fn remove_if_exists(path: &Path) -> CmsResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CmsError::storage("delete", path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn atomic_write_replaces_and_leaves_no_temp() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("a.txt");
        write_atomic(&p, b"first").unwrap();
        write_atomic(&p, b"second").unwrap();
        assert_eq!(fs::read(&p).unwrap(), b"second");
        let names: Vec<_> = fs::read_dir(tmp.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names.len(), 1, "temp file left behind: {:?}", names);
    }

    #[test]
    fn missing_files_read_as_absent() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("nope");
        assert!(read_optional(&p).unwrap().is_none());
        assert_eq!(read_text_or_empty(&p).unwrap(), "");
        assert!(!remove_if_exists(&p).unwrap());
    }

    #[test]
    fn append_line_accumulates() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("log.txt");
        append_line(&p, "one").unwrap();
        append_line(&p, "two").unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn write_into_missing_dir_is_storage_error() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("no_such_dir").join("a.txt");
        match write_atomic(&p, b"x") {
            Err(CmsError::Storage { op, .. }) => assert_eq!(op, "write"),
            other => panic!("expected storage error, got {:?}", other),
        }
    }
}
