//! Access controller: the single policy-gated path to the managed files.
//!
//! Every request goes `Requested -> PolicyChecked -> {Executed, Denied}`.
//! Denied requests touch no storage and publish nothing. Executed requests
//! either succeed (and publish exactly one audit event) or fail with the
//! store's error.
//!
//! Ordering rules for the index/content pair:
//! - create writes content before adding the index entry;
//! - delete removes content before removing the index entry.
//! A crash between the two steps can leave orphaned content, never an index
//! entry without content.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::audit::{AuditChannel, AuditEvent, FileAction};
use crate::error::{CmsError, CmsResult};
use crate::filestore::{canonical_filename, FileContentStore, ManagedFileIndex};
use crate::identity::{AccessPolicy, Operation, Principal};

pub struct AccessController {
    index: ManagedFileIndex,
    content: FileContentStore,
    audit: Arc<AuditChannel>,
    // One mutex per filename serializes mutations of that file's index/content pair.
    // Audit events are published after the mutex is released.
    file_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AccessController {
    pub fn new(index: ManagedFileIndex, content: FileContentStore, audit: Arc<AuditChannel>) -> Self {
        Self { index, content, audit, file_locks: Mutex::new(HashMap::new()) }
    }

    pub fn audit(&self) -> &Arc<AuditChannel> { &self.audit }

    fn check(&self, who: &Principal, op: Operation) -> CmsResult<()> {
        if AccessPolicy::is_allowed(who.role, op) {
            return Ok(());
        }
        debug!(target: "rolegate::access", "denied: user='{}' role={} op='{}'", who.username, who.role, op);
        Err(CmsError::PermissionDenied { role: who.role, operation: op })
    }

    /// Run `f` holding the lock for `filename`. The table entry is dropped again
    /// once no other caller holds or waits on it, so the table only tracks names
    /// currently in use.
    fn with_file_lock<T>(&self, filename: &str, f: impl FnOnce() -> CmsResult<T>) -> CmsResult<T> {
        let lock = self
            .file_locks
            .lock()
            .entry(filename.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let res = {
            let _g = lock.lock();
            f()
        };
        let mut table = self.file_locks.lock();
        // One reference in the table plus ours: nobody else is waiting.
        if Arc::strong_count(&lock) == 2 {
            table.remove(filename);
        }
        res
    }

    pub fn list_files(&self, who: &Principal) -> CmsResult<Vec<String>> {
        self.check(who, Operation::ListFiles)?;
        let files = self.index.list()?;
        if !files.is_empty() {
            self.audit.publish(AuditEvent::listed_files(&who.username));
        }
        Ok(files)
    }

    pub fn view_content(&self, who: &Principal, filename: &str) -> CmsResult<Vec<u8>> {
        self.check(who, Operation::ViewContent)?;
        let name = canonical_filename(filename)?;
        let bytes = self.content.read(&name)?;
        self.audit.publish(AuditEvent::file_action(&who.username, FileAction::ViewedContent, &name));
        Ok(bytes)
    }

    pub fn create_file(&self, who: &Principal, filename: &str, content: &[u8]) -> CmsResult<()> {
        self.check(who, Operation::CreateFile)?;
        let name = canonical_filename(filename)?;
        self.with_file_lock(&name, || {
            if self.index.contains(&name)? {
                return Err(CmsError::AlreadyExists(name.clone()));
            }
            if self.content.exists(&name) {
                warn!(target: "rolegate::access", "create: overwriting orphaned content for '{}'", name);
            }
            self.content.write(&name, content)?;
            self.index.add(&name).map_err(|e| match e {
                CmsError::AlreadyManaged(n) => CmsError::AlreadyExists(n),
                other => other,
            })
        })?;
        info!(target: "rolegate::access", "create: user='{}' file='{}' bytes={}", who.username, name, content.len());
        self.audit.publish(AuditEvent::file_action(&who.username, FileAction::Created, &name));
        Ok(())
    }

    pub fn edit_file(&self, who: &Principal, filename: &str, content: &[u8]) -> CmsResult<()> {
        self.check(who, Operation::EditFile)?;
        let name = canonical_filename(filename)?;
        self.with_file_lock(&name, || {
            if !self.index.contains(&name)? {
                return Err(CmsError::NotFound(name.clone()));
            }
            self.content.write(&name, content)
        })?;
        info!(target: "rolegate::access", "edit: user='{}' file='{}' bytes={}", who.username, name, content.len());
        self.audit.publish(AuditEvent::file_action(&who.username, FileAction::Edited, &name));
        Ok(())
    }

    pub fn delete_file(&self, who: &Principal, filename: &str) -> CmsResult<()> {
        self.check(who, Operation::DeleteFile)?;
        let name = canonical_filename(filename)?;
        self.with_file_lock(&name, || {
            if !self.index.contains(&name)? {
                return Err(CmsError::NotFound(name.clone()));
            }
            match self.content.delete(&name) {
                Ok(()) => {}
                Err(CmsError::NotFound(_)) => {
                    warn!(target: "rolegate::access", "delete: '{}' was indexed without content; dropping entry", name);
                }
                Err(e) => return Err(e),
            }
            self.index.remove(&name).map_err(|e| match e {
                CmsError::NotManaged(n) => CmsError::NotFound(n),
                other => other,
            })
        })?;
        info!(target: "rolegate::access", "delete: user='{}' file='{}'", who.username, name);
        self.audit.publish(AuditEvent::file_action(&who.username, FileAction::Deleted, &name));
        Ok(())
    }
}
