//! Composition root: builds every component once from a [`CmsConfig`] and wires
//! them to a single shared audit channel. Construct one per process and pass it
//! by reference; there is no global instance.

use std::sync::Arc;

use tracing::info;

use crate::audit::{AuditChannel, FileLogger};
use crate::config::CmsConfig;
use crate::controller::AccessController;
use crate::error::CmsResult;
use crate::filestore::{fsio, FileContentStore, ManagedFileIndex};
use crate::identity::{CredentialLedger, Principal, Role};
use crate::system_paths;

pub struct Cms {
    pub ledger: CredentialLedger,
    pub controller: AccessController,
    audit: Arc<AuditChannel>,
}

impl Cms {
    /// Open (creating directories as needed) the store described by `cfg`.
    /// The default file-logging subscriber is attached when `cfg.audit_log_enabled`.
    pub fn open(cfg: &CmsConfig) -> CmsResult<Self> {
        fsio::ensure_dir(&cfg.root)?;
        let audit = Arc::new(AuditChannel::new());
        if cfg.audit_log_enabled {
            audit.subscribe(Arc::new(FileLogger::new(system_paths::audit_log_path(cfg))));
        }
        let ledger = CredentialLedger::open(system_paths::ledger_path(cfg), audit.clone())?;
        let index = ManagedFileIndex::open(system_paths::index_path(cfg))?;
        let content = FileContentStore::open(system_paths::content_dir(cfg))?;
        let controller = AccessController::new(index, content, audit.clone());
        info!(
            target: "rolegate",
            "store opened: root='{}' audit_log={}",
            cfg.root.display(), cfg.audit_log_enabled
        );
        Ok(Self { ledger, controller, audit })
    }

    pub fn audit(&self) -> &Arc<AuditChannel> { &self.audit }

    pub fn register(&self, username: &str, password: &str, role: &str) -> CmsResult<()> {
        self.ledger.register(username, password, role)
    }

    pub fn authenticate(&self, username: &str, password: &str) -> CmsResult<Role> {
        self.ledger.authenticate(username, password)
    }

    pub fn login(&self, username: &str, password: &str) -> CmsResult<Principal> {
        self.ledger.login(username, password)
    }

    pub fn list_files(&self, who: &Principal) -> CmsResult<Vec<String>> {
        self.controller.list_files(who)
    }

    pub fn view_content(&self, who: &Principal, filename: &str) -> CmsResult<Vec<u8>> {
        self.controller.view_content(who, filename)
    }

    pub fn create_file(&self, who: &Principal, filename: &str, content: &[u8]) -> CmsResult<()> {
        self.controller.create_file(who, filename, content)
    }

    pub fn edit_file(&self, who: &Principal, filename: &str, content: &[u8]) -> CmsResult<()> {
        self.controller.edit_file(who, filename, content)
    }

    pub fn delete_file(&self, who: &Principal, filename: &str) -> CmsResult<()> {
        self.controller.delete_file(who, filename)
    }
}
