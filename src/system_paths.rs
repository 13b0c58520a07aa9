use std::path::PathBuf;

use crate::config::CmsConfig;

/// Centralized helpers for the persisted files under the configured root.
/// Keeps locations consistent across the ledger, the index, content and audit.
#[inline]
pub fn ledger_path(cfg: &CmsConfig) -> PathBuf { cfg.root.join(&cfg.ledger_file) }

#[inline]
pub fn index_path(cfg: &CmsConfig) -> PathBuf { cfg.root.join(&cfg.index_file) }

#[inline]
pub fn content_dir(cfg: &CmsConfig) -> PathBuf { cfg.root.join(&cfg.content_dir) }

#[inline]
pub fn audit_log_path(cfg: &CmsConfig) -> PathBuf { cfg.root.join(&cfg.audit_log_file) }
