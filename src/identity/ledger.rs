//! Credential ledger: append-only `username password role` records, one per line.
//!
//! Passwords are stored as given. There is no update or delete operation;
//! a username, once registered, keeps its password and role for the ledger's lifetime.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::audit::{AuditChannel, AuditEvent};
use crate::error::{CmsError, CmsResult};
use crate::filestore::fsio;
use crate::ident::validate_token;

use super::{Principal, Role};

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
    pub role: Role,
}

// Never print the password.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

pub struct CredentialLedger {
    path: PathBuf,
    audit: Arc<AuditChannel>,
    // Held across exists-check + append so two registrations of one name cannot both succeed.
    register_lock: Mutex<()>,
}

impl CredentialLedger {
    pub fn open(path: impl Into<PathBuf>, audit: Arc<AuditChannel>) -> CmsResult<Self> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            fsio::ensure_dir(dir)?;
        }
        Ok(Self { path, audit, register_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path { &self.path }

    /// All well-formed records in file order. Malformed lines are skipped with a warning.
    pub fn records(&self) -> CmsResult<Vec<Credential>> {
        let text = fsio::read_text_or_empty(&self.path)?;
        let mut out = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [] => continue,
                [username, password, role] => match role.parse::<Role>() {
                    Ok(role) => out.push(Credential {
                        username: username.to_string(),
                        password: password.to_string(),
                        role,
                    }),
                    Err(_) => warn!(
                        target: "rolegate::ledger",
                        "ledger {}:{}: unknown role '{}'; record skipped",
                        self.path.display(), lineno + 1, role
                    ),
                },
                other => warn!(
                    target: "rolegate::ledger",
                    "ledger {}:{}: expected 3 fields, found {}; record skipped",
                    self.path.display(), lineno + 1, other.len()
                ),
            }
        }
        Ok(out)
    }

    pub fn exists(&self, username: &str) -> CmsResult<bool> {
        Ok(self.records()?.iter().any(|c| c.username == username))
    }

    /// Append a new credential. The role is taken as a tag (`admin`, `editor`, `viewer`).
    pub fn register(&self, username: &str, password: &str, role: &str) -> CmsResult<()> {
        validate_token("username", username)?;
        let _g = self.register_lock.lock();
        // A taken name is reported as such whatever password or role accompanies it.
        if self.exists(username)? {
            debug!(target: "rolegate::ledger", "register: duplicate username '{}'", username);
            return Err(CmsError::DuplicateUsername(username.to_string()));
        }
        validate_token("password", password)?;
        let role: Role = role.parse()?;
        fsio::append_line(&self.path, &format!("{} {} {}", username, password, role))?;
        info!(target: "rolegate::ledger", "register: '{}' as {}", username, role);
        self.audit.publish(AuditEvent::user_registered(username, role));
        Ok(())
    }

    /// Verify credentials against the first record matching both username and password.
    pub fn login(&self, username: &str, password: &str) -> CmsResult<Principal> {
        let found = self
            .records()?
            .into_iter()
            .find(|c| c.username == username && c.password == password);
        let Some(cred) = found else {
            debug!(target: "rolegate::ledger", "login: rejected '{}'", username);
            return Err(CmsError::InvalidCredentials);
        };
        info!(target: "rolegate::ledger", "login: '{}' as {}", cred.username, cred.role);
        self.audit.publish(AuditEvent::user_logged_in(&cred.username, cred.role));
        Ok(Principal::new(cred.username, cred.role))
    }

    pub fn authenticate(&self, username: &str, password: &str) -> CmsResult<Role> {
        self.login(username, password).map(|p| p.role)
    }
}
