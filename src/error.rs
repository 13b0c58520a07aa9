//! Unified error model for the ledger, the file store and the access controller.
//! Every failure is recoverable and reported to the caller as a structured value;
//! the CLI maps them to exit codes via [`CmsError::exit_code`].

use std::path::PathBuf;

use thiserror::Error;

use crate::identity::{Operation, Role};

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    #[error("invalid role '{0}': use admin, editor, or viewer")]
    InvalidRole(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("permission denied: {role} cannot {operation}")]
    PermissionDenied { role: Role, operation: Operation },

    #[error("file is already managed: {0}")]
    AlreadyManaged(String),

    #[error("file already exists: {0}")]
    AlreadyExists(String),

    #[error("file is not managed: {0}")]
    NotManaged(String),

    #[error("file does not exist: {0}")]
    NotFound(String),

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("storage failure during {op} on {}: {source}", .path.display())]
    Storage {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CmsResult<T> = Result<T, CmsError>;

impl CmsError {
    pub fn invalid<S: Into<String>>(field: &'static str, reason: S) -> Self {
        CmsError::InvalidInput { field, reason: reason.into() }
    }

    pub fn storage(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CmsError::Storage { op, path: path.into(), source }
    }

    pub fn code_str(&self) -> &'static str {
        match self {
            CmsError::DuplicateUsername(_) => "duplicate_username",
            CmsError::InvalidRole(_) => "invalid_role",
            CmsError::InvalidCredentials => "invalid_credentials",
            CmsError::PermissionDenied { .. } => "permission_denied",
            CmsError::AlreadyManaged(_) => "already_managed",
            CmsError::AlreadyExists(_) => "already_exists",
            CmsError::NotManaged(_) => "not_managed",
            CmsError::NotFound(_) => "not_found",
            CmsError::InvalidInput { .. } => "invalid_input",
            CmsError::Storage { .. } => "storage_failure",
        }
    }

    /// Map to a process exit code for the command-line adapter.
    /// Follows the sysexits(3) families where one fits.
    pub fn exit_code(&self) -> i32 {
        match self {
            CmsError::InvalidInput { .. } | CmsError::InvalidRole(_) => 64, // EX_USAGE
            CmsError::NotFound(_) | CmsError::NotManaged(_) => 66,          // EX_NOINPUT
            CmsError::DuplicateUsername(_)
            | CmsError::AlreadyExists(_)
            | CmsError::AlreadyManaged(_) => 73,                            // EX_CANTCREAT
            CmsError::Storage { .. } => 74,                                 // EX_IOERR
            CmsError::InvalidCredentials | CmsError::PermissionDenied { .. } => 77, // EX_NOPERM
        }
    }

    /// True for the "no such file" family regardless of which layer reported it.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CmsError::NotFound(_) | CmsError::NotManaged(_))
    }
}
