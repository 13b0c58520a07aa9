use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Role;

/// File actions that appear in audit text, rendered as "User <u>: <verb> file <name>".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    ViewedContent,
    Created,
    Edited,
    Deleted,
}

impl FileAction {
    fn verb(&self) -> &'static str {
        match self {
            FileAction::ViewedContent => "viewed content of",
            FileAction::Created => "created",
            FileAction::Edited => "edited",
            FileAction::Deleted => "deleted",
        }
    }
}

/// Immutable audit record. Only `message` is part of the delivered text;
/// `at` is the publish time for subscribers that want it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub message: String,
    pub at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), at: Utc::now() }
    }

    pub fn user_registered(username: &str, role: Role) -> Self {
        Self::new(format!("User registered: {} ({})", username, role))
    }

    pub fn user_logged_in(username: &str, role: Role) -> Self {
        Self::new(format!("User logged in: {} ({})", username, role))
    }

    pub fn listed_files(username: &str) -> Self {
        Self::new(format!("User {}: viewed list of files", username))
    }

    pub fn file_action(username: &str, action: FileAction, filename: &str) -> Self {
        Self::new(format!("User {}: {} file {}", username, action.verb(), filename))
    }
}

impl Display for AuditEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<String> for AuditEvent {
    fn from(message: String) -> Self { Self::new(message) }
}

impl From<&str> for AuditEvent {
    fn from(message: &str) -> Self { Self::new(message) }
}
