use serde::{Deserialize, Serialize};

use super::Role;

/// An authenticated caller. Lives for one authenticated operation window;
/// nothing about it is persisted beyond the ledger record it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self { username: username.into(), role }
    }
}
