use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::Role;

/// File operations gated by the capability table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ListFiles,
    ViewContent,
    CreateFile,
    EditFile,
    DeleteFile,
}

impl Operation {
    /// Table order; also the order capabilities are reported in.
    pub const ALL: [Operation; 5] = [
        Operation::ListFiles,
        Operation::ViewContent,
        Operation::CreateFile,
        Operation::EditFile,
        Operation::DeleteFile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListFiles => "list files",
            Operation::ViewContent => "view content",
            Operation::CreateFile => "create file",
            Operation::EditFile => "edit file",
            Operation::DeleteFile => "delete file",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static role -> operation permission table. Pure: no I/O, no state.
///
/// | Operation    | Admin | Editor | Viewer |
/// |--------------|-------|--------|--------|
/// | list files   | allow | allow  | allow  |
/// | view content | allow | allow  | allow  |
/// | create file  | allow | deny   | deny   |
/// | edit file    | allow | allow  | deny   |
/// | delete file  | allow | deny   | deny   |
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    pub const fn is_allowed(role: Role, op: Operation) -> bool {
        match (role, op) {
            (Role::Admin, _) => true,
            (_, Operation::ListFiles | Operation::ViewContent) => true,
            (Role::Editor, Operation::EditFile) => true,
            (Role::Editor, Operation::CreateFile | Operation::DeleteFile) => false,
            (Role::Viewer, Operation::CreateFile | Operation::EditFile | Operation::DeleteFile) => false,
        }
    }

    /// Operations the role may perform, in table order.
    pub fn capabilities(role: Role) -> Vec<Operation> {
        Operation::ALL.into_iter().filter(|op| Self::is_allowed(role, *op)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_exactly() {
        use Operation::*;
        let expected: [(Role, [bool; 5]); 3] = [
            (Role::Admin, [true, true, true, true, true]),
            (Role::Editor, [true, true, false, true, false]),
            (Role::Viewer, [true, true, false, false, false]),
        ];
        for (role, row) in expected {
            for (op, allow) in [ListFiles, ViewContent, CreateFile, EditFile, DeleteFile].into_iter().zip(row) {
                assert_eq!(AccessPolicy::is_allowed(role, op), allow, "{} / {}", role, op);
            }
        }
    }

    #[test]
    fn capabilities_in_table_order() {
        assert_eq!(AccessPolicy::capabilities(Role::Admin), Operation::ALL.to_vec());
        assert_eq!(
            AccessPolicy::capabilities(Role::Editor),
            vec![Operation::ListFiles, Operation::ViewContent, Operation::EditFile]
        );
        assert_eq!(
            AccessPolicy::capabilities(Role::Viewer),
            vec![Operation::ListFiles, Operation::ViewContent]
        );
    }
}
