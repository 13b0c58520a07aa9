//! Identity for rolegate: who a caller is (credential ledger, principal) and what
//! their role lets them do (the static capability table).
//! Keep the public surface thin and split implementation across sub-modules.

mod role;
mod principal;
mod ledger;
mod authorizer;

pub use role::Role;
pub use principal::Principal;
pub use ledger::{CredentialLedger, Credential};
pub use authorizer::{AccessPolicy, Operation};
