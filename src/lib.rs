pub mod error;
pub mod ident;
pub mod identity;
pub mod filestore;
pub mod audit;
pub mod controller;
pub mod config;
pub mod system_paths;
pub mod cms;

pub use cms::Cms;
pub use config::CmsConfig;
pub use controller::AccessController;
pub use error::{CmsError, CmsResult};
pub use identity::{AccessPolicy, CredentialLedger, Operation, Principal, Role};
