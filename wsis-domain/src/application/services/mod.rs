pub mod identity_admin;

pub use identity_admin::*;
