pub mod config;
pub mod tenant;
pub mod user_store;

pub use config::*;
pub use tenant::*;
pub use user_store::*;
