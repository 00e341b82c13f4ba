pub mod role;
pub mod tenant;

pub use role::*;
pub use tenant::*;
