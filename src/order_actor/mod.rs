//! Order documents and the status/payment transitions applied to them.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
