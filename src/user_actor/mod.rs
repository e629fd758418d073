//! User documents: validation on create and admin edits, unique email.

pub mod entity;
pub mod error;

pub use error::*;
