//! Common types used across the application.

pub mod id;
pub mod revision;

pub use id::*;
pub use revision::Revision;
