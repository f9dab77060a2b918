//! Pure domain logic shared by the repository and API layers.
//!
//! This crate has zero internal dependencies so it can be used from the
//! persistence crate, the API crate, and any future CLI tooling.

pub mod error;
pub mod format;
pub mod pagination;
pub mod placeholder;
pub mod types;
