//! Request handlers.
//!
//! Handlers stay thin: they parse the request, resolve the viewer, delegate
//! to a service, and map errors via [`crate::error::AppError`].

pub mod catalog;
pub mod health;
pub mod prompts;
pub mod users;
