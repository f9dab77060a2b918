//! Domain model structs and DTOs.
//!
//! Each submodule contains the `FromRow` structs its repository fetches
//! (entity rows and joined listing rows), create/update DTOs for writes,
//! and query-parameter structs where the entity has a list endpoint. Join
//! tables whose rows are pure membership (bookmarks, follow edges) expose
//! no entity struct, only enriched listing rows.

pub mod category;
pub mod comment;
pub mod follow;
pub mod model;
pub mod prompt;
pub mod rating;
pub mod user;
