//! Enriched listing rows for the `follows` table.
//!
//! Follow edges themselves are pure membership rows; the repository exposes
//! inserts/deletes/existence checks without an entity struct.

use promptly_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// One side of a follow edge joined with the user's display fields.
///
/// `since` is the edge's creation time -- "followed since" when listing
/// followers, "following since" when listing followees.
#[derive(Debug, Clone, FromRow)]
pub struct FollowEdgeUser {
    pub id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub since: Timestamp,
}
