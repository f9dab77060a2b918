//! Rating entity model.

use promptly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `ratings` table. At most one row exists per
/// (prompt, user) pair; re-rating updates the row in place.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub prompt_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
