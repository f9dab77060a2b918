//! User entity model and DTOs.

use promptly_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
///
/// Account provisioning itself (credentials, OAuth identities) lives in the
/// fronting session layer; this row is the profile it references.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub bio: Option<String>,
}

/// DTO for updating a user profile. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
}

/// Content and social-graph counts shown on a profile page.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCounts {
    pub prompts: i64,
    pub followers: i64,
    pub following: i64,
}
