//! User profile views and profile mutation.

use promptly_core::error::CoreError;
use promptly_core::types::DbId;
use promptly_db::models::user::{ProfileCounts, UpdateUser, User};
use promptly_db::repositories::{FollowRepo, UserRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// A user's public profile, with content/social counts and whether the
/// viewer follows them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileView {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    #[serde(rename = "_count")]
    pub counts: ProfileCounts,
    pub is_following: bool,
}

/// Profile reads and updates.
pub struct UserService;

impl UserService {
    /// Fetch a profile. Fails with `NotFound` when the user does not exist.
    pub async fn profile(
        pool: &PgPool,
        user_id: DbId,
        viewer: Option<DbId>,
    ) -> AppResult<UserProfileView> {
        let Some(user) = UserRepo::find_by_id(pool, user_id).await? else {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }));
        };

        let counts = UserRepo::profile_counts(pool, user_id).await?;
        let is_following = match viewer {
            Some(viewer) => FollowRepo::exists(pool, viewer, user_id).await?,
            None => false,
        };

        Ok(UserProfileView {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            bio: user.bio,
            counts,
            is_following,
        })
    }

    /// Update the viewer's own profile fields.
    pub async fn update_profile(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateUser,
    ) -> AppResult<User> {
        let updated = UserRepo::update(pool, user_id, input)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }))?;
        tracing::info!(user_id, "Profile updated");
        Ok(updated)
    }
}
