//! Repository for the `users` table.

use sqlx::PgPool;

use promptly_core::types::DbId;

use crate::models::user::{CreateUser, ProfileCounts, UpdateUser, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, name, email, image, bio, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user. Returns the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, image, bio) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.image)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }

    /// Find a user by their primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a user exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Update a user's profile fields. Only provided fields change.
    /// Returns `None` if no user with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                image = COALESCE($3, image), \
                bio = COALESCE($4, bio), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.image)
            .bind(&input.bio)
            .fetch_optional(pool)
            .await
    }

    /// Prompt/follower/following counts for a profile page, in one query.
    pub async fn profile_counts(pool: &PgPool, id: DbId) -> Result<ProfileCounts, sqlx::Error> {
        sqlx::query_as::<_, ProfileCounts>(
            "SELECT \
                (SELECT COUNT(*) FROM prompts WHERE user_id = $1) AS prompts, \
                (SELECT COUNT(*) FROM follows WHERE following_id = $1) AS followers, \
                (SELECT COUNT(*) FROM follows WHERE follower_id = $1) AS following",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
