//! Repository for the `follows` table (directed follow edges).

use sqlx::PgPool;

use promptly_core::types::DbId;

use crate::models::follow::FollowEdgeUser;

/// Provides follow-edge creation/removal, membership checks, counts, and
/// enriched listings.
pub struct FollowRepo;

impl FollowRepo {
    /// Create a follow edge.
    ///
    /// A plain INSERT: following someone twice violates
    /// `uq_follows_follower_following` and the error propagates to the
    /// caller, which maps it to a conflict.
    pub async fn insert(
        pool: &PgPool,
        follower_id: DbId,
        following_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO follows (follower_id, following_id) VALUES ($1, $2)")
            .bind(follower_id)
            .bind(following_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a follow edge. Returns `true` when an edge was removed.
    pub async fn delete(
        pool: &PgPool,
        follower_id: DbId,
        following_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
                .bind(follower_id)
                .bind(following_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether `follower_id` follows `following_id`.
    pub async fn exists(
        pool: &PgPool,
        follower_id: DbId,
        following_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(\
                SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(pool)
        .await
    }

    /// Number of users following `user_id`.
    pub async fn count_followers(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE following_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Number of users `user_id` follows.
    pub async fn count_following(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Page of users who follow `user_id`, newest edge first.
    pub async fn list_followers(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FollowEdgeUser>, sqlx::Error> {
        sqlx::query_as::<_, FollowEdgeUser>(
            "SELECT u.id, u.name, u.image, u.bio, f.created_at AS since \
             FROM follows f \
             JOIN users u ON u.id = f.follower_id \
             WHERE f.following_id = $1 \
             ORDER BY f.created_at DESC, f.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Page of users `user_id` follows, newest edge first.
    pub async fn list_following(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FollowEdgeUser>, sqlx::Error> {
        sqlx::query_as::<_, FollowEdgeUser>(
            "SELECT u.id, u.name, u.image, u.bio, f.created_at AS since \
             FROM follows f \
             JOIN users u ON u.id = f.following_id \
             WHERE f.follower_id = $1 \
             ORDER BY f.created_at DESC, f.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// IDs of every user `user_id` follows.
    ///
    /// Backs the follow feed's author set.
    pub async fn following_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT following_id FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Of `candidate_ids`, the subset the viewer follows.
    ///
    /// One set-membership query replaces a per-row `exists` check when
    /// enriching follower listings.
    pub async fn filter_following(
        pool: &PgPool,
        viewer_id: DbId,
        candidate_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT following_id FROM follows \
             WHERE follower_id = $1 AND following_id = ANY($2)",
        )
        .bind(viewer_id)
        .bind(candidate_ids)
        .fetch_all(pool)
        .await
    }
}
