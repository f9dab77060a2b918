//! Follow-graph membership, mutation, and enriched listings.

use std::collections::HashSet;

use promptly_core::error::CoreError;
use promptly_core::pagination::{clamp_page, clamp_page_size, offset, Pagination};
use promptly_core::types::{DbId, Timestamp};
use promptly_db::repositories::FollowRepo;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Follower count after a follow/unfollow mutation.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowerCount {
    pub follower_count: i64,
}

/// A user in a followers listing, enriched with whether the viewer follows
/// them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowerView {
    pub id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub is_following: bool,
    pub followed_since: Timestamp,
}

/// A user in a following listing. `is_following` is always true here: the
/// listed user follows every row by definition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowingView {
    pub id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub is_following: bool,
    pub following_since: Timestamp,
}

/// One page of followers.
#[derive(Debug, Clone, Serialize)]
pub struct FollowerPage {
    pub followers: Vec<FollowerView>,
    pub pagination: Pagination,
}

/// One page of followed users.
#[derive(Debug, Clone, Serialize)]
pub struct FollowingPage {
    pub following: Vec<FollowingView>,
    pub pagination: Pagination,
}

/// Tracks directed follow edges between users.
pub struct FollowService;

impl FollowService {
    /// Whether `follower_id` follows `following_id`. `None` on either side
    /// (an anonymous viewer) resolves to `false` without a query.
    pub async fn is_following(
        pool: &PgPool,
        follower_id: Option<DbId>,
        following_id: Option<DbId>,
    ) -> AppResult<bool> {
        let (Some(follower_id), Some(following_id)) = (follower_id, following_id) else {
            return Ok(false);
        };
        Ok(FollowRepo::exists(pool, follower_id, following_id).await?)
    }

    /// Create a follow edge and return the target's updated follower count.
    ///
    /// Not idempotent: the caller is expected to have checked the edge does
    /// not already exist; a duplicate (including a racing double-submit)
    /// surfaces the unique-constraint violation, which maps to 409.
    pub async fn follow(
        pool: &PgPool,
        follower_id: DbId,
        following_id: DbId,
    ) -> AppResult<FollowerCount> {
        FollowRepo::insert(pool, follower_id, following_id).await?;
        tracing::info!(follower_id, following_id, "User followed");

        let follower_count = FollowRepo::count_followers(pool, following_id).await?;
        Ok(FollowerCount { follower_count })
    }

    /// Remove a follow edge and return the target's updated follower count.
    ///
    /// Fails with `NotFound` when no such edge exists.
    pub async fn unfollow(
        pool: &PgPool,
        follower_id: DbId,
        following_id: DbId,
    ) -> AppResult<FollowerCount> {
        let removed = FollowRepo::delete(pool, follower_id, following_id).await?;
        if !removed {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Follow",
                id: following_id,
            }));
        }
        tracing::info!(follower_id, following_id, "User unfollowed");

        let follower_count = FollowRepo::count_followers(pool, following_id).await?;
        Ok(FollowerCount { follower_count })
    }

    /// Page of users who follow `user_id`, newest edge first, each row
    /// enriched with whether the viewer follows that user.
    ///
    /// The enrichment is one set-membership query over the page's ids, not a
    /// per-row existence check.
    pub async fn list_followers(
        pool: &PgPool,
        user_id: DbId,
        viewer: Option<DbId>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<FollowerPage> {
        let page = clamp_page(page);
        let limit = clamp_page_size(limit);

        let total = FollowRepo::count_followers(pool, user_id).await?;
        let rows = FollowRepo::list_followers(pool, user_id, limit, offset(page, limit)).await?;

        let followed_by_viewer: HashSet<DbId> = match viewer {
            Some(viewer) => {
                let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
                FollowRepo::filter_following(pool, viewer, &ids)
                    .await?
                    .into_iter()
                    .collect()
            }
            None => HashSet::new(),
        };

        let followers = rows
            .into_iter()
            .map(|row| FollowerView {
                is_following: followed_by_viewer.contains(&row.id),
                id: row.id,
                name: row.name,
                image: row.image,
                bio: row.bio,
                followed_since: row.since,
            })
            .collect();

        Ok(FollowerPage {
            followers,
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// Page of users `user_id` follows, newest edge first.
    pub async fn list_following(
        pool: &PgPool,
        user_id: DbId,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<FollowingPage> {
        let page = clamp_page(page);
        let limit = clamp_page_size(limit);

        let total = FollowRepo::count_following(pool, user_id).await?;
        let rows = FollowRepo::list_following(pool, user_id, limit, offset(page, limit)).await?;

        let following = rows
            .into_iter()
            .map(|row| FollowingView {
                id: row.id,
                name: row.name,
                image: row.image,
                bio: row.bio,
                is_following: true,
                following_since: row.since,
            })
            .collect();

        Ok(FollowingPage {
            following,
            pagination: Pagination::new(page, limit, total),
        })
    }
}
