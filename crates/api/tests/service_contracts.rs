//! Service-layer contract tests: rating aggregation, bookmark idempotence,
//! view enrichment, the follow feed, and owner checks, all against a real
//! database.

mod common;

use common::{seed_prompt, seed_user, test_uploads_dir};
use promptly_api::error::AppError;
use promptly_api::services::image_store::{ImageStore, UploadedImage};
use promptly_api::services::prompt_service::{
    CreatePromptInput, PromptListOptions, UpdatePromptInput,
};
use promptly_api::services::save_service::SaveAction;
use promptly_api::services::{
    CatalogService, CommentService, FollowService, PromptService, RatingService, SaveService,
    UserService,
};
use promptly_core::error::CoreError;
use promptly_db::models::category::CategorySort;
use promptly_db::models::prompt::{PromptListParams, SortOrder};
use promptly_db::repositories::{FollowRepo, PromptRepo};
use sqlx::PgPool;

fn image_store() -> ImageStore {
    ImageStore::new(test_uploads_dir())
}

fn assert_validation(err: AppError) {
    match err {
        AppError::Core(CoreError::Validation(_)) => {}
        other => panic!("expected a validation error, got {other:?}"),
    }
}

fn assert_not_found(err: AppError) {
    match err {
        AppError::Core(CoreError::NotFound { .. }) => {}
        other => panic!("expected not-found, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rating_last_write_wins(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let rater = seed_user(&pool, "rater").await;
    let prompt_id = seed_prompt(&pool, author, "Rated twice").await;

    RatingService::rate_prompt(&pool, rater, prompt_id, 3)
        .await
        .unwrap();
    let summary = RatingService::rate_prompt(&pool, rater, prompt_id, 5)
        .await
        .unwrap();

    assert_eq!(summary.average_rating, 5.0);
    assert_eq!(summary.total_ratings, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rating_aggregate_is_the_mean(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let prompt_id = seed_prompt(&pool, author, "Popular").await;

    let mut last = None;
    for (i, value) in [5, 4, 3].into_iter().enumerate() {
        let rater = seed_user(&pool, &format!("rater{i}")).await;
        last = Some(
            RatingService::rate_prompt(&pool, rater, prompt_id, value)
                .await
                .unwrap(),
        );
    }

    let summary = last.unwrap();
    assert_eq!(summary.average_rating, 4.0);
    assert_eq!(summary.total_ratings, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rating_rejects_out_of_range_values(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let rater = seed_user(&pool, "rater").await;
    let prompt_id = seed_prompt(&pool, author, "Strict").await;

    assert_validation(
        RatingService::rate_prompt(&pool, rater, prompt_id, 0)
            .await
            .unwrap_err(),
    );
    assert_validation(
        RatingService::rate_prompt(&pool, rater, prompt_id, 6)
            .await
            .unwrap_err(),
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rating_missing_prompt_is_not_found(pool: PgPool) {
    let rater = seed_user(&pool, "rater").await;

    assert_not_found(
        RatingService::rate_prompt(&pool, rater, 9999, 4)
            .await
            .unwrap_err(),
    );
}

// ---------------------------------------------------------------------------
// Bookmarks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn double_save_is_idempotent(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let saver = seed_user(&pool, "saver").await;
    let prompt_id = seed_prompt(&pool, author, "Bookmarkable").await;

    SaveService::toggle(&pool, saver, prompt_id, SaveAction::Save)
        .await
        .unwrap();
    let second = SaveService::toggle(&pool, saver, prompt_id, SaveAction::Save)
        .await
        .unwrap();

    assert!(second.is_saved);
    assert_eq!(second.save_count, 1);
    assert!(SaveService::is_saved(&pool, Some(saver), Some(prompt_id))
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsave_of_never_saved_is_a_noop(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let viewer = seed_user(&pool, "viewer").await;
    let prompt_id = seed_prompt(&pool, author, "Unsaved").await;

    let result = SaveService::toggle(&pool, viewer, prompt_id, SaveAction::Unsave)
        .await
        .unwrap();

    assert!(!result.is_saved);
    assert_eq!(result.save_count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_toggle_requires_the_prompt_to_exist(pool: PgPool) {
    let viewer = seed_user(&pool, "viewer").await;

    assert_not_found(
        SaveService::toggle(&pool, viewer, 9999, SaveAction::Save)
            .await
            .unwrap_err(),
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn anonymous_viewer_is_never_saved(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let prompt_id = seed_prompt(&pool, author, "Anon").await;

    assert!(!SaveService::is_saved(&pool, None, Some(prompt_id))
        .await
        .unwrap());
    assert_eq!(SaveService::count_for_user(&pool, None).await.unwrap(), 0);
    assert!(SaveService::list_saved_prompt_ids(&pool, None)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Prompt views
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_view_falls_back_to_a_generated_image(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let prompt_id = seed_prompt(&pool, author, "No image anywhere").await;
    let images = image_store();

    let view = PromptService::get_by_id(&pool, &images, prompt_id, None)
        .await
        .unwrap()
        .unwrap();

    // No stored image and no uploaded files: the image is a placeholder,
    // never empty.
    assert!(view.image.starts_with("https://ui-avatars.com/"));
    assert_eq!(view.image_urls, vec![view.image.clone()]);
    assert!(!view.is_saved);
    assert!(view.comments.is_some_and(|c| c.is_empty()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_prompt_reads_as_none(pool: PgPool) {
    let images = image_store();
    assert!(PromptService::get_by_id(&pool, &images, 9999, None)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn saved_flags_are_per_viewer_within_one_batch(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let v = seed_user(&pool, "viewer-v").await;
    let w = seed_user(&pool, "viewer-w").await;
    let prompt_id = seed_prompt(&pool, author, "Saved by V only").await;
    let images = image_store();

    SaveService::toggle(&pool, v, prompt_id, SaveAction::Save)
        .await
        .unwrap();

    let for_v = PromptService::list(
        &pool,
        &images,
        PromptListOptions {
            viewer: Some(v),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let for_w = PromptService::list(
        &pool,
        &images,
        PromptListOptions {
            viewer: Some(w),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let v_row = for_v.prompts.iter().find(|p| p.id == prompt_id).unwrap();
    let w_row = for_w.prompts.iter().find(|p| p.id == prompt_id).unwrap();
    assert!(v_row.is_saved);
    assert!(!w_row.is_saved);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_pagination_envelope_boundaries(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    for i in 0..21 {
        seed_prompt(&pool, author, &format!("Prompt {i}")).await;
    }
    let images = image_store();

    let first = PromptService::list(
        &pool,
        &images,
        PromptListOptions {
            page: Some(1),
            page_size: Some(20),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(first.prompts.len(), 20);
    assert_eq!(first.pagination.total, 21);
    assert_eq!(first.pagination.total_pages, 2);

    let second = PromptService::list(
        &pool,
        &images,
        PromptListOptions {
            page: Some(2),
            page_size: Some(20),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(second.prompts.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trending_list_orders_by_rating_count(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let quiet = seed_prompt(&pool, author, "Quiet").await;
    let busy = seed_prompt(&pool, author, "Busy").await;
    let images = image_store();

    for i in 0..2 {
        let rater = seed_user(&pool, &format!("rater{i}")).await;
        RatingService::rate_prompt(&pool, rater, busy, 2)
            .await
            .unwrap();
    }

    let page = PromptService::list(
        &pool,
        &images,
        PromptListOptions {
            sort: SortOrder::Trending,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(page.prompts[0].id, busy);
    assert_eq!(page.prompts[0].num_ratings, 2);
    assert_eq!(page.prompts[0].average_rating, 2.0);
    assert_eq!(page.prompts[1].id, quiet);
    assert_eq!(page.prompts[1].average_rating, 0.0);
}

// ---------------------------------------------------------------------------
// Creation and update
// ---------------------------------------------------------------------------

fn create_input(user_id: i64, title: &str) -> CreatePromptInput {
    CreatePromptInput {
        user_id,
        title: title.to_string(),
        description: "Created by a test".to_string(),
        prompt_text: "Write a haiku".to_string(),
        example_outputs: None,
        suggested_model: "gpt-4".to_string(),
        category_id: None,
        tags: vec!["coding".to_string()],
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_uploads_sets_primary_image(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let images = image_store();

    let uploads = vec![
        UploadedImage {
            file_name: Some("one.png".to_string()),
            bytes: b"one".to_vec(),
        },
        UploadedImage {
            file_name: Some("two.jpg".to_string()),
            bytes: b"two".to_vec(),
        },
    ];

    let view = PromptService::create(&pool, &images, create_input(author, "With images"), uploads)
        .await
        .unwrap();

    assert!(view.image.starts_with("/uploads/images/"));
    assert_eq!(view.image_urls.len(), 2);
    assert_eq!(view.tags, vec!["coding".to_string()]);
    assert!(!view.is_saved);

    // The files are on disk under the prompt's id.
    assert_eq!(images.list_prompt_images(view.id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rolls_back_when_image_persistence_fails(pool: PgPool) {
    let author = seed_user(&pool, "author").await;

    // An uploads path nested under a regular file: creating the directory
    // fails, so the file-write step errors inside the transaction window.
    let blocker = tempfile::NamedTempFile::new().unwrap();
    let images = ImageStore::new(blocker.path().join("uploads"));

    let uploads = vec![UploadedImage {
        file_name: Some("img.png".to_string()),
        bytes: b"bytes".to_vec(),
    }];
    let err = PromptService::create(&pool, &images, create_input(author, "Doomed"), uploads)
        .await
        .unwrap_err();
    match err {
        AppError::InternalError(_) => {}
        other => panic!("expected an internal error, got {other:?}"),
    }

    // The transaction rolled back: no orphaned prompt row exists.
    let total = PromptRepo::count(&pool, &PromptListParams::default())
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_without_required_fields_is_rejected(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let images = image_store();

    let mut input = create_input(author, "  ");
    input.title = "   ".to_string();
    assert_validation(
        PromptService::create(&pool, &images, input, Vec::new())
            .await
            .unwrap_err(),
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_unknown_category_is_not_found(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let images = image_store();

    let mut input = create_input(author, "Categorized");
    input.category_id = Some(9999);
    assert_not_found(
        PromptService::create(&pool, &images, input, Vec::new())
            .await
            .unwrap_err(),
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_the_owner_may_update(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let intruder = seed_user(&pool, "intruder").await;
    let prompt_id = seed_prompt(&pool, author, "Mine").await;
    let images = image_store();

    let input = UpdatePromptInput {
        title: "Stolen".to_string(),
        description: "d".to_string(),
        prompt_text: "p".to_string(),
        example_outputs: None,
        suggested_model: "gpt-4".to_string(),
        category_id: None,
        tags: Vec::new(),
        existing_images: Vec::new(),
    };

    let err = PromptService::update(&pool, &images, prompt_id, intruder, input.clone())
        .await
        .unwrap_err();
    match err {
        AppError::Core(CoreError::Forbidden(_)) => {}
        other => panic!("expected forbidden, got {other:?}"),
    }

    // The owner succeeds.
    let view = PromptService::update(&pool, &images, prompt_id, author, input)
        .await
        .unwrap();
    assert_eq!(view.title, "Stolen");
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn comments_appear_newest_first_on_the_detail_view(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let commenter = seed_user(&pool, "commenter").await;
    let prompt_id = seed_prompt(&pool, author, "Discussed").await;
    let images = image_store();

    CommentService::add(&pool, commenter, prompt_id, "first")
        .await
        .unwrap();
    let second = CommentService::add(&pool, commenter, prompt_id, "second")
        .await
        .unwrap();
    assert_eq!(second.user_name, "commenter");
    assert!(second.user_image.starts_with("https://ui-avatars.com/"));

    let view = PromptService::get_by_id(&pool, &images, prompt_id, None)
        .await
        .unwrap()
        .unwrap();
    let comments = view.comments.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "second");
    assert_eq!(comments[1].text, "first");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_comment_is_rejected(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let commenter = seed_user(&pool, "commenter").await;
    let prompt_id = seed_prompt(&pool, author, "Quiet").await;

    assert_validation(
        CommentService::add(&pool, commenter, prompt_id, "   ")
            .await
            .unwrap_err(),
    );
}

// ---------------------------------------------------------------------------
// Follow graph and feed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn follow_roundtrip_through_the_service(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;

    let after_follow = FollowService::follow(&pool, alice, bob).await.unwrap();
    assert_eq!(after_follow.follower_count, 1);
    assert!(FollowService::is_following(&pool, Some(alice), Some(bob))
        .await
        .unwrap());

    let after_unfollow = FollowService::unfollow(&pool, alice, bob).await.unwrap();
    assert_eq!(after_unfollow.follower_count, 0);
    assert!(!FollowService::is_following(&pool, Some(alice), Some(bob))
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unfollow_without_an_edge_is_not_found(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;

    assert_not_found(FollowService::unfollow(&pool, alice, bob).await.unwrap_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn anonymous_viewer_follows_nobody(pool: PgPool) {
    let bob = seed_user(&pool, "bob").await;
    assert!(!FollowService::is_following(&pool, None, Some(bob))
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn follower_listing_is_enriched_for_the_viewer(pool: PgPool) {
    let celebrity = seed_user(&pool, "celebrity").await;
    let viewer = seed_user(&pool, "viewer").await;
    let known = seed_user(&pool, "known").await;
    let unknown = seed_user(&pool, "unknown").await;

    FollowRepo::insert(&pool, known, celebrity).await.unwrap();
    FollowRepo::insert(&pool, unknown, celebrity).await.unwrap();
    // The viewer follows one of the two followers.
    FollowRepo::insert(&pool, viewer, known).await.unwrap();

    let page = FollowService::list_followers(&pool, celebrity, Some(viewer), None, None)
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 2);

    let known_row = page.followers.iter().find(|f| f.id == known).unwrap();
    let unknown_row = page.followers.iter().find(|f| f.id == unknown).unwrap();
    assert!(known_row.is_following);
    assert!(!unknown_row.is_following);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn following_listing_is_always_following(pool: PgPool) {
    let viewer = seed_user(&pool, "viewer").await;
    let a = seed_user(&pool, "a").await;
    let b = seed_user(&pool, "b").await;
    FollowRepo::insert(&pool, viewer, a).await.unwrap();
    FollowRepo::insert(&pool, viewer, b).await.unwrap();

    let page = FollowService::list_following(&pool, viewer, None, None)
        .await
        .unwrap();
    assert_eq!(page.following.len(), 2);
    assert!(page.following.iter().all(|f| f.is_following));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feed_contains_only_followed_authors(pool: PgPool) {
    let viewer = seed_user(&pool, "viewer").await;
    let followed = seed_user(&pool, "followed").await;
    let stranger = seed_user(&pool, "stranger").await;
    let wanted = seed_prompt(&pool, followed, "From followed").await;
    seed_prompt(&pool, stranger, "From stranger").await;
    let images = image_store();

    FollowRepo::insert(&pool, viewer, followed).await.unwrap();

    let feed = PromptService::feed(&pool, &images, viewer, None, None, None)
        .await
        .unwrap();
    assert!(feed.follows_users);
    assert_eq!(feed.prompts.len(), 1);
    assert_eq!(feed.prompts[0].id, wanted);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feed_falls_back_to_recent_when_following_nobody(pool: PgPool) {
    let viewer = seed_user(&pool, "viewer").await;
    let author = seed_user(&pool, "author").await;
    seed_prompt(&pool, author, "Global prompt").await;
    let images = image_store();

    let feed = PromptService::feed(&pool, &images, viewer, None, None, None)
        .await
        .unwrap();
    assert!(!feed.follows_users);
    assert_eq!(feed.prompts.len(), 1);
}

// ---------------------------------------------------------------------------
// Profiles and catalogs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_carries_counts_and_follow_state(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let fan = seed_user(&pool, "fan").await;
    seed_prompt(&pool, author, "One").await;
    seed_prompt(&pool, author, "Two").await;
    FollowRepo::insert(&pool, fan, author).await.unwrap();

    let profile = UserService::profile(&pool, author, Some(fan)).await.unwrap();
    assert_eq!(profile.counts.prompts, 2);
    assert_eq!(profile.counts.followers, 1);
    assert_eq!(profile.counts.following, 0);
    assert!(profile.is_following);

    assert_not_found(UserService::profile(&pool, 9999, None).await.unwrap_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_catalog_always_has_images(pool: PgPool) {
    let categories = CatalogService::categories(&pool, CategorySort::Name)
        .await
        .unwrap();
    assert!(!categories.is_empty());
    assert!(categories.iter().all(|c| !c.image.is_empty()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn model_catalog_counts_usage_by_slug(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    seed_prompt(&pool, author, "Uses gpt-4").await;

    let models = CatalogService::models(&pool).await.unwrap();
    let gpt4 = models.iter().find(|m| m.value == "gpt-4").unwrap();
    assert_eq!(gpt4.prompt_count, 1);
}
