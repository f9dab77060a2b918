//! Integration tests for rating upsert semantics.
//!
//! The (prompt, user) pair is unique: re-rating must overwrite in place and
//! the aggregate read must always reflect the latest write.

use promptly_db::models::prompt::CreatePrompt;
use promptly_db::models::user::CreateUser;
use promptly_db::repositories::{PromptRepo, RatingRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            image: None,
            bio: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_prompt(pool: &PgPool, user_id: i64, title: &str) -> i64 {
    let mut tx = pool.begin().await.unwrap();
    let prompt = PromptRepo::create(
        &mut tx,
        &CreatePrompt {
            title: title.to_string(),
            description: "A test prompt".to_string(),
            prompt_text: "Do the thing".to_string(),
            example_outputs: None,
            suggested_model: "gpt-4".to_string(),
            user_id,
            category_id: None,
            tags: None,
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    prompt.id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rerating_overwrites_in_place(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let rater = new_user(&pool, "rater").await;
    let prompt_id = new_prompt(&pool, author, "Upsert target").await;

    RatingRepo::upsert(&pool, prompt_id, rater, 3).await.unwrap();
    let updated = RatingRepo::upsert(&pool, prompt_id, rater, 5).await.unwrap();

    assert_eq!(updated.rating, 5);

    // Only the most recent value contributes to the aggregate.
    let values = RatingRepo::list_values(&pool, prompt_id).await.unwrap();
    assert_eq!(values, vec![5]);
    assert_eq!(RatingRepo::count(&pool, prompt_id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn each_rater_gets_their_own_row(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let prompt_id = new_prompt(&pool, author, "Multi-rater").await;

    for (i, value) in [5, 4, 3].into_iter().enumerate() {
        let rater = new_user(&pool, &format!("rater{i}")).await;
        RatingRepo::upsert(&pool, prompt_id, rater, value).await.unwrap();
    }

    let mut values = RatingRepo::list_values(&pool, prompt_id).await.unwrap();
    values.sort_unstable();
    assert_eq!(values, vec![3, 4, 5]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_rating_is_rejected_by_check_constraint(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let rater = new_user(&pool, "rater").await;
    let prompt_id = new_prompt(&pool, author, "Check constraint").await;

    // The database enforces the [1,5] range as a backstop behind the
    // service-level validation.
    assert!(RatingRepo::upsert(&pool, prompt_id, rater, 0).await.is_err());
    assert!(RatingRepo::upsert(&pool, prompt_id, rater, 6).await.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn batch_values_group_by_prompt(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let rater = new_user(&pool, "rater").await;
    let first = new_prompt(&pool, author, "First").await;
    let second = new_prompt(&pool, author, "Second").await;

    RatingRepo::upsert(&pool, first, rater, 2).await.unwrap();
    RatingRepo::upsert(&pool, second, rater, 4).await.unwrap();

    let pairs = RatingRepo::values_for_prompts(&pool, &[first, second])
        .await
        .unwrap();
    assert_eq!(pairs.len(), 2);
    assert!(pairs.contains(&(first, 2)));
    assert!(pairs.contains(&(second, 4)));
}
