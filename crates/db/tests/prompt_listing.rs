//! Integration tests for prompt listing: filters, sort orders, pagination,
//! and the joined meta fields.

use promptly_db::models::prompt::{
    CreatePrompt, PromptListParams, SortOrder, UpdatePrompt,
};
use promptly_db::models::user::CreateUser;
use promptly_db::repositories::{
    CategoryRepo, PromptRepo, RatingRepo, SavedPromptRepo, UserRepo,
};
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
    new_prompt_full(pool, user_id, title, "A test prompt", None).await
}

async fn new_prompt_full(
    pool: &PgPool,
    user_id: i64,
    title: &str,
    description: &str,
    category_id: Option<i64>,
) -> i64 {
    let mut tx = pool.begin().await.unwrap();
    let prompt = PromptRepo::create(
        &mut tx,
        &CreatePrompt {
            title: title.to_string(),
            description: description.to_string(),
            prompt_text: "Do the thing".to_string(),
            example_outputs: None,
            suggested_model: "gpt-4".to_string(),
            user_id,
            category_id,
            tags: None,
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    prompt.id
}

fn page(limit: i64, offset: i64) -> PromptListParams {
    PromptListParams {
        limit,
        offset,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn filter_by_author(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    new_prompt(&pool, alice, "Alice's prompt").await;
    new_prompt(&pool, bob, "Bob's prompt").await;

    let params = PromptListParams {
        user_id: Some(alice),
        ..page(20, 0)
    };
    let rows = PromptRepo::list(&pool, &params).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_id, alice);
    assert_eq!(rows[0].user_name, "alice");
    assert_eq!(PromptRepo::count(&pool, &params).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn filter_by_category(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    // The catalog is seeded by migrations; grab two real categories.
    let categories = CategoryRepo::list_with_counts(
        &pool,
        promptly_db::models::category::CategorySort::Name,
    )
    .await
    .unwrap();
    let (first, second) = (categories[0].id, categories[1].id);

    new_prompt_full(&pool, author, "In first", "x", Some(first)).await;
    new_prompt_full(&pool, author, "In second", "x", Some(second)).await;
    new_prompt_full(&pool, author, "Uncategorized", "x", None).await;

    let params = PromptListParams {
        category_id: Some(first),
        ..page(20, 0)
    };
    let rows = PromptRepo::list(&pool, &params).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "In first");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn substring_search_matches_title_or_description_case_insensitively(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    new_prompt_full(&pool, author, "Email Drafting Helper", "writes emails", None).await;
    new_prompt_full(&pool, author, "Code reviewer", "Reviews EMAIL chains too", None).await;
    new_prompt_full(&pool, author, "Unrelated", "nothing here", None).await;

    let params = PromptListParams {
        q: Some("email".to_string()),
        ..page(20, 0)
    };
    let rows = PromptRepo::list(&pool, &params).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(PromptRepo::count(&pool, &params).await.unwrap(), 2);
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn trending_orders_by_rating_count_not_value(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    // "Loved" has one 5-star rating; "Busy" has two low ratings. Trending
    // puts "Busy" first: popularity is the count, not the value.
    let loved = new_prompt(&pool, author, "Loved").await;
    let busy = new_prompt(&pool, author, "Busy").await;

    let fan = new_user(&pool, "fan").await;
    RatingRepo::upsert(&pool, loved, fan, 5).await.unwrap();
    for i in 0..2 {
        let rater = new_user(&pool, &format!("rater{i}")).await;
        RatingRepo::upsert(&pool, busy, rater, 2).await.unwrap();
    }

    let params = PromptListParams {
        sort: SortOrder::Trending,
        ..page(20, 0)
    };
    let rows = PromptRepo::list(&pool, &params).await.unwrap();
    assert_eq!(rows[0].id, busy);
    assert_eq!(rows[0].rating_count, 2);
    assert_eq!(rows[1].id, loved);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recent_orders_by_creation_time(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    new_prompt(&pool, author, "Older").await;
    let newer = new_prompt(&pool, author, "Newer").await;

    let rows = PromptRepo::list(&pool, &page(20, 0)).await.unwrap();
    assert_eq!(rows[0].id, newer);
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn pagination_boundary_with_21_rows(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    for i in 0..21 {
        new_prompt(&pool, author, &format!("Prompt {i}")).await;
    }

    let total = PromptRepo::count(&pool, &page(20, 0)).await.unwrap();
    assert_eq!(total, 21);

    let first_page = PromptRepo::list(&pool, &page(20, 0)).await.unwrap();
    assert_eq!(first_page.len(), 20);

    let second_page = PromptRepo::list(&pool, &page(20, 20)).await.unwrap();
    assert_eq!(second_page.len(), 1);
}

// ---------------------------------------------------------------------------
// Author-set and saved listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_by_authors_restricts_to_the_set(pool: PgPool) {
    let followed = new_user(&pool, "followed").await;
    let stranger = new_user(&pool, "stranger").await;
    let wanted = new_prompt(&pool, followed, "From followed").await;
    new_prompt(&pool, stranger, "From stranger").await;

    let rows = PromptRepo::list_by_authors(&pool, &[followed], None, 20, 0)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, wanted);
    assert_eq!(
        PromptRepo::count_by_authors(&pool, &[followed], None)
            .await
            .unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_saved_by_returns_most_recently_saved_first(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let saver = new_user(&pool, "saver").await;
    let first = new_prompt(&pool, author, "Saved first").await;
    let second = new_prompt(&pool, author, "Saved second").await;

    SavedPromptRepo::save(&pool, saver, first).await.unwrap();
    SavedPromptRepo::save(&pool, saver, second).await.unwrap();

    let rows = PromptRepo::list_saved_by(&pool, saver, 20, 0).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, second);
    assert_eq!(rows[1].id, first);
}

// ---------------------------------------------------------------------------
// Meta fields and mutation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_with_meta_joins_author_and_counts(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let rater = new_user(&pool, "rater").await;
    let prompt_id = new_prompt(&pool, author, "Meta check").await;
    RatingRepo::upsert(&pool, prompt_id, rater, 4).await.unwrap();

    let meta = PromptRepo::find_with_meta(&pool, prompt_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(meta.user_name, "author");
    assert_eq!(meta.rating_count, 1);
    assert!(meta.category_name.is_none());

    assert!(PromptRepo::find_with_meta(&pool, prompt_id + 999)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_overwrites_editable_fields(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let prompt_id = new_prompt(&pool, author, "Before").await;

    let updated = PromptRepo::update(
        &pool,
        prompt_id,
        &UpdatePrompt {
            title: "After".to_string(),
            description: "New description".to_string(),
            prompt_text: "New body".to_string(),
            example_outputs: Some("Example".to_string()),
            suggested_model: "claude-3-opus".to_string(),
            category_id: None,
            tags: Some("[\"edited\"]".to_string()),
            image: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.title, "After");
    assert_eq!(updated.suggested_model, "claude-3-opus");
    assert_eq!(updated.tags.as_deref(), Some("[\"edited\"]"));

    // Deleting removes the row and cascades.
    assert!(PromptRepo::delete(&pool, prompt_id).await.unwrap());
    assert!(PromptRepo::find_by_id(&pool, prompt_id).await.unwrap().is_none());
}
