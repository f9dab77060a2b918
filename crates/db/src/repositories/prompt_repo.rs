//! Repository for the `prompts` table.
//!
//! List queries always fetch [`PromptWithMeta`] (prompt joined with author,
//! category, and rating count) so the service layer can enrich rows without
//! per-row lookups.

use sqlx::{PgPool, Postgres, Transaction};

use promptly_core::types::DbId;

use crate::models::prompt::{
    CreatePrompt, Prompt, PromptListParams, PromptWithMeta, SortOrder, UpdatePrompt,
};

/// Column list for `prompts` queries.
const COLUMNS: &str = "\
    id, title, description, prompt_text, example_outputs, suggested_model, \
    image, tags, user_id, category_id, created_at, updated_at";

/// Column list for prompt queries joined with author/category/rating meta.
const META_COLUMNS: &str = "\
    p.id, p.title, p.description, p.prompt_text, p.example_outputs, \
    p.suggested_model, p.image, p.tags, p.user_id, p.category_id, \
    p.created_at, p.updated_at, \
    u.name AS user_name, u.image AS user_image, \
    c.name AS category_name, c.image AS category_image, \
    (SELECT COUNT(*) FROM ratings r WHERE r.prompt_id = p.id) AS rating_count";

/// FROM/JOIN clause shared by all meta queries.
const META_FROM: &str = "\
    FROM prompts p \
    JOIN users u ON u.id = p.user_id \
    LEFT JOIN categories c ON c.id = p.category_id";

/// Provides CRUD and listing operations for prompts.
pub struct PromptRepo;

impl PromptRepo {
    /// Insert a new prompt inside an open transaction.
    ///
    /// Creation runs transactionally so the caller can persist the prompt's
    /// uploaded images and patch the primary image atomically with the row.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreatePrompt,
    ) -> Result<Prompt, sqlx::Error> {
        let query = format!(
            "INSERT INTO prompts \
                (title, description, prompt_text, example_outputs, \
                 suggested_model, user_id, category_id, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.prompt_text)
            .bind(&input.example_outputs)
            .bind(&input.suggested_model)
            .bind(input.user_id)
            .bind(input.category_id)
            .bind(&input.tags)
            .fetch_one(&mut **tx)
            .await
    }

    /// Set a prompt's primary image inside an open transaction.
    pub async fn set_image(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        image: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE prompts SET image = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(image)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Find a bare prompt row by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prompts WHERE id = $1");
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a prompt exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM prompts WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a prompt with its author/category/rating meta.
    pub async fn find_with_meta(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PromptWithMeta>, sqlx::Error> {
        let query = format!("SELECT {META_COLUMNS} {META_FROM} WHERE p.id = $1");
        sqlx::query_as::<_, PromptWithMeta>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List prompts matching the given filters, sorted and paginated.
    pub async fn list(
        pool: &PgPool,
        params: &PromptListParams,
    ) -> Result<Vec<PromptWithMeta>, sqlx::Error> {
        let (where_clause, bind_values, mut bind_idx) = build_prompt_filter(params);

        let order_clause = match params.sort {
            SortOrder::Trending => "ORDER BY rating_count DESC, p.created_at DESC, p.id DESC",
            SortOrder::Recent => "ORDER BY p.created_at DESC, p.id DESC",
        };

        let limit_bind = bind_idx;
        bind_idx += 1;
        let offset_bind = bind_idx;

        let query = format!(
            "SELECT {META_COLUMNS} {META_FROM} {where_clause} {order_clause} \
             LIMIT ${limit_bind} OFFSET ${offset_bind}"
        );

        let q = sqlx::query_as::<_, PromptWithMeta>(&query);
        bind_filter_values(q, &bind_values)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(pool)
            .await
    }

    /// Count prompts matching the given filters, independent of the page
    /// window.
    pub async fn count(pool: &PgPool, params: &PromptListParams) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_prompt_filter(params);
        let query = format!("SELECT COUNT(*) FROM prompts p {where_clause}");

        let q = sqlx::query_scalar::<_, i64>(&query);
        bind_filter_values_scalar(q, &bind_values).fetch_one(pool).await
    }

    /// List prompts authored by any of the given users, newest first.
    ///
    /// Backs the follow feed. An optional category filter narrows the page.
    pub async fn list_by_authors(
        pool: &PgPool,
        author_ids: &[DbId],
        category_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PromptWithMeta>, sqlx::Error> {
        let category_filter = if category_id.is_some() {
            "AND p.category_id = $2"
        } else {
            ""
        };
        let (limit_bind, offset_bind) = if category_id.is_some() {
            ("$3", "$4")
        } else {
            ("$2", "$3")
        };
        let query = format!(
            "SELECT {META_COLUMNS} {META_FROM} \
             WHERE p.user_id = ANY($1) {category_filter} \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT {limit_bind} OFFSET {offset_bind}"
        );

        let mut q = sqlx::query_as::<_, PromptWithMeta>(&query).bind(author_ids);
        if let Some(category_id) = category_id {
            q = q.bind(category_id);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count prompts authored by any of the given users.
    pub async fn count_by_authors(
        pool: &PgPool,
        author_ids: &[DbId],
        category_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let category_filter = if category_id.is_some() {
            "AND category_id = $2"
        } else {
            ""
        };
        let query =
            format!("SELECT COUNT(*) FROM prompts WHERE user_id = ANY($1) {category_filter}");

        let mut q = sqlx::query_scalar::<_, i64>(&query).bind(author_ids);
        if let Some(category_id) = category_id {
            q = q.bind(category_id);
        }
        q.fetch_one(pool).await
    }

    /// List the prompts a user has saved, most recently saved first.
    pub async fn list_saved_by(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PromptWithMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} {META_FROM} \
             JOIN saved_prompts sp ON sp.prompt_id = p.id \
             WHERE sp.user_id = $1 \
             ORDER BY sp.created_at DESC, sp.id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, PromptWithMeta>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Overwrite a prompt's editable fields. Returns `None` if the prompt
    /// does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePrompt,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!(
            "UPDATE prompts SET \
                title = $2, \
                description = $3, \
                prompt_text = $4, \
                example_outputs = $5, \
                suggested_model = $6, \
                category_id = $7, \
                tags = $8, \
                image = $9, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.prompt_text)
            .bind(&input.example_outputs)
            .bind(&input.suggested_model)
            .bind(input.category_id)
            .bind(&input.tags)
            .bind(&input.image)
            .fetch_optional(pool)
            .await
    }

    /// Delete a prompt by ID. Cascade removes its ratings, comments, and
    /// bookmarks. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built prompt list queries.
enum BindValue {
    BigInt(i64),
    Text(String),
}

/// Build a WHERE clause and bind values from the list filter parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty when no filters are active, or starts with `WHERE `. All column
/// references are qualified with the `p.` alias so the clause works in both
/// the joined list query and the bare count query.
fn build_prompt_filter(params: &PromptListParams) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(user_id) = params.user_id {
        conditions.push(format!("p.user_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(user_id));
    }

    if let Some(category_id) = params.category_id {
        conditions.push(format!("p.category_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(category_id));
    }

    if let Some(ref q) = params.q {
        conditions.push(format!(
            "(p.title ILIKE ${bind_idx} OR p.description ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{q}%")));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_filter_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_filter_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}
