//! PostgreSQL Repository Implementations
//!
//! Schema lives in `database/migrations`. Identities come from `BIGSERIAL`
//! sequences; uniqueness and references are enforced by constraints and
//! classified from their SQLSTATE.

use chrono::{DateTime, Utc};
use kernel::id::{AuthorId, PostId, ThemeId};
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::{Author, NewAuthor, Post, PostDraft, Theme, ThemeDraft};
use crate::domain::pagination::Page;
use crate::domain::repository::{
    AuthorRepository, PostFilter, PostRepository, StoreError, StoreResult, ThemeRepository,
};

/// unique_violation
const UNIQUE_VIOLATION: &str = "23505";
/// foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a SQLSTATE to a store outcome, `None` for anything unclassified
fn classify_sqlstate(code: &str) -> Option<StoreError> {
    match code {
        UNIQUE_VIOLATION => Some(StoreError::AlreadyExists),
        FOREIGN_KEY_VIOLATION => Some(StoreError::ForeignKeyViolation),
        _ => None,
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let code = match &err {
            sqlx::Error::RowNotFound => return StoreError::NotFound,
            sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
            _ => None,
        };

        code.as_deref()
            .and_then(classify_sqlstate)
            .unwrap_or_else(|| StoreError::backend(err))
    }
}

/// Zero affected rows means the target did not exist
fn expect_one(rows_affected: u64) -> StoreResult<()> {
    if rows_affected == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

/// BIGINT view of a row count, saturating at `i64::MAX`
fn sql_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgStore {
    async fn create_post(&self, draft: &PostDraft) -> StoreResult<PostId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO hokkus (title, content, owner_id, theme_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.owner_id.get())
        .bind(draft.theme_id.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(PostId::new(id))
    }

    async fn get_post(&self, id: PostId) -> StoreResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, created, owner_id, theme_id
            FROM hokkus
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_post())
    }

    async fn list_posts(&self, filter: PostFilter, page: Page) -> StoreResult<Vec<Post>> {
        let (owner_id, theme_id) = match filter {
            PostFilter::All => (None, None),
            PostFilter::ByAuthor(author_id) => (Some(author_id.get()), None),
            PostFilter::ByTheme(theme_id) => (None, Some(theme_id.get())),
        };
        // LIMIT NULL is LIMIT ALL
        let limit = (page.limit > 0).then(|| sql_count(page.limit));

        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, created, owner_id, theme_id
            FROM hokkus
            WHERE ($1::BIGINT IS NULL OR owner_id = $1)
              AND ($2::BIGINT IS NULL OR theme_id = $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner_id)
        .bind(theme_id)
        .bind(limit)
        .bind(sql_count(page.offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn update_post(&self, id: PostId, draft: &PostDraft) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE hokkus SET
                title = $2,
                content = $3,
                owner_id = $4,
                theme_id = $5
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.owner_id.get())
        .bind(draft.theme_id.get())
        .execute(&self.pool)
        .await?;

        expect_one(result.rows_affected())
    }

    async fn delete_post(&self, id: PostId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM hokkus WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        expect_one(result.rows_affected())
    }
}

// ============================================================================
// Author Repository Implementation
// ============================================================================

impl AuthorRepository for PgStore {
    async fn create_author(&self, author: &NewAuthor) -> StoreResult<AuthorId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&author.email)
        .bind(&author.name)
        .bind(author.password_hash.as_phc_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(AuthorId::new(id))
    }

    async fn get_author(&self, id: AuthorId) -> StoreResult<Author> {
        let row = sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT id, email, name, password_hash, created
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_author())
    }

    async fn get_author_by_email(&self, email: &str) -> StoreResult<Author> {
        let row = sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT id, email, name, password_hash, created
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_author())
    }

    async fn list_authors(&self) -> StoreResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT id, email, name, password_hash, created
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AuthorRow::into_author).collect())
    }

    async fn update_author(&self, id: AuthorId, author: &NewAuthor) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                name = $3,
                password_hash = $4
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .bind(&author.email)
        .bind(&author.name)
        .bind(author.password_hash.as_phc_string())
        .execute(&self.pool)
        .await?;

        expect_one(result.rows_affected())
    }

    async fn delete_author(&self, id: AuthorId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        expect_one(result.rows_affected())
    }
}

// ============================================================================
// Theme Repository Implementation
// ============================================================================

impl ThemeRepository for PgStore {
    async fn create_theme(&self, draft: &ThemeDraft) -> StoreResult<ThemeId> {
        let id = sqlx::query_scalar::<_, i64>("INSERT INTO themes (title) VALUES ($1) RETURNING id")
            .bind(&draft.title)
            .fetch_one(&self.pool)
            .await?;

        Ok(ThemeId::new(id))
    }

    async fn get_theme(&self, id: ThemeId) -> StoreResult<Theme> {
        let row = sqlx::query_as::<_, ThemeRow>("SELECT id, title FROM themes WHERE id = $1")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into_theme())
    }

    async fn list_themes(&self) -> StoreResult<Vec<Theme>> {
        let rows = sqlx::query_as::<_, ThemeRow>("SELECT id, title FROM themes ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ThemeRow::into_theme).collect())
    }

    async fn update_theme(&self, id: ThemeId, draft: &ThemeDraft) -> StoreResult<()> {
        let result = sqlx::query("UPDATE themes SET title = $2 WHERE id = $1")
            .bind(id.get())
            .bind(&draft.title)
            .execute(&self.pool)
            .await?;

        expect_one(result.rows_affected())
    }

    async fn delete_theme(&self, id: ThemeId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM themes WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        expect_one(result.rows_affected())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    created: DateTime<Utc>,
    owner_id: i64,
    theme_id: i64,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: PostId::new(self.id),
            title: self.title,
            content: self.content,
            created: self.created,
            owner_id: AuthorId::new(self.owner_id),
            theme_id: ThemeId::new(self.theme_id),
        }
    }
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
    created: DateTime<Utc>,
}

impl AuthorRow {
    fn into_author(self) -> Author {
        Author {
            id: AuthorId::new(self.id),
            email: self.email,
            name: self.name,
            password_hash: HashedPassword::from_stored(self.password_hash),
            created: self.created,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ThemeRow {
    id: i64,
    title: String,
}

impl ThemeRow {
    fn into_theme(self) -> Theme {
        Theme {
            id: ThemeId::new(self.id),
            title: self.title,
        }
    }
}
