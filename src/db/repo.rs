use crate::db::models::Quote;
use crate::db::patch::{QuoteCreate, QuotePatch};
use crate::db::schema::SQLITE_INIT;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;

/// Pool-backed quote repository. Cloning shares the underlying pool.
///
/// "Not found" is a normal `None` outcome for the by-id operations; callers
/// branch on it rather than matching on an error variant.
#[derive(Clone)]
pub struct QuoteRepo {
    pool: SqlitePool,
}

impl QuoteRepo {
    /// Opens the SQLite pool (creating the file if missing) and applies the
    /// schema DDL.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;

        apply_schema(&pool).await?;

        info!("quote store initialized");
        Ok(Self { pool })
    }

    pub async fn insert(&self, create: QuoteCreate) -> Result<Quote, sqlx::Error> {
        sqlx::query_as::<_, Quote>(
            r#"
        INSERT INTO quotes (text, author)
        VALUES (?, ?)
        RETURNING id, text, author
        "#,
        )
        .bind(create.text)
        .bind(create.author)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Quote>, sqlx::Error> {
        sqlx::query_as::<_, Quote>(
            r#"
        SELECT id, text, author
        FROM quotes
        WHERE id = ?
        "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Applies a partial update and returns the updated row, or `None` when
    /// the id does not exist. Unset patch fields leave the column untouched.
    pub async fn update(&self, id: i64, patch: QuotePatch) -> Result<Option<Quote>, sqlx::Error> {
        sqlx::query_as::<_, Quote>(
            r#"
        UPDATE quotes
        SET
            text = COALESCE(?, text),
            author = COALESCE(?, author)
        WHERE id = ?
        RETURNING id, text, author
        "#,
        )
        .bind(patch.text)
        .bind(patch.author)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes by id, returning the removed row or `None` when absent.
    pub async fn delete(&self, id: i64) -> Result<Option<Quote>, sqlx::Error> {
        sqlx::query_as::<_, Quote>(
            r#"
        DELETE FROM quotes
        WHERE id = ?
        RETURNING id, text, author
        "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Page of quotes in stable `id` order.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Quote>, sqlx::Error> {
        sqlx::query_as::<_, Quote>(
            r#"
        SELECT id, text, author
        FROM quotes
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Full snapshot in stable `id` order; the selector indexes into this, so
    /// the ordering here is what makes the quote of the day restart-stable.
    pub async fn list_all(&self) -> Result<Vec<Quote>, sqlx::Error> {
        sqlx::query_as::<_, Quote>(
            r#"
        SELECT id, text, author
        FROM quotes
        ORDER BY id
        "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes")
            .fetch_one(&self.pool)
            .await
    }

    /// One row chosen uniformly by the store, or `None` when the table is
    /// empty.
    pub async fn random_one(&self) -> Result<Option<Quote>, sqlx::Error> {
        sqlx::query_as::<_, Quote>(
            r#"
        SELECT id, text, author
        FROM quotes
        ORDER BY RANDOM()
        LIMIT 1
        "#,
        )
        .fetch_optional(&self.pool)
        .await
    }
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
