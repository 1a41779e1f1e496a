//! Message persistence
//!
//! The pipeline talks to storage through the [`MessageStore`] trait;
//! [`PgMessageStore`] is the PostgreSQL implementation. Full-text search uses
//! the generated tsvector column on the messages table with `ts_rank`
//! ordering.

use crate::message::{IngestError, Result};
use async_trait::async_trait;
use navsearch_common::types::{MessageRecord, MessageType};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use tracing::info;

/// Rows per INSERT statement when bulk inserting
const INSERT_CHUNK_SIZE: usize = 500;

/// A ranked full-text search result
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub record: MessageRecord,
    pub rank: f32,
}

/// Abstract document store for message records
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Delete all records matching (type, year); returns rows removed
    async fn remove_where(&self, message_type: MessageType, year: &str) -> Result<u64>;

    /// Insert records in bulk; returns rows inserted
    async fn bulk_insert(&self, records: &[MessageRecord]) -> Result<u64>;

    /// Atomically replace all records for (type, years) with the given set.
    ///
    /// Deletion of the old rows and insertion of the new ones happen in one
    /// transaction, so a failed run never leaves the store emptied.
    async fn replace_years(
        &self,
        message_type: MessageType,
        years: &[String],
        records: &[MessageRecord],
    ) -> Result<u64>;

    /// Exact-match lookup by (type, year, num)
    async fn find_one(
        &self,
        message_type: MessageType,
        year: &str,
        num: &str,
    ) -> Result<Option<MessageRecord>>;

    /// All records of a type, ordered by year then number
    async fn find_all(&self, message_type: MessageType) -> Result<Vec<MessageRecord>>;

    /// Ranked free-text search, one result list per query string
    async fn text_search(&self, queries: &[String]) -> Result<Vec<Vec<SearchHit>>>;
}

/// PostgreSQL-backed message store
#[derive(Debug, Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct MessageRow {
    id: String,
    message_type: String,
    code: String,
    year: String,
    num: String,
    ext: String,
    url: String,
    text: Option<String>,
}

impl MessageRow {
    fn into_record(self) -> Result<MessageRecord> {
        let message_type = self
            .message_type
            .parse::<MessageType>()
            .map_err(|e| IngestError::Parse(e.to_string()))?;
        Ok(MessageRecord {
            id: self.id,
            message_type,
            code: self.code,
            year: self.year,
            num: self.num,
            ext: self.ext,
            url: self.url,
            text: self.text,
        })
    }
}

#[derive(Debug, FromRow)]
struct SearchRow {
    #[sqlx(flatten)]
    row: MessageRow,
    rank: f32,
}

const SELECT_COLUMNS: &str = "id, message_type, code, year, num, ext, url, text";

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_records(
        tx: &mut Transaction<'_, Postgres>,
        records: &[MessageRecord],
    ) -> Result<u64> {
        let mut inserted = 0u64;

        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO messages (id, message_type, code, year, num, ext, url, text) ",
            );

            query_builder.push_values(chunk, |mut b, record| {
                b.push_bind(&record.id)
                    .push_bind(record.message_type.as_str())
                    .push_bind(&record.code)
                    .push_bind(&record.year)
                    .push_bind(&record.num)
                    .push_bind(&record.ext)
                    .push_bind(&record.url)
                    .push_bind(&record.text);
            });

            query_builder.push(
                " ON CONFLICT (id) DO UPDATE SET \
                 text = EXCLUDED.text, url = EXCLUDED.url, ext = EXCLUDED.ext",
            );

            let result = query_builder.build().execute(&mut **tx).await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn remove_where(&self, message_type: MessageType, year: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE message_type = $1 AND year = $2")
            .bind(message_type.as_str())
            .bind(year)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn bulk_insert(&self, records: &[MessageRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let inserted = Self::insert_records(&mut tx, records).await?;
        tx.commit().await?;
        Ok(inserted)
    }

    async fn replace_years(
        &self,
        message_type: MessageType,
        years: &[String],
        records: &[MessageRecord],
    ) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let mut removed = 0u64;
        for year in years {
            let result =
                sqlx::query("DELETE FROM messages WHERE message_type = $1 AND year = $2")
                    .bind(message_type.as_str())
                    .bind(year)
                    .execute(&mut *tx)
                    .await?;
            removed += result.rows_affected();
        }

        let inserted = Self::insert_records(&mut tx, records).await?;

        tx.commit().await?;

        info!(
            message_type = %message_type,
            years = ?years,
            removed,
            inserted,
            "Replaced message set"
        );

        Ok(inserted)
    }

    async fn find_one(
        &self,
        message_type: MessageType,
        year: &str,
        num: &str,
    ) -> Result<Option<MessageRecord>> {
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT {} FROM messages \
             WHERE message_type = $1 AND year = $2 AND num = $3",
            SELECT_COLUMNS
        ))
        .bind(message_type.as_str())
        .bind(year)
        .bind(num)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MessageRow::into_record).transpose()
    }

    async fn find_all(&self, message_type: MessageType) -> Result<Vec<MessageRecord>> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT {} FROM messages WHERE message_type = $1 ORDER BY year, num",
            SELECT_COLUMNS
        ))
        .bind(message_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MessageRow::into_record).collect()
    }

    async fn text_search(&self, queries: &[String]) -> Result<Vec<Vec<SearchHit>>> {
        let mut results = Vec::with_capacity(queries.len());

        for query in queries {
            let rows = sqlx::query_as::<_, SearchRow>(&format!(
                "SELECT {}, ts_rank(search, plainto_tsquery('english', $1)) AS rank \
                 FROM messages \
                 WHERE search @@ plainto_tsquery('english', $1) \
                 ORDER BY rank DESC",
                SELECT_COLUMNS
            ))
            .bind(query)
            .fetch_all(&self.pool)
            .await?;

            let hits = rows
                .into_iter()
                .map(|row| {
                    Ok(SearchHit {
                        rank: row.rank,
                        record: row.row.into_record()?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            results.push(hits);
        }

        Ok(results)
    }
}
