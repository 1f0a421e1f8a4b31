//! Read-only access to stored words.
//!
//! The worksheet generator needs exactly two lookups: fetch by id and list everything
//! (tag filtering happens in memory). Ids that do not exist are silently omitted.

#[cfg(test)]
pub mod memory;

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::word::{TagRef, WordRecord, WordRow, WordTagRow};

#[async_trait]
pub trait WordStore: Send + Sync {
    /// Returns the records for the ids that exist, in storage order.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<WordRecord>, AppError>;

    async fn find_all(&self) -> Result<Vec<WordRecord>, AppError>;
}

/// `WordStore` over the `words` / `tags` / `word_tag_rel` tables.
#[derive(Clone)]
pub struct PgWordStore {
    pool: PgPool,
}

impl PgWordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn attach_tags(&self, rows: Vec<WordRow>) -> Result<Vec<WordRecord>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let tag_rows = sqlx::query_as::<_, WordTagRow>(
            r#"
            SELECT rel.word_id, t.id AS tag_id, t.tag_name
            FROM word_tag_rel rel
            JOIN tags t ON t.id = rel.tag_id
            WHERE rel.word_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_tags(rows, tag_rows))
    }
}

#[async_trait]
impl WordStore for PgWordStore {
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<WordRecord>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, WordRow>(
            "SELECT id, english, chinese FROM words WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        self.attach_tags(rows).await
    }

    async fn find_all(&self) -> Result<Vec<WordRecord>, AppError> {
        let rows =
            sqlx::query_as::<_, WordRow>("SELECT id, english, chinese FROM words ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        self.attach_tags(rows).await
    }
}

/// Folds join rows into per-word tag sets, keeping the word order of `rows`.
fn group_tags(rows: Vec<WordRow>, tag_rows: Vec<WordTagRow>) -> Vec<WordRecord> {
    let mut tags_by_word: HashMap<i64, BTreeSet<TagRef>> = HashMap::new();
    for t in tag_rows {
        tags_by_word.entry(t.word_id).or_default().insert(TagRef {
            id: t.tag_id,
            tag_name: t.tag_name,
        });
    }

    rows.into_iter()
        .map(|r| WordRecord {
            tags: tags_by_word.remove(&r.id).unwrap_or_default(),
            id: r.id,
            english: r.english,
            chinese: r.chinese,
        })
        .collect()
}
