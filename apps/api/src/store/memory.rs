use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::word::{TagRef, WordRecord};
use crate::store::WordStore;

/// In-process `WordStore` for tests.
#[derive(Default)]
pub struct MemoryWordStore {
    words: Vec<WordRecord>,
}

impl MemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_word(mut self, id: i64, english: &str, chinese: &str, tag_ids: &[i64]) -> Self {
        let tags: BTreeSet<TagRef> = tag_ids
            .iter()
            .map(|&id| TagRef {
                id,
                tag_name: format!("tag-{id}"),
            })
            .collect();
        self.words.push(WordRecord {
            id,
            english: english.to_string(),
            chinese: chinese.to_string(),
            tags,
        });
        self
    }
}

#[async_trait]
impl WordStore for MemoryWordStore {
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<WordRecord>, AppError> {
        Ok(self
            .words
            .iter()
            .filter(|w| ids.contains(&w.id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<WordRecord>, AppError> {
        Ok(self.words.clone())
    }
}
