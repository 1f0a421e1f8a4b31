use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tag attached to a word. Only the identity matters to the worksheet generator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagRef {
    pub id: i64,
    pub tag_name: String,
}

/// A vocabulary entry as seen by the worksheet generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: i64,
    pub english: String,
    pub chinese: String,
    pub tags: BTreeSet<TagRef>,
}

impl WordRecord {
    pub fn has_any_tag(&self, tag_ids: &[i64]) -> bool {
        self.tags.iter().any(|t| tag_ids.contains(&t.id))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct WordRow {
    pub id: i64,
    pub english: String,
    pub chinese: String,
}

/// One row of the `word_tag_rel` ⋈ `tags` join.
#[derive(Debug, Clone, FromRow)]
pub struct WordTagRow {
    pub word_id: i64,
    pub tag_id: i64,
    pub tag_name: String,
}
