//! Word selection — resolves a request into the ordered list of words to print.
//!
//! Id matches come first, tag matches after, duplicates dropped keeping the first
//! occurrence, then the whole list is shuffled once.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::AppError;
use crate::models::word::WordRecord;
use crate::store::WordStore;
use crate::worksheet::request::WorksheetRequest;

/// Fetches, deduplicates and shuffles the words named by `request`.
///
/// Unknown ids simply do not appear. Both filters empty yields an empty list.
pub async fn assemble_words(
    store: &dyn WordStore,
    request: &WorksheetRequest,
) -> Result<Vec<WordRecord>, AppError> {
    let mut words = Vec::new();

    if !request.word_ids.is_empty() {
        words.extend(store.find_by_ids(&request.word_ids).await?);
    }

    if !request.tag_ids.is_empty() {
        let by_tags = store
            .find_all()
            .await?
            .into_iter()
            .filter(|w| w.has_any_tag(&request.tag_ids));
        words.extend(by_tags);
    }

    let mut words = dedup_first_seen(words);
    shuffle_words(&mut words, &mut rand::thread_rng());
    Ok(words)
}

/// Drops later records whose id has already been seen; relative order is kept.
pub fn dedup_first_seen(words: Vec<WordRecord>) -> Vec<WordRecord> {
    let mut seen = HashSet::with_capacity(words.len());
    words.into_iter().filter(|w| seen.insert(w.id)).collect()
}

/// Uniform Fisher-Yates permutation.
pub fn shuffle_words<R: Rng + ?Sized>(words: &mut [WordRecord], rng: &mut R) {
    words.shuffle(rng);
}
