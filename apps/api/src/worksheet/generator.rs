//! Worksheet generation pipeline: validate → select → compose → serialize.
//!
//! Composition and PDF serialization are CPU-bound and run on the blocking pool.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::info;

use crate::errors::AppError;
use crate::store::WordStore;
use crate::worksheet::composer::compose_worksheet;
use crate::worksheet::font_resolver::FontHandle;
use crate::worksheet::layout::A4_LAYOUT;
use crate::worksheet::pdf::render_pdf;
use crate::worksheet::request::GenerateWorksheetRequest;
use crate::worksheet::selection::assemble_words;

#[derive(Debug, Clone)]
pub struct GeneratedWorksheet {
    pub pdf: Bytes,
    pub page_count: usize,
    pub word_count: usize,
}

/// Runs the whole pipeline. An invalid mode fails before the store is touched.
pub async fn generate_worksheet(
    store: &dyn WordStore,
    font: Arc<FontHandle>,
    request: GenerateWorksheetRequest,
) -> Result<GeneratedWorksheet, AppError> {
    let request = request.validate()?;

    let words = assemble_words(store, &request).await?;
    info!(
        "Generating {:?} worksheet for {} words (wide glyphs: {})",
        request.mode,
        words.len(),
        font.supports_wide_glyphs()
    );

    let mode = request.mode;
    let (pdf, page_count, word_count) = tokio::task::spawn_blocking(move || {
        let sheet = compose_worksheet(&words, mode, &font, &A4_LAYOUT);
        let pdf = render_pdf(&sheet, &font, &A4_LAYOUT, Utc::now())?;
        Ok::<_, AppError>((pdf, sheet.page_count(), sheet.word_count()))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in worksheet render: {e}")))??;

    info!("Worksheet ready: {page_count} page(s), {} bytes", pdf.len());

    Ok(GeneratedWorksheet {
        pdf: Bytes::from(pdf),
        page_count,
        word_count,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
