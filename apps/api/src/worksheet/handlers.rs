//! Axum route handlers for the Worksheet API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::worksheet::generator::generate_worksheet;
use crate::worksheet::request::GenerateWorksheetRequest;

const PDF_FILENAME: &str = "words.pdf";

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/words/generatePdf
///
/// Returns the printable dictation worksheet as an attachment.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    Json(request): Json<GenerateWorksheetRequest>,
) -> Result<Response, AppError> {
    let worksheet = generate_worksheet(state.words.as_ref(), state.font.clone(), request).await?;

    info!(
        "Serving {PDF_FILENAME}: {} words on {} page(s)",
        worksheet.word_count, worksheet.page_count
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={PDF_FILENAME}"),
            ),
        ],
        worksheet.pdf,
    )
        .into_response())
}
