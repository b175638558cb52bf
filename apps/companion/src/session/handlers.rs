//! Axum route handlers for the session API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jd::clean_job_description;
use crate::models::resume::ResumeRecord;
use crate::resume::parser::UploadedFile;
use crate::session::pipeline::{run_session, SessionDeps, SessionInput};
use crate::session::report::SessionReport;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CleanJdRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct CleanJdResponse {
    pub cleaned: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Multipart form with `job_description`, `user_id` and a `resume` file.
/// Runs the whole session and returns every panel plus the notices.
pub async fn handle_create_session(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SessionReport>, AppError> {
    let input = read_session_form(multipart).await?;

    let deps = SessionDeps {
        llm: state.llm.as_ref(),
        chains: &state.chains,
        store: &state.store,
        match_mode: state.config.keyword_match_mode,
    };

    let report = run_session(deps, &input).await?;
    info!(status = ?report.status, user_id = %input.user_id, "Session finished");
    Ok(Json(report))
}

/// GET /api/v1/resumes/:user_id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ResumeRecord>, AppError> {
    let record = state
        .store
        .retrieve(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No resume stored for user {user_id}")))?;
    Ok(Json(record))
}

/// POST /api/v1/jd/clean
pub async fn handle_clean_jd(Json(request): Json<CleanJdRequest>) -> Json<CleanJdResponse> {
    Json(CleanJdResponse {
        cleaned: clean_job_description(&request.job_description),
    })
}

/// Collects the form fields. A file part with no name and no bytes counts as
/// no upload, which is what browsers send when nothing was picked.
async fn read_session_form(mut multipart: Multipart) -> Result<SessionInput, AppError> {
    let mut input = SessionInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "job_description" => {
                input.job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job_description: {e}")))?;
            }
            "user_id" => {
                input.user_id = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid user_id: {e}")))?;
            }
            "resume" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume upload: {e}")))?;
                if !(file_name.is_empty() && bytes.is_empty()) {
                    input.resume = Some(UploadedFile {
                        name: file_name,
                        bytes,
                    });
                }
            }
            _ => {
                // Drain unknown parts so the stream can advance.
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid form field '{name}': {e}")))?;
            }
        }
    }

    Ok(input)
}
