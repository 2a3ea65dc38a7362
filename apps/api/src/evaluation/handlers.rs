//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{multipart::MultipartError, rejection::PathRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::evaluator::{evaluate, improve};
use crate::evaluation::store::Evaluation;
use crate::extraction::extract_resume_text;
use crate::similarity::Verdict;
use crate::state::AppState;

const MISSING_RESUME: &str = "Please upload a resume file.";
const NO_EVALUATION: &str = "Please run an evaluation first before generating improvements.";
const EVALUATION_DONE: &str = "Evaluation completed! You can now generate an improved resume.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Form fields accepted by `POST /api/v1/evaluations`.
#[derive(Debug, Default)]
struct EvaluationForm {
    upload: Option<ResumeUpload>,
    resume_text: Option<String>,
    job_description: Option<String>,
}

#[derive(Debug)]
struct ResumeUpload {
    file_name: String,
    bytes: Bytes,
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub evaluation_id: Uuid,
    pub verdict: Verdict,
    pub similarity_score: Option<f64>,
    pub threshold: f64,
    pub report_markdown: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct EvaluationSummary {
    pub evaluation_id: Uuid,
    pub verdict: Verdict,
    pub similarity_score: Option<f64>,
    pub has_job_description: bool,
    pub report_markdown: String,
    pub has_improved_resume: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ImproveResponse {
    pub evaluation_id: Uuid,
    pub improved_resume: String,
    pub download_url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/evaluations
///
/// Multipart form: `resume` file (PDF/DOCX/TXT) or `resume_text`, plus an
/// optional `job_description`. Scores, asks the model, stores the result.
pub async fn handle_create_evaluation(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<EvaluationResponse>, AppError> {
    let form = read_form(multipart, state.config.max_upload_bytes).await?;

    let resume_text = match form.upload {
        Some(upload) => extract_upload(upload).await?,
        None => form
            .resume_text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation(MISSING_RESUME.to_string()))?,
    };
    let job_description = form
        .job_description
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let threshold = state.config.pass_threshold;
    let outcome = evaluate(
        state.llm.as_ref(),
        &resume_text,
        job_description.as_deref(),
        threshold,
    )
    .await?;

    let evaluation = Evaluation {
        id: Uuid::new_v4(),
        resume_text,
        job_description,
        similarity: outcome.similarity,
        verdict: outcome.verdict,
        report_markdown: outcome.report_markdown,
        improved_resume: None,
        created_at: Utc::now(),
    };
    let response = EvaluationResponse {
        evaluation_id: evaluation.id,
        verdict: evaluation.verdict,
        similarity_score: evaluation.similarity.map(|s| s.score),
        threshold,
        report_markdown: evaluation.report_markdown.clone(),
        status: EVALUATION_DONE.to_string(),
    };

    info!(
        "Evaluation {} completed: verdict={:?}",
        evaluation.id, evaluation.verdict
    );
    state.evaluations.insert(evaluation).await;

    Ok(Json(response))
}

/// GET /api/v1/evaluations/:id
pub async fn handle_get_evaluation(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<EvaluationSummary>, AppError> {
    let id = evaluation_id(path)?;
    let evaluation = state
        .evaluations
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Evaluation {id} not found")))?;

    Ok(Json(EvaluationSummary {
        evaluation_id: evaluation.id,
        verdict: evaluation.verdict,
        similarity_score: evaluation.similarity.map(|s| s.score),
        has_job_description: evaluation.job_description.is_some(),
        report_markdown: evaluation.report_markdown,
        has_improved_resume: evaluation.improved_resume.is_some(),
        created_at: evaluation.created_at,
    }))
}

/// POST /api/v1/evaluations/:id/improve
///
/// Rewrites the resume of a previous evaluation. Regenerates on every call.
pub async fn handle_improve(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ImproveResponse>, AppError> {
    let id = evaluation_id(path)?;
    let evaluation = state
        .evaluations
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(NO_EVALUATION.to_string()))?;

    let improved = improve(
        state.llm.as_ref(),
        &evaluation.resume_text,
        evaluation.job_description.as_deref(),
    )
    .await?;

    if !state
        .evaluations
        .set_improved_resume(id, improved.clone())
        .await
    {
        // Evicted while the model was writing.
        return Err(AppError::NotFound(NO_EVALUATION.to_string()));
    }
    info!("Improved resume generated for evaluation {id}");

    Ok(Json(ImproveResponse {
        evaluation_id: id,
        improved_resume: improved,
        download_url: format!("/api/v1/evaluations/{id}/improved-resume"),
    }))
}

/// GET /api/v1/evaluations/:id/improved-resume
///
/// Serves the improved resume as a `.txt` download.
pub async fn handle_download_improved(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = evaluation_id(path)?;
    let improved = state
        .evaluations
        .get(id)
        .await
        .and_then(|e| e.improved_resume)
        .ok_or_else(|| {
            AppError::NotFound(format!("No improved resume has been generated for {id}"))
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"improved_resume_{id}.txt\""),
            ),
        ],
        improved,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_form(
    mut multipart: Multipart,
    upload_limit: usize,
) -> Result<EvaluationForm, AppError> {
    let mut form = EvaluationForm::default();
    let invalid_form = |err: MultipartError| form_error(err, upload_limit);

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(invalid_form)?;
                // Browsers send an empty part when no file was chosen.
                if bytes.is_empty() {
                    continue;
                }
                if file_name.is_empty() {
                    return Err(AppError::Validation(
                        "Resume upload is missing a file name".to_string(),
                    ));
                }
                form.upload = Some(ResumeUpload { file_name, bytes });
            }
            "resume_text" => form.resume_text = Some(field.text().await.map_err(invalid_form)?),
            "job_description" => {
                form.job_description = Some(field.text().await.map_err(invalid_form)?)
            }
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok(form)
}

async fn extract_upload(upload: ResumeUpload) -> Result<String, AppError> {
    debug!(
        "Extracting resume text from '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );
    let ResumeUpload { file_name, bytes } = upload;

    let text = tokio::task::spawn_blocking(move || extract_resume_text(&file_name, &bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Resume extraction task failed: {e}")))??;

    Ok(text)
}

fn form_error(err: MultipartError, upload_limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!(
            "Resume file exceeds the {upload_limit}-byte upload limit"
        ));
    }
    AppError::Validation(format!("Invalid form data: {}", err.body_text()))
}

fn evaluation_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::Validation(format!("Invalid evaluation id: {}", e.body_text())))
}
