use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::ai::cover_letter::generate_cover_letter;
use crate::ai::resume::{analyze_resume, ResumeAnalysis};
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::llm_client::{LlmClient, LlmError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn llm(state: &AppState) -> Result<&LlmClient, LlmError> {
    state.llm.as_ref().ok_or(LlmError::NotConfigured)
}

/// POST /api/ai/analyze-resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeResumeRequest>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    if blank(&request.resume_text) || blank(&request.job_description) {
        return Err(AppError::Validation(
            "Resume text and job description are required".to_string(),
        ));
    }

    let failed = |source| AppError::Ai {
        message: "Failed to analyze resume",
        source,
    };

    let llm = llm(&state).map_err(failed)?;
    let analysis = analyze_resume(llm, &request.resume_text, &request.job_description)
        .await
        .map_err(failed)?;

    Ok(Json(analysis))
}

/// POST /api/ai/generate-cover-letter
///
/// `jobDescription` is optional and sent as empty text when absent.
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    if blank(&request.resume_text) || blank(&request.company) || blank(&request.position) {
        return Err(AppError::Validation(
            "Resume text, company, and position are required".to_string(),
        ));
    }

    let failed = |source| AppError::Ai {
        message: "Failed to generate cover letter",
        source,
    };

    let llm = llm(&state).map_err(failed)?;
    let cover_letter = generate_cover_letter(
        llm,
        &request.resume_text,
        &request.company,
        &request.position,
        &request.job_description,
    )
    .await
    .map_err(failed)?;

    Ok(Json(CoverLetterResponse { cover_letter }))
}
