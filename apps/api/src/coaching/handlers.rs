//! Axum route handlers for the coaching API.
//!
//! Handlers validate input, delegate to the task services, and wrap results
//! in the envelopes the SPA expects (camelCase wire casing).

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::coaching::{analysis, chat, interview, writing};
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::{AnalysisRecord, HistoryFilter};

// ────────────────────────────────────────────────────────────────────────────
// Response envelopes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub result: Value,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResponse {
    pub rewritten_resume: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub result: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryListResponse {
    pub history: Vec<AnalysisRecord>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub company: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
///
/// Skill-gap analysis for a candidate against a target company. A summary of
/// each successful run is recorded in the history store.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<analysis::AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resumeText cannot be empty".to_string()));
    }
    if request.company.trim().is_empty() {
        return Err(AppError::Validation("company cannot be empty".to_string()));
    }

    let result = analysis::analyze(&state.dispatcher, &request).await?;

    // History is best-effort; the analysis already succeeded.
    let record = AnalysisRecord::from_result(&request.company, &result);
    if let Err(err) = state.history.upsert(record).await {
        warn!("failed to record analysis history: {err}");
    }

    info!("analysis completed for target {}", request.company);
    Ok(Json(AnalyzeResponse { result }))
}

/// POST /generate-questions
///
/// Company-specific mock interview question set.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<interview::QuestionsRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let questions =
        interview::generate_questions(&state.dispatcher, state.seed.as_ref(), &request).await?;
    Ok(Json(QuestionsResponse { questions }))
}

/// POST /rewrite-resume
pub async fn handle_rewrite_resume(
    State(state): State<AppState>,
    Json(request): Json<writing::RewriteRequest>,
) -> Result<Json<RewriteResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resumeText is required".to_string()));
    }

    let rewritten_resume = writing::rewrite_resume(&state.dispatcher, &request).await?;
    Ok(Json(RewriteResponse { rewritten_resume }))
}

/// POST /interview
///
/// Feedback on a single mock-interview answer.
pub async fn handle_interview(
    State(state): State<AppState>,
    Json(request): Json<interview::FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    if request.question.trim().is_empty() || request.answer.trim().is_empty() {
        return Err(AppError::Validation(
            "question and answer are required".to_string(),
        ));
    }

    let result = interview::feedback(&state.dispatcher, &request).await?;
    Ok(Json(FeedbackResponse { result }))
}

/// POST /generate-cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<writing::CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    if request.job_title.trim().is_empty() || request.company.trim().is_empty() {
        return Err(AppError::Validation(
            "jobTitle and company are required".to_string(),
        ));
    }

    let cover_letter = writing::cover_letter(&state.dispatcher, &request).await?;
    Ok(Json(CoverLetterResponse { cover_letter }))
}

/// POST /chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<chat::ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let reply = chat::chat_reply(&state.dispatcher, &request).await?;
    Ok(Json(ChatResponse { reply }))
}

/// GET /history?company=...
pub async fn handle_history_list(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryListResponse>, AppError> {
    let history = state
        .history
        .list(HistoryFilter {
            company: query.company,
        })
        .await?;
    Ok(Json(HistoryListResponse { history }))
}

/// GET /history/:id
pub async fn handle_history_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisRecord>, AppError> {
    state
        .history
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))
}
