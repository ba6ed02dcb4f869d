//! Résumé rewriting and cover letter drafting — plain-text tasks.
//! No structured decoding: the provider's text IS the deliverable, minus any
//! stray code fences.

use serde::Deserialize;

use crate::coaching::prompts::{COVER_LETTER_PROMPT_TEMPLATE, REWRITE_PROMPT_TEMPLATE};
use crate::errors::AppError;
use crate::llm_client::{decode, Dispatcher};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRequest {
    pub resume_text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub job_title: String,
    pub company: String,
    pub key_points: Option<String>,
    pub resume_text: Option<String>,
}

/// Rewrites a résumé into a more professional, ATS-friendly version.
pub async fn rewrite_resume(
    dispatcher: &Dispatcher,
    request: &RewriteRequest,
) -> Result<String, AppError> {
    let prompt = REWRITE_PROMPT_TEMPLATE.replace("{resume_text}", &request.resume_text);
    let content = dispatcher.dispatch(&prompt).await?;
    Ok(decode::strip_fences(&content))
}

/// Drafts a cover letter for a specific role and company.
pub async fn cover_letter(
    dispatcher: &Dispatcher,
    request: &CoverLetterRequest,
) -> Result<String, AppError> {
    let key_points = request
        .key_points
        .as_deref()
        .filter(|points| !points.trim().is_empty())
        .unwrap_or("(none given)");
    let resume_text = request
        .resume_text
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or("(not provided)");

    let prompt = COVER_LETTER_PROMPT_TEMPLATE
        .replace("{key_points}", key_points)
        .replace("{job_title}", &request.job_title)
        .replace("{company}", &request.company)
        .replace("{resume_text}", resume_text);

    let content = dispatcher.dispatch(&prompt).await?;
    Ok(decode::strip_fences(&content))
}
