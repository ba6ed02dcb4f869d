//! Skill-gap analysis — scores a candidate against a target company and
//! lays out a six-month roadmap.

use serde::Deserialize;
use serde_json::Value;

use crate::coaching::prompts::ANALYSIS_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::{decode, Dispatcher};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_text: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub company: String,
}

/// Runs the analysis task: build prompt → dispatch → decode → shape check.
/// The result is the decoded value as the provider shaped it; only the two
/// fields every consumer depends on are verified here.
pub async fn analyze(dispatcher: &Dispatcher, request: &AnalyzeRequest) -> Result<Value, AppError> {
    let prompt = build_prompt(request)?;
    let content = dispatcher.dispatch(&prompt).await?;
    let value = decode::decode_object(&content)?;
    check_shape(&value).map_err(AppError::Shape)?;
    Ok(value)
}

fn build_prompt(request: &AnalyzeRequest) -> Result<String, AppError> {
    let skills_json = serde_json::to_string(&request.skills)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize skills: {e}")))?;

    Ok(ANALYSIS_PROMPT_TEMPLATE
        .replace("{skills_json}", &skills_json)
        .replace("{company}", &request.company)
        .replace("{resume_text}", &request.resume_text))
}

/// Minimal semantic check: a numeric `readinessScore` and an array `roadmap`.
/// Everything else is passed through as-is.
fn check_shape(value: &Value) -> Result<(), String> {
    if !value.get("readinessScore").is_some_and(Value::is_number) {
        return Err("analysis has no numeric readinessScore".to_string());
    }
    if !value.get("roadmap").is_some_and(Value::is_array) {
        return Err("analysis has no roadmap array".to_string());
    }
    Ok(())
}
