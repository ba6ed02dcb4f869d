#![allow(dead_code)]

//! Mock interview — company-specific question generation and per-answer
//! feedback.
//!
//! Question generation embeds a random seed in the prompt so repeated calls
//! produce fresh sets. The seed comes from an injectable `SeedSource` so
//! prompt construction is deterministic under test.

use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::coaching::prompts::{FEEDBACK_PROMPT_TEMPLATE, QUESTIONS_PROMPT_TEMPLATE};
use crate::errors::AppError;
use crate::llm_client::{decode, Dispatcher};

const DEFAULT_COMPANY: &str = "a top tech company";
const DEFAULT_ROLE: &str = "software engineering";

/// Entropy for the question-generation prompt.
/// Carried in `AppState` as `Arc<dyn SeedSource>`.
pub trait SeedSource: Send + Sync {
    /// A value in `[0, 1)`, one per generated question set.
    fn next_seed(&self) -> f64;
}

/// Production source backed by the thread RNG.
pub struct ThreadRngSeed;

impl SeedSource for ThreadRngSeed {
    fn next_seed(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Fixed seed, for deterministic prompts in tests.
pub struct FixedSeed(pub f64);

impl SeedSource for FixedSeed {
    fn next_seed(&self) -> f64 {
        self.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Question generation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsRequest {
    pub company: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Generates an interview question set. The decoded value must be a
/// non-empty array; its element shape is passed through untouched.
pub async fn generate_questions(
    dispatcher: &Dispatcher,
    seed: &dyn SeedSource,
    request: &QuestionsRequest,
) -> Result<Value, AppError> {
    let prompt = build_questions_prompt(request, seed.next_seed())?;
    let content = dispatcher.dispatch(&prompt).await?;
    let value = decode::decode_array(&content)?;

    match value.as_array() {
        Some(questions) if !questions.is_empty() => Ok(value),
        _ => Err(AppError::Shape(
            "question generation did not produce a non-empty array".to_string(),
        )),
    }
}

fn build_questions_prompt(request: &QuestionsRequest, seed: f64) -> Result<String, AppError> {
    let company = request.company.as_deref().unwrap_or(DEFAULT_COMPANY);
    let role = request.role.as_deref().unwrap_or(DEFAULT_ROLE);
    let skills_json = serde_json::to_string(&request.skills)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize skills: {e}")))?;

    Ok(QUESTIONS_PROMPT_TEMPLATE
        .replace("{skills_json}", &skills_json)
        .replace("{seed}", &seed.to_string())
        .replace("{company}", company)
        .replace("{role}", role))
}

// ────────────────────────────────────────────────────────────────────────────
// Answer feedback
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub question: String,
    pub answer: String,
    pub company: Option<String>,
    pub question_number: Option<u32>,
    pub total_questions: Option<u32>,
}

/// Scores one interview answer.
///
/// This task degrades instead of failing: when the provider text yields no
/// usable feedback object, the raw (fence-stripped) text becomes the
/// feedback of a neutral-score fallback so the candidate still sees
/// something. Dispatch failures are still surfaced.
pub async fn feedback(
    dispatcher: &Dispatcher,
    request: &FeedbackRequest,
) -> Result<Value, AppError> {
    let prompt = build_feedback_prompt(request);
    let content = dispatcher.dispatch(&prompt).await?;

    match decode::decode_object(&content) {
        Ok(value) if value.get("score").is_some() => Ok(value),
        Ok(_) | Err(_) => {
            warn!("feedback had no usable score; wrapping raw text");
            Ok(json!({
                "score": 5,
                "feedback": decode::strip_fences(&content),
                "strengths": [],
                "improvements": [],
                "tip": ""
            }))
        }
    }
}

fn build_feedback_prompt(request: &FeedbackRequest) -> String {
    let company = request.company.as_deref().unwrap_or(DEFAULT_COMPANY);
    let number = request
        .question_number
        .map_or_else(|| "?".to_string(), |n| n.to_string());
    let total = request
        .total_questions
        .map_or_else(|| "?".to_string(), |n| n.to_string());

    FEEDBACK_PROMPT_TEMPLATE
        .replace("{question_number}", &number)
        .replace("{total_questions}", &total)
        .replace("{company}", company)
        .replace("{question}", &request.question)
        .replace("{answer}", &request.answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::dispatcher_replying;

    fn questions_request() -> QuestionsRequest {
        QuestionsRequest {
            company: Some("Acme".to_string()),
            role: Some("backend engineer".to_string()),
            skills: vec!["rust".to_string()],
        }
    }

    fn feedback_request() -> FeedbackRequest {
        FeedbackRequest {
            question: "How would you shard a counter?".to_string(),
            answer: "Split by key range and aggregate on read.".to_string(),
            company: Some("Acme".to_string()),
            question_number: Some(2),
            total_questions: Some(6),
        }
    }

    #[test]
    fn test_questions_prompt_is_deterministic_with_fixed_seed() {
        let seed = FixedSeed(0.42);
        let first = build_questions_prompt(&questions_request(), seed.next_seed()).unwrap();
        let second = build_questions_prompt(&questions_request(), seed.next_seed()).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("Random Seed: 0.42"));
    }

    #[test]
    fn test_questions_prompt_varies_with_seed() {
        let first = build_questions_prompt(&questions_request(), 0.1).unwrap();
        let second = build_questions_prompt(&questions_request(), 0.2).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_questions_prompt_defaults_for_missing_fields() {
        let prompt = build_questions_prompt(&QuestionsRequest::default(), 0.5).unwrap();
        assert!(prompt.contains("a top tech company"));
        assert!(prompt.contains("software engineering"));
        assert!(prompt.contains("Candidate's skills: []"));
    }

    #[test]
    fn test_thread_rng_seed_is_unit_interval() {
        let source = ThreadRngSeed;
        for _ in 0..100 {
            let seed = source.next_seed();
            assert!((0.0..1.0).contains(&seed));
        }
    }

    #[tokio::test]
    async fn test_generate_questions_accepts_non_empty_array() {
        let dispatcher = dispatcher_replying(
            r#"[{"question": "Why Rust?", "type": "technical", "difficulty": "easy"}]"#,
        );
        let value = generate_questions(&dispatcher, &FixedSeed(0.5), &questions_request())
            .await
            .unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_questions_rejects_empty_array() {
        let dispatcher = dispatcher_replying("[]");
        let err = generate_questions(&dispatcher, &FixedSeed(0.5), &questions_request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Shape(_)));
    }

    #[test]
    fn test_feedback_prompt_uses_placeholders_for_missing_counts() {
        let request = FeedbackRequest {
            question_number: None,
            total_questions: None,
            company: None,
            ..feedback_request()
        };
        let prompt = build_feedback_prompt(&request);
        assert!(prompt.contains("Question ?/?:"));
        assert!(prompt.contains("a top tech company"));
    }

    #[tokio::test]
    async fn test_feedback_recovers_object_from_prose() {
        let dispatcher = dispatcher_replying(
            "Sure! Here's your result: {\"score\": 7, \"feedback\": \"Good\"} Hope that helps!",
        );
        let value = feedback(&dispatcher, &feedback_request()).await.unwrap();
        assert_eq!(value, json!({"score": 7, "feedback": "Good"}));
    }

    #[tokio::test]
    async fn test_feedback_falls_back_to_raw_text_on_decode_failure() {
        let dispatcher = dispatcher_replying("Your answer was thoughtful but missed scaling.");
        let value = feedback(&dispatcher, &feedback_request()).await.unwrap();
        assert_eq!(value["score"], 5);
        assert_eq!(
            value["feedback"],
            "Your answer was thoughtful but missed scaling."
        );
        assert_eq!(value["strengths"], json!([]));
    }

    #[tokio::test]
    async fn test_feedback_falls_back_when_object_has_no_score() {
        let dispatcher = dispatcher_replying("{\"feedback\": \"Good\"}");
        let value = feedback(&dispatcher, &feedback_request()).await.unwrap();
        assert_eq!(value["score"], 5);
    }
}
