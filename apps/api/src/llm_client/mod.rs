#![allow(dead_code)]

/// LLM Client — the single point of entry for all completion calls in Compass.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// All LLM interactions MUST go through this module.
///
/// The provider speaks the OpenAI-compatible chat-completions protocol
/// (Groq). One physical attempt lives behind the `ChatBackend` trait; the
/// `Dispatcher` owns failure classification and bounded retry.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod decode;
pub mod prompts;

pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// The model used for all LLM calls in Compass.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "llama-3.3-70b-versatile";
const TEMPERATURE: f32 = 0.4;
const MAX_TOKENS: u32 = 2048;

/// A dispatch that exhausted its retries, or could not start at all.
/// `attempts` counts the physical attempts actually made.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("provider credential is not configured")]
    Configuration,

    #[error("provider error after {attempts} attempt(s): {message}")]
    Provider { message: String, attempts: u32 },

    #[error("provider returned no usable content after {attempts} attempt(s)")]
    EmptyResponse { attempts: u32 },

    #[error("transport failure after {attempts} attempt(s): {message}")]
    Transport { message: String, attempts: u32 },
}

impl DispatchError {
    pub fn attempts(&self) -> u32 {
        match self {
            DispatchError::Configuration => 0,
            DispatchError::Provider { attempts, .. }
            | DispatchError::EmptyResponse { attempts }
            | DispatchError::Transport { attempts, .. } => *attempts,
        }
    }
}

/// Retry behavior for a dispatch: how many extra attempts beyond the first,
/// and the fixed delay between attempts. Injected so tests can swap in a
/// zero-delay policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Same retry bound, no delay between attempts.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Duration::ZERO,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (OpenAI-compatible chat completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    model: &'static str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl ChatRequest {
    fn new(prompt: &str) -> Self {
        Self {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::SYSTEM.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

/// Provider response body. Groq reports failures either as a non-2xx status
/// with an `error` object, or as an `error` object inside a 200 body; both
/// land here.
#[derive(Debug, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatReply {
    /// First choice's content, if non-empty.
    fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|text| !text.is_empty())
    }

    /// Human-readable message from the `error` payload, falling back to the
    /// whole payload when it has no `message` field.
    fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| {
            e.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string())
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Backend trait + HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

/// One physical request to the completion provider. Implementations perform
/// a single attempt; classification and retries belong to the `Dispatcher`.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, AttemptError>;
}

/// Failure of a single physical attempt.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// No credential available. Never retried.
    #[error("provider credential is not configured")]
    Configuration,

    /// The provider could not be reached, or returned an unreadable body.
    #[error("{0}")]
    Transport(String),
}

/// Production backend over reqwest.
pub struct HttpBackend {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpBackend {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, AttemptError> {
        // Credential check happens before any socket is touched.
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AttemptError::Configuration)?;

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        // The body is parsed regardless of status: provider errors arrive as
        // JSON with an `error` object and are classified by the dispatcher.
        serde_json::from_str::<ChatReply>(&body).map_err(|_| {
            AttemptError::Transport(format!("status {status}: unexpected response body"))
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM dispatcher used by all services in Compass.
/// Wraps a completion backend with bounded retry and failure classification.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn ChatBackend>,
    policy: RetryPolicy,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn ChatBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Dispatcher over the production HTTP backend.
    pub fn over_http(url: impl Into<String>, api_key: Option<String>, policy: RetryPolicy) -> Self {
        Self::new(Arc::new(HttpBackend::new(url, api_key)), policy)
    }

    /// Sends one prompt to the provider, masking transient failures up to the
    /// retry bound. On success the raw content string is returned untouched,
    /// fences and all; on exhaustion the *last* observed error is surfaced.
    ///
    /// Only true failures are retried: a provider error payload, a body with
    /// no usable content, or a transport fault. Wrong-shaped content is the
    /// decoder's concern, not a retry trigger.
    pub async fn dispatch(&self, prompt: &str) -> Result<String, DispatchError> {
        let request = ChatRequest::new(prompt);
        let total_attempts = self.policy.max_retries + 1;
        let mut last_error: Option<DispatchError> = None;

        for attempt in 1..=total_attempts {
            if attempt > 1 {
                if let Some(err) = &last_error {
                    warn!(
                        "dispatch attempt {}/{} failed ({err}), retrying in {}ms",
                        attempt - 1,
                        total_attempts,
                        self.policy.backoff.as_millis()
                    );
                }
                tokio::time::sleep(self.policy.backoff).await;
            }

            match self.backend.complete(&request).await {
                Ok(reply) => {
                    if let Some(message) = reply.error_message() {
                        last_error = Some(DispatchError::Provider {
                            message,
                            attempts: attempt,
                        });
                        continue;
                    }

                    match reply.content() {
                        Some(content) => {
                            debug!(
                                "dispatch succeeded: {} chars, attempt {attempt}",
                                content.len()
                            );
                            return Ok(content.to_string());
                        }
                        None => {
                            last_error = Some(DispatchError::EmptyResponse { attempts: attempt });
                        }
                    }
                }
                Err(AttemptError::Configuration) => return Err(DispatchError::Configuration),
                Err(AttemptError::Transport(message)) => {
                    last_error = Some(DispatchError::Transport {
                        message,
                        attempts: attempt,
                    });
                }
            }
        }

        Err(last_error.unwrap_or(DispatchError::EmptyResponse {
            attempts: total_attempts,
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Test doubles
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted backends shared by every module that exercises the pipeline.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Backend that replays a fixed script of attempt outcomes.
    pub struct ScriptedBackend {
        script: Mutex<VecDeque<Result<ChatReply, AttemptError>>>,
        calls: AtomicU32,
    }

    impl ScriptedBackend {
        pub fn new(script: Vec<Result<ChatReply, AttemptError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            }
        }

        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn complete(&self, _request: &ChatRequest) -> Result<ChatReply, AttemptError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AttemptError::Transport("script exhausted".to_string())))
        }
    }

    /// A reply carrying the given content string.
    pub fn reply(text: &str) -> ChatReply {
        ChatReply {
            error: None,
            choices: vec![Choice {
                message: ChoiceMessage {
                    content: Some(text.to_string()),
                },
            }],
        }
    }

    /// A reply carrying a provider error payload.
    pub fn provider_error(message: &str) -> ChatReply {
        ChatReply {
            error: Some(serde_json::json!({ "message": message })),
            choices: vec![],
        }
    }

    /// A syntactically valid reply with no usable content.
    pub fn empty_reply() -> ChatReply {
        ChatReply::default()
    }

    /// Dispatcher whose single attempt returns `text`, with no retry delay.
    pub fn dispatcher_replying(text: &str) -> Dispatcher {
        Dispatcher::new(
            Arc::new(ScriptedBackend::new(vec![Ok(reply(text))])),
            RetryPolicy::immediate(1),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
