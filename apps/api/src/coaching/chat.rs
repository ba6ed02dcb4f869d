//! Career-coach chat — freeform guidance over a short rolling transcript.

use serde::{Deserialize, Serialize};

use crate::coaching::prompts::CHAT_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::Dispatcher;

/// Only the most recent turns are folded into the prompt; older context is
/// dropped to keep the prompt inside the token budget.
const HISTORY_WINDOW: usize = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Produces the coach's next reply as plain text.
pub async fn chat_reply(dispatcher: &Dispatcher, request: &ChatRequest) -> Result<String, AppError> {
    let prompt = build_prompt(request);
    let content = dispatcher.dispatch(&prompt).await?;
    Ok(content.trim().to_string())
}

fn build_prompt(request: &ChatRequest) -> String {
    let start = request
        .conversation_history
        .len()
        .saturating_sub(HISTORY_WINDOW);

    let mut transcript = String::new();
    for turn in &request.conversation_history[start..] {
        let speaker = if turn.role == "user" { "User" } else { "Coach" };
        transcript.push_str(speaker);
        transcript.push_str(": ");
        transcript.push_str(&turn.content);
        transcript.push('\n');
    }
    if transcript.is_empty() {
        transcript.push_str("(new conversation)");
    }

    CHAT_PROMPT_TEMPLATE
        .replace("{history}", transcript.trim_end())
        .replace("{message}", &request.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::dispatcher_replying;

    fn turn(role: &str, content: &str) -> ChatTurn {
        ChatTurn {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_prompt_folds_in_history_with_speaker_labels() {
        let request = ChatRequest {
            message: "What should I learn next?".to_string(),
            conversation_history: vec![
                turn("user", "How do I prepare for interviews?"),
                turn("ai", "Start with the fundamentals."),
            ],
        };
        let prompt = build_prompt(&request);
        assert!(prompt.contains("User: How do I prepare for interviews?"));
        assert!(prompt.contains("Coach: Start with the fundamentals."));
        assert!(prompt.contains("User: What should I learn next?"));
    }

    #[test]
    fn test_prompt_keeps_only_the_last_ten_turns() {
        let history: Vec<ChatTurn> = (0..15).map(|i| turn("user", &format!("turn {i}"))).collect();
        let request = ChatRequest {
            message: "latest".to_string(),
            conversation_history: history,
        };
        let prompt = build_prompt(&request);
        assert!(!prompt.contains("turn 4\n"));
        assert!(prompt.contains("turn 5"));
        assert!(prompt.contains("turn 14"));
    }

    #[test]
    fn test_prompt_marks_empty_history() {
        let request = ChatRequest {
            message: "hello".to_string(),
            conversation_history: vec![],
        };
        let prompt = build_prompt(&request);
        assert!(prompt.contains("(new conversation)"));
    }

    #[tokio::test]
    async fn test_chat_reply_trims_provider_text() {
        let dispatcher = dispatcher_replying("\n  Focus on system design this month.  \n");
        let request = ChatRequest {
            message: "hi".to_string(),
            conversation_history: vec![],
        };
        let reply = chat_reply(&dispatcher, &request).await.unwrap();
        assert_eq!(reply, "Focus on system design this month.");
    }
}
