use serde::{Deserialize, Serialize};

/// Body of `POST /v2/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatRequest<'a> {
    /// Single-turn user prompt.
    pub fn user(model: &'a str, prompt: &'a str, temperature: f32) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    pub message: AssistantMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

impl ChatResponse {
    /// Concatenated text blocks of the assistant message.
    pub fn text(&self) -> String {
        self.message
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_single_user_turn() {
        let body = serde_json::to_value(ChatRequest::user("command-r-plus", "hi", 0.0)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "command-r-plus",
                "messages": [{ "role": "user", "content": "hi" }],
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn response_text_skips_non_text_blocks() {
        let raw = json!({
            "id": "c3b0",
            "finish_reason": "COMPLETE",
            "message": {
                "role": "assistant",
                "content": [
                    { "type": "thinking", "thinking": "..." },
                    { "type": "text", "text": "SELECT * " },
                    { "type": "text", "text": "FROM users" }
                ]
            },
            "usage": { "billed_units": { "input_tokens": 12, "output_tokens": 4 } }
        });
        let resp: ChatResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.finish_reason.as_deref(), Some("COMPLETE"));
        assert_eq!(resp.text(), "SELECT * FROM users");
    }
}
