use serde::{Deserialize, Serialize};

/// Request to an OpenAI-compatible chat completions endpoint
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    pub fn new(model: String, messages: Vec<Message>) -> Self {
        ChatRequest {
            model,
            messages,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Message in conversation
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: String) -> Self {
        Message {
            role: MessageRole::User,
            content,
        }
    }
}

/// Message role; only user turns are sent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
}

/// Response from a chat completions endpoint
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Content of the first choice, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Error response from the API
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

/// API error details
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatRequest::new(
            "llama-3.1-8b-instant".to_string(),
            vec![Message::user("Hello".to_string())],
        )
        .with_temperature(0.2);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama-3.1-8b-instant");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Hello");
        assert!((value["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_temperature_omitted_when_unset() {
        let request = ChatRequest::new("m".to_string(), vec![]);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn test_first_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "model": "llama-3.1-8b-instant",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "{\"type\": \"bug\"}"}, "finish_reason": "stop"},
                    {"index": 1, "message": {"role": "assistant", "content": "second"}, "finish_reason": "stop"}
                ],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            }"#,
        )
        .unwrap();

        assert_eq!(response.first_content(), Some("{\"type\": \"bug\"}"));
        assert_eq!(response.usage.unwrap().completion_tokens, 5);
    }

    #[test]
    fn test_error_response_message() {
        let response: ErrorResponse = serde_json::from_str(
            r#"{"error": {"type": "invalid_request_error", "code": "invalid_api_key", "message": "Invalid API Key"}}"#,
        )
        .unwrap();
        assert_eq!(response.error.message, "Invalid API Key");
    }

    #[test]
    fn test_no_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(response.first_content(), None);
    }
}
