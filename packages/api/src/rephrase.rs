//! # Rephrasing client
//!
//! Wraps an OpenAI-compatible chat-completions endpoint that rewrites note
//! text into a short social post. The model is instructed to answer as JSON
//! `{"content": "..."}`; [`RephraseClient::rephrase`] returns the inner
//! string.
//!
//! Any transport, status, or parse failure surfaces as a [`RephraseError`];
//! callers map all of them to one fixed user-facing message. Requests carry a
//! 30-second timeout so a hung upstream cannot hang the caller indefinitely.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const SYSTEM_PROMPT: &str = "You are a social media expert that rephrases content into engaging \
     tweets. Keep the message concise and impactful while maintaining the original meaning. \
     Format your response as JSON with a 'content' field containing the rephrased text.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_TOKENS: u32 = 100;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum RephraseError {
    #[error("rephrase request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rephrase response was malformed")]
    Malformed,
}

/// Client for the external rephrasing service.
#[derive(Clone, Debug)]
pub struct RephraseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct Rephrased {
    content: String,
}

impl RephraseClient {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self, RephraseError> {
        let http = reqwest::ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Rewrite `text` as a short social post.
    pub async fn rephrase(&self, text: &str) -> Result<String, RephraseError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response: ChatResponse = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = &response
            .choices
            .first()
            .ok_or(RephraseError::Malformed)?
            .message
            .content;
        let rephrased: Rephrased =
            serde_json::from_str(content).map_err(|_| RephraseError::Malformed)?;
        Ok(rephrased.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let request = ChatRequest {
            model: "gpt-4o",
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: "launch day!",
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "launch day!");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["max_tokens"], 100);
    }

    #[test]
    fn response_content_is_nested_json() {
        let body = r#"{"choices":[{"message":{"content":"{\"content\":\"Shipped!\"}"}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let rephrased: Rephrased =
            serde_json::from_str(&response.choices[0].message.content).unwrap();
        assert_eq!(rephrased.content, "Shipped!");
    }

    #[test]
    fn non_json_content_is_malformed() {
        let rephrased: Result<Rephrased, _> = serde_json::from_str("just plain text");
        assert!(rephrased.is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = RephraseClient::new("https://api.openai.com/v1/", "key", "gpt-4o").unwrap();
        assert_eq!(client.base_url, "https://api.openai.com/v1");
    }
}
