//! Language model client and response generation

use async_trait::async_trait;

use crate::emotion::EmotionLabel;
use crate::prompt::build_prompt;
use crate::{Error, Result};

/// Fixed prefix marking a reply substituted for a failed model call
///
/// The orchestrator speaks and logs such replies like any other; the prefix
/// keeps them distinguishable without inspecting anything else.
pub const RESPONSE_ERROR_PREFIX: &str = "I'm sorry, I'm having trouble forming a response right now";

/// Chat completion request payload (OpenAI-compatible)
#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(serde::Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion response payload
#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// A language model that turns one prompt into one reply
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete a single prompt
    ///
    /// # Errors
    ///
    /// Returns error if the model call fails or yields no text
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// HTTP client for an OpenAI-compatible chat completions endpoint
pub struct LlmClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl LlmClient {
    /// Create a new LLM client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        max_tokens: u32,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("LLM API key required".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
            max_tokens,
        })
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "LLM request failed");
                Error::Llm(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "LLM API error");
            return Err(Error::Llm(format!("LLM API error {status}: {body}")));
        }

        let result: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse LLM response");
            Error::Llm(e.to_string())
        })?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::Llm("model returned no text".to_string()))
    }
}

/// Builds prompts and obtains replies, absorbing model failures
pub struct ResponseGenerator {
    model: Box<dyn ChatModel>,
    name: String,
}

impl ResponseGenerator {
    /// Create a generator speaking as `name`
    pub fn new(model: Box<dyn ChatModel>, name: impl Into<String>) -> Self {
        Self {
            model,
            name: name.into(),
        }
    }

    /// Generate a reply for one turn
    ///
    /// Single attempt, no retry. A failed call yields an error-marked reply
    /// string instead of an error; the caller speaks and logs it normally.
    pub async fn generate(
        &self,
        emotion: EmotionLabel,
        language: &str,
        user_text: &str,
    ) -> String {
        let prompt = build_prompt(&self.name, emotion, language, user_text);

        match self.model.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "response generation failed");
                format!("{RESPONSE_ERROR_PREFIX}. Please give me a moment and try again.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel(Result<String>);

    #[async_trait]
    impl ChatModel for FixedModel {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(Error::Llm("down".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn successful_reply_passes_through() {
        let generator = ResponseGenerator::new(
            Box::new(FixedModel(Ok("You matter.".to_string()))),
            "Solace",
        );
        let reply = generator
            .generate(EmotionLabel::Neutral, "english", "I feel low")
            .await;
        assert_eq!(reply, "You matter.");
    }

    #[tokio::test]
    async fn failure_becomes_marked_reply() {
        let generator =
            ResponseGenerator::new(Box::new(FixedModel(Err(Error::Llm(String::new())))), "Solace");
        let reply = generator
            .generate(EmotionLabel::Neutral, "english", "I feel low")
            .await;
        assert!(reply.starts_with(RESPONSE_ERROR_PREFIX));
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let result = LlmClient::new(
            "https://api.example.com/v1".to_string(),
            String::new(),
            "gpt-4o-mini".to_string(),
            512,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
