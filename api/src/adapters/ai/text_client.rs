//! Chat completion client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::handle_response;
use crate::domain::entities::{LlmParameters, Prompt};
use crate::domain::ports::AiTextService;
use crate::error::AiError;

pub struct OpenAiTextClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiTextClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Prompts become user messages in their configured order
fn chat_request<'a>(parameters: &'a LlmParameters, prompts: &'a [Prompt]) -> ChatRequest<'a> {
    let mut ordered: Vec<&Prompt> = prompts.iter().collect();
    ordered.sort_by_key(|p| p.order);

    ChatRequest {
        model: &parameters.model,
        messages: ordered
            .into_iter()
            .map(|p| ChatMessage {
                role: "user",
                content: &p.content,
            })
            .collect(),
        temperature: parameters.temperature,
        max_tokens: parameters.max_tokens,
    }
}

#[async_trait]
impl AiTextService for OpenAiTextClient {
    async fn generate_text(
        &self,
        parameters: &LlmParameters,
        prompts: &[Prompt],
    ) -> Result<String, AiError> {
        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&chat_request(parameters, prompts))
            .send()
            .await?;

        let body: ChatResponse = handle_response(response).await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(AiError::EmptyResponse)
    }
}
