//! Image generation client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::handle_response;
use crate::domain::entities::{LlmParameters, Prompt};
use crate::domain::ports::AiImageService;
use crate::error::AiError;

pub struct OpenAiImageClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiImageClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: String,
    n: u32,
    response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<&'a str>,
    /// base64 reference image
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    b64_json: Option<String>,
}

/// All prompts are joined into one, in their configured order
fn image_request<'a>(
    parameters: &'a LlmParameters,
    prompts: &[Prompt],
    reference_image: Option<&'a str>,
) -> ImageRequest<'a> {
    let mut ordered: Vec<&Prompt> = prompts.iter().collect();
    ordered.sort_by_key(|p| p.order);

    ImageRequest {
        model: &parameters.model,
        prompt: ordered
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"),
        n: 1,
        response_format: "b64_json",
        size: parameters.image_size.as_deref(),
        quality: parameters.image_quality.as_deref(),
        image: reference_image.filter(|i| !i.is_empty()),
    }
}

#[async_trait]
impl AiImageService for OpenAiImageClient {
    async fn generate_image(
        &self,
        parameters: &LlmParameters,
        prompts: &[Prompt],
        reference_image: Option<&str>,
    ) -> Result<String, AiError> {
        let response = self
            .http
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&image_request(parameters, prompts, reference_image))
            .send()
            .await?;

        let body: ImageResponse = handle_response(response).await?;
        body.data
            .into_iter()
            .next()
            .and_then(|d| d.b64_json)
            .filter(|b| !b.is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}
