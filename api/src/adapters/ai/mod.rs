//! AI service adapters
//!
//! reqwest clients for OpenAI-compatible text and image generation APIs.

pub mod image_client;
pub mod text_client;

pub use image_client::OpenAiImageClient;
pub use text_client::OpenAiTextClient;

use serde::Deserialize;

use crate::error::AiError;

/// Map an API response to the decoded body or an `AiError`
pub(crate) async fn handle_response<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AiError> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| AiError::Deserialization(e.to_string()))
    } else if status.as_u16() == 401 {
        Err(AiError::Unauthorized)
    } else if status.as_u16() == 429 {
        Err(AiError::RateLimited)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(AiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
