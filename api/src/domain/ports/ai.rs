//! AI service ports
//!
//! Text and image generation are provided by external services.

use async_trait::async_trait;

use crate::domain::entities::{LlmParameters, Prompt};
use crate::error::AiError;

#[async_trait]
pub trait AiTextService: Send + Sync {
    /// Generate text from the given prompts
    async fn generate_text(
        &self,
        parameters: &LlmParameters,
        prompts: &[Prompt],
    ) -> Result<String, AiError>;
}

#[async_trait]
pub trait AiImageService: Send + Sync {
    /// Generate an image and return it base64 encoded
    ///
    /// `reference_image` is an optional base64 image the result should resemble.
    async fn generate_image(
        &self,
        parameters: &LlmParameters,
        prompts: &[Prompt],
        reference_image: Option<&str>,
    ) -> Result<String, AiError>;
}
