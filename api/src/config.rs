use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Secret used to verify bearer tokens (HMAC-SHA256)
    pub auth_token_secret: String,
    /// Base URL of the OpenAI-compatible text generation service
    pub ai_text_url: String,
    pub ai_text_api_key: String,
    /// Base URL of the image generation service
    pub ai_image_url: String,
    pub ai_image_api_key: String,
    /// Directory where uploaded and generated images are written
    pub image_storage_dir: String,
    /// Public URL prefix under which `image_storage_dir` is served
    pub image_public_base_url: String,
    pub cors_allow_any: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            var(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            auth_token_secret: required("AUTH_TOKEN_SECRET")?,
            ai_text_url: var("AI_TEXT_URL")
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            ai_text_api_key: var("AI_TEXT_API_KEY").unwrap_or_default(),
            ai_image_url: var("AI_IMAGE_URL")
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            ai_image_api_key: var("AI_IMAGE_API_KEY").unwrap_or_default(),
            image_storage_dir: var("IMAGE_STORAGE_DIR")
                .unwrap_or_else(|| "./data/images".to_string()),
            image_public_base_url: var("IMAGE_PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8080/images".to_string()),
            cors_allow_any: var("CORS_ALLOW_ANY")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        })
    }
}
