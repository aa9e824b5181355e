//! Bot reference entity
//!
//! A bot bundles the prompts and model parameters used for one kind of AI
//! generation. Bots are looked up by a fixed system name.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bot generating fact content and titles
pub const FACT_TEXT_GENERATOR_BOT: &str = "Fact_Text_Generator_Bot";
/// Bot generating fact illustrations
pub const FACT_IMAGE_GENERATOR_BOT: &str = "Fact_Image_Generator_Bot";

pub const FACT_CONTENT_GENERATOR_PROMPT: &str = "Fact_Content_Generator_Prompt";
pub const FACT_TITLE_GENERATOR_PROMPT: &str = "Fact_Title_Generator_Prompt";
/// Image prompts are all used; this title is only a convention
#[cfg(test)]
pub const FACT_IMAGE_GENERATOR_PROMPT: &str = "Fact_Image_Generator_Prompt";

/// Unique identifier for a bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotId(pub Uuid);

impl std::fmt::Display for BotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Model parameters passed through to the AI service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmParameters {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// e.g. "1024x1024"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct Bot {
    pub id: BotId,
    pub system_name: String,
    pub llm_parameters: LlmParameters,
    pub prompts: Vec<Prompt>,
}

impl Bot {
    /// First prompt with the given title
    pub fn prompt_titled(&self, title: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.title == title)
    }

    /// Prompts in their configured order
    pub fn ordered_prompts(&self) -> Vec<Prompt> {
        let mut prompts = self.prompts.clone();
        prompts.sort_by_key(|p| p.order);
        prompts
    }
}
