//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use uuid::Uuid;

use crate::domain::entities::bot::FACT_IMAGE_GENERATOR_PROMPT;
use crate::domain::entities::{
    Bot, BotId, CurrentUser, LlmParameters, Page, Prompt, Question, QuestionId,
    FACT_CONTENT_GENERATOR_PROMPT, FACT_IMAGE_GENERATOR_BOT, FACT_TEXT_GENERATOR_BOT,
    FACT_TITLE_GENERATOR_PROMPT,
};

pub fn test_user(user_id: &str) -> CurrentUser {
    CurrentUser {
        user_id: user_id.to_string(),
        is_admin: false,
    }
}

pub fn test_admin() -> CurrentUser {
    CurrentUser {
        user_id: "admin".to_string(),
        is_admin: true,
    }
}

/// Create a fresh page for a user, route derived from the user id
pub fn test_page(user_id: &str) -> Page {
    let route = format!("page_{}", user_id.replace('-', "_"));
    test_page_with_route(user_id, &route)
}

pub fn test_page_with_route(user_id: &str, route: &str) -> Page {
    let mut page = Page::create(route, user_id, false).expect("valid test page");
    page.take_events();
    page
}

/// Question ids are derived from `order` so tests can refer to them again
pub fn test_question(order: i32, content: &str) -> Question {
    Question {
        id: QuestionId(Uuid::from_u128(order as u128)),
        content: content.to_string(),
        order,
    }
}

fn prompt(title: &str, content: &str, order: i32) -> Prompt {
    Prompt {
        id: Uuid::new_v4(),
        title: title.to_string(),
        content: content.to_string(),
        order,
    }
}

pub fn test_text_bot() -> Bot {
    Bot {
        id: BotId(Uuid::new_v4()),
        system_name: FACT_TEXT_GENERATOR_BOT.to_string(),
        llm_parameters: LlmParameters {
            model: "gpt-4o-mini".to_string(),
            temperature: Some(0.7),
            max_tokens: Some(200),
            ..Default::default()
        },
        prompts: vec![
            prompt(
                FACT_CONTENT_GENERATOR_PROMPT,
                "Write a fact. Q: {QUESTIONS} A: {ANSWER} {FACT_CONTENT}",
                0,
            ),
            prompt(
                FACT_TITLE_GENERATOR_PROMPT,
                "Title for: {FACT_CONTENT} ({ANSWER})",
                1,
            ),
        ],
    }
}

pub fn test_image_bot() -> Bot {
    Bot {
        id: BotId(Uuid::new_v4()),
        system_name: FACT_IMAGE_GENERATOR_BOT.to_string(),
        llm_parameters: LlmParameters {
            model: "gpt-image-1".to_string(),
            image_size: Some("1024x1024".to_string()),
            ..Default::default()
        },
        prompts: vec![
            prompt("Style", "Watercolor style, no text.", 1),
            prompt(
                FACT_IMAGE_GENERATOR_PROMPT,
                "Illustrate '{FACT_TITLE}': {FACT_CONTENT}",
                0,
            ),
        ],
    }
}
