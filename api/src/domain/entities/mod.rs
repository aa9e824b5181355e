//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod bot;
pub mod contact;
pub mod events;
pub mod fact;
pub mod page;
pub mod question;

pub use bot::{
    Bot, BotId, LlmParameters, Prompt, FACT_CONTENT_GENERATOR_PROMPT, FACT_IMAGE_GENERATOR_BOT,
    FACT_TEXT_GENERATOR_BOT, FACT_TITLE_GENERATOR_PROMPT,
};
pub use contact::{Contact, ContactId};
pub use events::PageEvent;
pub use fact::{Fact, FactId};
pub use page::{Page, PageId, PageRecord, PageState};
pub use question::{Question, QuestionId};

/// The authenticated caller of a use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: String,
    pub is_admin: bool,
}

impl CurrentUser {
    /// Owners and administrators may act on a resource
    pub fn can_access(&self, owner_user_id: &str) -> bool {
        self.is_admin || self.user_id == owner_user_id
    }
}
