//! Fact domain entity
//!
//! A short AI- or user-authored snippet shown on a page, optionally illustrated
//! with an image and linked to the question it answers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::question::QuestionId;
use crate::error::DomainError;

/// Unique identifier for a fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactId(pub Uuid);

impl FactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FactId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for FactId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fact on a page. Mutated only through [`super::Page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub id: FactId,
    pub title: String,
    pub content: String,
    /// Empty until an image has been attached
    pub image_url: String,
    /// `None` when the fact was authored by hand
    pub question_id: Option<QuestionId>,
}

impl Fact {
    pub(super) fn create(
        title: &str,
        content: &str,
        question_id: Option<QuestionId>,
    ) -> Result<Self, DomainError> {
        let fact = Self {
            id: FactId::new(),
            title: title.to_string(),
            content: content.to_string(),
            image_url: String::new(),
            question_id,
        };
        fact.check_policies()?;
        Ok(fact)
    }

    pub(super) fn update(&mut self, title: &str, content: &str) -> Result<(), DomainError> {
        if self.title == title && self.content == content {
            return Ok(());
        }

        let mut updated = self.clone();
        updated.title = title.to_string();
        updated.content = content.to_string();
        updated.check_policies()?;

        *self = updated;
        Ok(())
    }

    pub(super) fn update_image_url(&mut self, image_url: &str) {
        if self.image_url != image_url {
            self.image_url = image_url.to_string();
        }
    }

    fn check_policies(&self) -> Result<(), DomainError> {
        if self.content.trim().is_empty() {
            return Err(DomainError::required("Fact content"));
        }
        if self.title.trim().is_empty() {
            return Err(DomainError::required("Fact title"));
        }
        Ok(())
    }
}
