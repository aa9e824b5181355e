//! Contact domain entity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactId(pub Uuid);

impl ContactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContactId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ContactId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A contact link (email, social handle, URL) shown on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub content: String,
}

impl Contact {
    pub(super) fn create(content: &str) -> Result<Self, DomainError> {
        check_content(content)?;
        Ok(Self {
            id: ContactId::new(),
            content: content.to_string(),
        })
    }

    pub(super) fn update(&mut self, content: &str) -> Result<(), DomainError> {
        check_content(content)?;
        self.content = content.to_string();
        Ok(())
    }
}

fn check_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::required("Contact content"));
    }
    Ok(())
}
