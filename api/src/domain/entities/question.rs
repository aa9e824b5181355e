//! Question reference entity
//!
//! Questions are curated by administrators and drive fact generation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub Uuid);

impl From<Uuid> for QuestionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub content: String,
    /// Position in the page wizard, ascending
    pub order: i32,
}
