//! PostgreSQL adapter for QuestionRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::domain::entities::{Question, QuestionId};
use crate::domain::ports::QuestionRepository;
use crate::entity::questions;
use crate::error::DomainError;

pub struct PostgresQuestionRepository {
    db: DatabaseConnection,
}

impl PostgresQuestionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<questions::Model> for Question {
    fn from(m: questions::Model) -> Self {
        Question {
            id: QuestionId(m.id),
            content: m.content,
            order: m.display_order,
        }
    }
}

#[async_trait]
impl QuestionRepository for PostgresQuestionRepository {
    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<Question>, DomainError> {
        let result = questions::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self) -> Result<Vec<Question>, DomainError> {
        let results = questions::Entity::find()
            .order_by_asc(questions::Column::DisplayOrder)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}
