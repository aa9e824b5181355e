//! PostgreSQL adapter for CreditRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::domain::entities::BotId;
use crate::domain::ports::CreditRepository;
use crate::entity::user_credits;
use crate::error::DomainError;

pub struct PostgresCreditRepository {
    db: DatabaseConnection,
}

impl PostgresCreditRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CreditRepository for PostgresCreditRepository {
    async fn user_credits(&self, bot_id: &BotId, user_id: &str) -> Result<f64, DomainError> {
        let result = user_credits::Entity::find_by_id((user_id.to_string(), bot_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        // No ledger row means the user never bought credits
        Ok(result.map(|m| m.amount).unwrap_or(0.0))
    }
}
