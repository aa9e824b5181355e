//! PostgreSQL adapter for BotRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::domain::entities::{Bot, BotId, LlmParameters, Prompt};
use crate::domain::ports::BotRepository;
use crate::entity::bots;
use crate::error::DomainError;

pub struct PostgresBotRepository {
    db: DatabaseConnection,
}

impl PostgresBotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl TryFrom<bots::Model> for Bot {
    type Error = DomainError;

    fn try_from(m: bots::Model) -> Result<Self, Self::Error> {
        let llm_parameters: LlmParameters = serde_json::from_value(m.llm_parameters)
            .map_err(|e| {
                DomainError::Internal(format!("Bad llm_parameters for bot {}: {}", m.system_name, e))
            })?;
        let prompts: Vec<Prompt> = serde_json::from_value(m.prompts).map_err(|e| {
            DomainError::Internal(format!("Bad prompts for bot {}: {}", m.system_name, e))
        })?;

        Ok(Bot {
            id: BotId(m.id),
            system_name: m.system_name,
            llm_parameters,
            prompts,
        })
    }
}

#[async_trait]
impl BotRepository for PostgresBotRepository {
    async fn find_by_system_name(&self, system_name: &str) -> Result<Option<Bot>, DomainError> {
        let result = bots::Entity::find()
            .filter(bots::Column::SystemName.eq(system_name))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Bot::try_from).transpose()
    }
}
