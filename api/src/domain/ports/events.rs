//! Domain event publication port

use async_trait::async_trait;

use crate::domain::entities::PageEvent;
use crate::error::DomainError;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish events of a page that has been saved
    async fn publish(&self, events: &[PageEvent]) -> Result<(), DomainError>;
}
