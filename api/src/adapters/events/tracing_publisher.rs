//! Event publisher that writes domain events to the log
//!
//! No consumers exist inside this service yet, so events are emitted as
//! structured log records that downstream collectors can pick up.

use async_trait::async_trait;

use crate::domain::entities::PageEvent;
use crate::domain::ports::EventPublisher;
use crate::error::DomainError;

#[derive(Default)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, events: &[PageEvent]) -> Result<(), DomainError> {
        for event in events {
            let payload = serde_json::to_string(event)
                .map_err(|e| DomainError::Internal(format!("Event serialization: {}", e)))?;
            tracing::info!(
                target: "heyitisme_api::events",
                event = event.name(),
                page_id = %event.page_id(),
                payload = %payload,
                "Domain event"
            );
        }
        Ok(())
    }
}
