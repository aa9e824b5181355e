//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod ai;
pub mod events;
pub mod postgres;
pub mod storage;

pub use ai::{OpenAiImageClient, OpenAiTextClient};
pub use events::TracingEventPublisher;
pub use postgres::{
    PostgresBotRepository, PostgresCreditRepository, PostgresPageRepository,
    PostgresQuestionRepository,
};
pub use storage::LocalImageStore;
