//! Domain event publication adapters

pub mod tracing_publisher;

pub use tracing_publisher::TracingEventPublisher;
