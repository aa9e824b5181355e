//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod common;
pub mod contact_service;
pub mod fact_service;
pub mod page_service;
pub mod prompt;
pub mod question_service;

pub use contact_service::ContactService;
pub use fact_service::FactService;
pub use page_service::PageService;
pub use question_service::QuestionService;
