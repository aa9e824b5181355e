//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod bot_repo;
pub mod credit_repo;
pub mod page_repo;
pub mod question_repo;


pub use bot_repo::PostgresBotRepository;
pub use credit_repo::PostgresCreditRepository;
pub use page_repo::PostgresPageRepository;
pub use question_repo::PostgresQuestionRepository;
