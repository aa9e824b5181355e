//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::entities::{
    Bot, BotId, ContactId, FactId, Page, PageId, Question, QuestionId,
};
use crate::error::DomainError;

/// Sort direction for page searches (by creation time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Criteria for searching pages
#[derive(Debug, Clone)]
pub struct PageSearch {
    /// Case-insensitive match on route or display name
    pub term: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub sort_order: SortOrder,
    /// 1-based
    pub page_number: u64,
    pub records_per_page: u64,
}

impl PageSearch {
    /// Rows skipped before this page, `None` if it does not fit a SQL `BIGINT`
    pub fn checked_offset(&self) -> Option<u64> {
        self.page_number
            .saturating_sub(1)
            .checked_mul(self.records_per_page)
            .filter(|offset| *offset <= i64::MAX as u64)
    }

    pub fn offset(&self) -> u64 {
        self.checked_offset().unwrap_or(i64::MAX as u64)
    }
}

#[derive(Debug, Clone)]
pub struct PageSearchResult {
    pub items: Vec<Page>,
    pub total_count: u64,
}

/// Repository for the Page aggregate (page + contacts + facts)
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Find a page by ID
    async fn find_by_id(&self, id: &PageId) -> Result<Option<Page>, DomainError>;

    /// Find the page owned by a user
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Page>, DomainError>;

    /// Find a page by its public route
    async fn find_by_route(&self, route: &str) -> Result<Option<Page>, DomainError>;

    /// Find the page containing a fact
    async fn find_by_fact_id(&self, fact_id: &FactId) -> Result<Option<Page>, DomainError>;

    /// Find the page containing a contact
    async fn find_by_contact_id(
        &self,
        contact_id: &ContactId,
    ) -> Result<Option<Page>, DomainError>;

    /// Whether another page (other than `excluding`) already uses the route
    async fn is_route_in_use(
        &self,
        route: &str,
        excluding: Option<&PageId>,
    ) -> Result<bool, DomainError>;

    /// Insert a newly created page
    async fn create(&self, page: &Page) -> Result<(), DomainError>;

    /// Save a page if it is still at `loaded_version`
    ///
    /// Returns the new version. Fails with `DomainError::Conflict` when the
    /// page was changed by someone else since it was loaded.
    async fn concurrency_safe_update(
        &self,
        page: &Page,
        loaded_version: i64,
    ) -> Result<i64, DomainError>;

    /// Search pages
    async fn search(&self, search: &PageSearch) -> Result<PageSearchResult, DomainError>;
}

/// Repository for Question reference data
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<Question>, DomainError>;

    async fn list(&self) -> Result<Vec<Question>, DomainError>;
}

/// Repository for Bot configurations
#[async_trait]
pub trait BotRepository: Send + Sync {
    async fn find_by_system_name(&self, system_name: &str) -> Result<Option<Bot>, DomainError>;
}

/// Read-only view of the credit ledger
#[async_trait]
pub trait CreditRepository: Send + Sync {
    /// Remaining credits a user holds for a bot
    async fn user_credits(&self, bot_id: &BotId, user_id: &str) -> Result<f64, DomainError>;
}
