//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Bot, BotId, ContactId, FactId, LlmParameters, Page, PageEvent, PageId, Prompt, Question,
    QuestionId,
};
use crate::domain::ports::{
    AiImageService, AiTextService, BotRepository, CreditRepository, EventPublisher, ImageStore,
    PageRepository, PageSearch, PageSearchResult, QuestionRepository, SortOrder,
};
use crate::error::{AiError, DomainError, ImageStoreError};

// ============================================================================
// In-Memory Page Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryPageRepository {
    pages: Arc<RwLock<HashMap<PageId, Page>>>,
    /// Pages whose stored version is bumped right after the next load,
    /// simulating a concurrent writer
    bump_on_load: Arc<RwLock<HashSet<PageId>>>,
}

impl InMemoryPageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a page for testing
    pub fn with_page(self, mut page: Page) -> Self {
        page.take_events();
        self.pages.write().unwrap().insert(page.id(), page);
        self
    }

    /// Current stored state of a page
    pub fn get(&self, id: &PageId) -> Option<Page> {
        self.pages.read().unwrap().get(id).cloned()
    }

    pub fn get_by_route(&self, route: &str) -> Option<Page> {
        self.pages
            .read()
            .unwrap()
            .values()
            .find(|p| p.route() == route)
            .cloned()
    }

    pub fn bump_version_on_next_load(&self, id: &PageId) {
        self.bump_on_load.write().unwrap().insert(*id);
    }

    fn load(&self, predicate: impl Fn(&Page) -> bool) -> Option<Page> {
        let found = self
            .pages
            .read()
            .unwrap()
            .values()
            .find(|p| predicate(p))
            .cloned()?;

        if self.bump_on_load.write().unwrap().remove(&found.id()) {
            let mut record = found.to_record();
            record.version += 1;
            self.pages
                .write()
                .unwrap()
                .insert(found.id(), Page::from(record));
        }

        Some(found)
    }
}

#[async_trait]
impl PageRepository for InMemoryPageRepository {
    async fn find_by_id(&self, id: &PageId) -> Result<Option<Page>, DomainError> {
        Ok(self.load(|p| p.id() == *id))
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Page>, DomainError> {
        Ok(self.load(|p| p.user_id() == user_id))
    }

    async fn find_by_route(&self, route: &str) -> Result<Option<Page>, DomainError> {
        Ok(self.load(|p| p.route() == route))
    }

    async fn find_by_fact_id(&self, fact_id: &FactId) -> Result<Option<Page>, DomainError> {
        Ok(self.load(|p| p.find_fact(fact_id).is_some()))
    }

    async fn find_by_contact_id(
        &self,
        contact_id: &ContactId,
    ) -> Result<Option<Page>, DomainError> {
        Ok(self.load(|p| p.find_contact(contact_id).is_some()))
    }

    async fn is_route_in_use(
        &self,
        route: &str,
        excluding: Option<&PageId>,
    ) -> Result<bool, DomainError> {
        let pages = self.pages.read().unwrap();
        Ok(pages
            .values()
            .any(|p| p.route() == route && Some(&p.id()) != excluding))
    }

    async fn create(&self, page: &Page) -> Result<(), DomainError> {
        let mut pages = self.pages.write().unwrap();
        if pages.contains_key(&page.id()) {
            return Err(DomainError::AlreadyExists(format!("Page {}", page.id())));
        }
        pages.insert(page.id(), Page::from(page.to_record()));
        Ok(())
    }

    async fn concurrency_safe_update(
        &self,
        page: &Page,
        loaded_version: i64,
    ) -> Result<i64, DomainError> {
        let mut pages = self.pages.write().unwrap();
        let stored = pages
            .get(&page.id())
            .ok_or_else(|| DomainError::NotFound(format!("Page {}", page.id())))?;

        if stored.version() != loaded_version {
            return Err(DomainError::Conflict(format!(
                "Page {} was modified concurrently (expected version {}, found {})",
                page.id(),
                loaded_version,
                stored.version()
            )));
        }

        let mut record = page.to_record();
        record.version = loaded_version + 1;
        pages.insert(page.id(), Page::from(record));

        Ok(loaded_version + 1)
    }

    async fn search(&self, search: &PageSearch) -> Result<PageSearchResult, DomainError> {
        let term = search
            .term
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        let mut matches: Vec<Page> = self
            .pages
            .read()
            .unwrap()
            .values()
            .filter(|p| match &term {
                Some(t) => {
                    p.route().to_lowercase().contains(t)
                        || p.display_name().to_lowercase().contains(t)
                }
                None => true,
            })
            .filter(|p| search.from.map_or(true, |from| p.created_at() >= from))
            .filter(|p| search.to.map_or(true, |to| p.created_at() <= to))
            .cloned()
            .collect();

        matches.sort_by_key(|p| p.created_at());
        if search.sort_order == SortOrder::Desc {
            matches.reverse();
        }

        let total_count = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(search.offset() as usize)
            .take(search.records_per_page as usize)
            .collect();

        Ok(PageSearchResult { items, total_count })
    }
}

// ============================================================================
// In-Memory Question / Bot / Credit Repositories
// ============================================================================

#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<Vec<Question>>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_question(self, question: Question) -> Self {
        self.questions.write().unwrap().push(question);
        self
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<Question>, DomainError> {
        let questions = self.questions.read().unwrap();
        Ok(questions.iter().find(|q| q.id == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<Question>, DomainError> {
        Ok(self.questions.read().unwrap().clone())
    }
}

#[derive(Default)]
pub struct InMemoryBotRepository {
    bots: Arc<RwLock<HashMap<String, Bot>>>,
}

impl InMemoryBotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bot(self, bot: Bot) -> Self {
        self.bots
            .write()
            .unwrap()
            .insert(bot.system_name.clone(), bot);
        self
    }
}

#[async_trait]
impl BotRepository for InMemoryBotRepository {
    async fn find_by_system_name(&self, system_name: &str) -> Result<Option<Bot>, DomainError> {
        Ok(self.bots.read().unwrap().get(system_name).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryCreditRepository {
    credits: Arc<RwLock<HashMap<(BotId, String), f64>>>,
}

impl InMemoryCreditRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credits(self, bot_id: &BotId, user_id: &str, amount: f64) -> Self {
        self.credits
            .write()
            .unwrap()
            .insert((*bot_id, user_id.to_string()), amount);
        self
    }
}

#[async_trait]
impl CreditRepository for InMemoryCreditRepository {
    async fn user_credits(&self, bot_id: &BotId, user_id: &str) -> Result<f64, DomainError> {
        let credits = self.credits.read().unwrap();
        Ok(credits
            .get(&(*bot_id, user_id.to_string()))
            .copied()
            .unwrap_or(0.0))
    }
}

// ============================================================================
// Mock AI Services
// ============================================================================

/// Returns queued responses in order, then a fixed default
#[derive(Default)]
pub struct MockAiTextService {
    responses: Arc<RwLock<VecDeque<String>>>,
    calls: Arc<RwLock<Vec<Vec<Prompt>>>>,
}

impl MockAiTextService {
    pub const DEFAULT_RESPONSE: &'static str = "generated text";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: &str) -> Self {
        self.responses
            .write()
            .unwrap()
            .push_back(response.to_string());
        self
    }

    /// Prompts received by each call
    pub fn calls(&self) -> Vec<Vec<Prompt>> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl AiTextService for MockAiTextService {
    async fn generate_text(
        &self,
        _parameters: &LlmParameters,
        prompts: &[Prompt],
    ) -> Result<String, AiError> {
        self.calls.write().unwrap().push(prompts.to_vec());
        Ok(self
            .responses
            .write()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Self::DEFAULT_RESPONSE.to_string()))
    }
}

#[derive(Default)]
pub struct MockAiImageService {
    calls: Arc<RwLock<Vec<(Vec<Prompt>, Option<String>)>>>,
    rate_limited: Arc<RwLock<bool>>,
}

impl MockAiImageService {
    /// base64 of "image"
    pub const IMAGE: &'static str = "aW1hZ2U=";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with_rate_limit(&self) {
        *self.rate_limited.write().unwrap() = true;
    }

    /// Prompts and reference image received by each call
    pub fn calls(&self) -> Vec<(Vec<Prompt>, Option<String>)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl AiImageService for MockAiImageService {
    async fn generate_image(
        &self,
        _parameters: &LlmParameters,
        prompts: &[Prompt],
        reference_image: Option<&str>,
    ) -> Result<String, AiError> {
        self.calls
            .write()
            .unwrap()
            .push((prompts.to_vec(), reference_image.map(str::to_string)));

        if *self.rate_limited.read().unwrap() {
            return Err(AiError::RateLimited);
        }
        Ok(Self::IMAGE.to_string())
    }
}

// ============================================================================
// In-Memory Image Store
// ============================================================================

#[derive(Default)]
pub struct InMemoryImageStore {
    images: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: &str, base64_image: &str) {
        self.images
            .write()
            .unwrap()
            .insert(url.to_string(), base64_image.to_string());
    }

    pub fn get(&self, url: &str) -> Option<String> {
        self.images.read().unwrap().get(url).cloned()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn save_image(
        &self,
        file_name: &str,
        base64_image: &str,
        folders: &[&str],
    ) -> Result<String, ImageStoreError> {
        let url = format!("memory://{}/{}", folders.join("/"), file_name);
        self.insert(&url, base64_image);
        Ok(url)
    }

    async fn load_base64(&self, url: &str) -> Result<String, ImageStoreError> {
        self.get(url)
            .ok_or_else(|| ImageStoreError::InvalidImage(format!("No image at {}", url)))
    }
}

// ============================================================================
// Recording Event Publisher
// ============================================================================

#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Arc<RwLock<Vec<PageEvent>>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PageEvent> {
        self.events.read().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, events: &[PageEvent]) -> Result<(), DomainError> {
        self.events.write().unwrap().extend_from_slice(events);
        Ok(())
    }
}
