//! Page aggregate
//!
//! A page is a user's public profile. Contacts and facts are child entities and
//! are only changed through the page, which validates every change and records
//! a [`PageEvent`] for it.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Contact, ContactId, Fact, FactId, PageEvent, QuestionId};
use crate::error::DomainError;

/// Unique identifier for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub Uuid);

impl PageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PageId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Step of the page creation wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    PendingDisplayName,
    PendingAvatar,
    PendingReferenceImage,
    PendingContacts,
    PendingQuestions,
    Completed,
}

impl std::fmt::Display for PageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PageState::PendingDisplayName => "pending_display_name",
            PageState::PendingAvatar => "pending_avatar",
            PageState::PendingReferenceImage => "pending_reference_image",
            PageState::PendingContacts => "pending_contacts",
            PageState::PendingQuestions => "pending_questions",
            PageState::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for PageState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending_display_name" => Ok(PageState::PendingDisplayName),
            "pending_avatar" => Ok(PageState::PendingAvatar),
            "pending_reference_image" => Ok(PageState::PendingReferenceImage),
            "pending_contacts" => Ok(PageState::PendingContacts),
            "pending_questions" => Ok(PageState::PendingQuestions),
            "completed" => Ok(PageState::Completed),
            _ => Err(format!("Unknown page state: {}", s)),
        }
    }
}

/// Persisted page data, used by repositories to rebuild the aggregate
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: PageId,
    pub route: String,
    pub display_name: String,
    pub user_id: String,
    pub avatar_image_url: String,
    pub reference_image_url: String,
    pub state: PageState,
    pub contacts: Vec<Contact>,
    pub facts: Vec<Fact>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Page {
    id: PageId,
    route: String,
    display_name: String,
    user_id: String,
    avatar_image_url: String,
    reference_image_url: String,
    state: PageState,
    contacts: Vec<Contact>,
    facts: Vec<Fact>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<PageEvent>,
}

/// Routes are stored in a `VARCHAR(255)` column
pub const MAX_ROUTE_LENGTH: usize = 255;

fn route_pattern() -> &'static Regex {
    static ROUTE: OnceLock<Regex> = OnceLock::new();
    ROUTE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("static route pattern"))
}

/// Check route format. Uniqueness is decided by the caller (`route_in_use`).
fn check_route(route: &str, route_in_use: bool) -> Result<(), DomainError> {
    if route.trim().is_empty() {
        return Err(DomainError::required("Route"));
    }
    if !route_pattern().is_match(route) {
        return Err(DomainError::Validation(
            "Route must contain only letters, digits and underscores".to_string(),
        ));
    }
    if route.len() > MAX_ROUTE_LENGTH {
        return Err(DomainError::Validation(format!(
            "Route must be at most {} characters",
            MAX_ROUTE_LENGTH
        )));
    }
    if route_in_use {
        return Err(DomainError::AlreadyExists(format!(
            "Route '{}' is already in use",
            route
        )));
    }
    Ok(())
}

impl Page {
    /// Create a new page owned by `user_id`
    pub fn create(route: &str, user_id: &str, route_in_use: bool) -> Result<Self, DomainError> {
        check_route(route, route_in_use)?;
        if user_id.trim().is_empty() {
            return Err(DomainError::required("User id"));
        }

        let now = Utc::now();
        let mut page = Self {
            id: PageId::new(),
            route: route.to_string(),
            display_name: String::new(),
            user_id: user_id.to_string(),
            avatar_image_url: String::new(),
            reference_image_url: String::new(),
            state: PageState::PendingDisplayName,
            contacts: Vec::new(),
            facts: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
            events: Vec::new(),
        };

        page.record(PageEvent::PageCreated {
            page_id: page.id,
            route: page.route.clone(),
        });

        Ok(page)
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn avatar_image_url(&self) -> &str {
        &self.avatar_image_url
    }

    pub fn reference_image_url(&self) -> &str {
        &self.reference_image_url
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Version the page was loaded at (optimistic concurrency token)
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_published(&self) -> bool {
        self.state == PageState::Completed
    }

    /// Whether a fact answering `question_id` already exists
    pub fn has_fact_for_question(&self, question_id: &QuestionId) -> bool {
        self.facts
            .iter()
            .any(|f| f.question_id.as_ref() == Some(question_id))
    }

    pub fn find_fact(&self, fact_id: &FactId) -> Option<&Fact> {
        self.facts.iter().find(|f| f.id == *fact_id)
    }

    pub fn find_contact(&self, contact_id: &ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == *contact_id)
    }

    pub fn update_route(&mut self, route: &str, route_in_use: bool) -> Result<(), DomainError> {
        check_route(route, route_in_use)?;
        self.route = route.to_string();

        self.record(PageEvent::PageRouteUpdated {
            page_id: self.id,
            route: self.route.clone(),
        });
        Ok(())
    }

    pub fn update_display_name(&mut self, display_name: &str) -> Result<(), DomainError> {
        if display_name.trim().is_empty() {
            return Err(DomainError::required("Display name"));
        }
        self.display_name = display_name.to_string();

        self.record(PageEvent::PageDisplayNameUpdated {
            page_id: self.id,
            display_name: self.display_name.clone(),
        });
        Ok(())
    }

    pub fn update_avatar_image_url(&mut self, avatar_image_url: &str) {
        if self.avatar_image_url == avatar_image_url {
            return;
        }
        self.avatar_image_url = avatar_image_url.to_string();

        self.record(PageEvent::PageAvatarImageUpdated {
            page_id: self.id,
            avatar_image_url: self.avatar_image_url.clone(),
        });
    }

    pub fn update_reference_image_url(&mut self, reference_image_url: &str) {
        if self.reference_image_url == reference_image_url {
            return;
        }
        self.reference_image_url = reference_image_url.to_string();

        self.record(PageEvent::PageReferenceImageUpdated {
            page_id: self.id,
            reference_image_url: self.reference_image_url.clone(),
        });
    }

    pub fn update_state(&mut self, state: PageState) {
        if self.state == state {
            return;
        }
        self.state = state;

        self.record(PageEvent::PageStateUpdated {
            page_id: self.id,
            state,
        });
    }

    pub fn add_contact(&mut self, content: &str) -> Result<ContactId, DomainError> {
        let contact = Contact::create(content)?;

        if self.contacts.iter().any(|c| c.content == content) {
            return Err(DomainError::AlreadyExists(
                "Contact already exists".to_string(),
            ));
        }

        let contact_id = contact.id;
        self.contacts.push(contact);

        self.record(PageEvent::ContactAdded {
            page_id: self.id,
            contact_id,
            content: content.to_string(),
        });
        Ok(contact_id)
    }

    pub fn update_contact(
        &mut self,
        contact_id: &ContactId,
        content: &str,
    ) -> Result<(), DomainError> {
        let index = self
            .contacts
            .iter()
            .position(|c| c.id == *contact_id)
            .ok_or_else(|| DomainError::NotFound(format!("Contact {}", contact_id)))?;

        if self
            .contacts
            .iter()
            .any(|c| c.id != *contact_id && c.content == content)
        {
            return Err(DomainError::AlreadyExists(
                "Contact already exists".to_string(),
            ));
        }

        self.contacts[index].update(content)?;

        self.record(PageEvent::ContactUpdated {
            page_id: self.id,
            contact_id: *contact_id,
            content: content.to_string(),
        });
        Ok(())
    }

    pub fn remove_contact(&mut self, contact_id: &ContactId) -> Result<(), DomainError> {
        let index = self
            .contacts
            .iter()
            .position(|c| c.id == *contact_id)
            .ok_or_else(|| DomainError::NotFound(format!("Contact {}", contact_id)))?;

        self.contacts.remove(index);

        self.record(PageEvent::ContactRemoved {
            page_id: self.id,
            contact_id: *contact_id,
        });
        Ok(())
    }

    pub fn add_fact(
        &mut self,
        title: &str,
        content: &str,
        question_id: Option<QuestionId>,
    ) -> Result<FactId, DomainError> {
        let fact = Fact::create(title, content, question_id)?;
        let fact_id = fact.id;
        self.facts.push(fact);

        self.record(PageEvent::FactAdded {
            page_id: self.id,
            fact_id,
            title: title.to_string(),
            content: content.to_string(),
        });
        Ok(fact_id)
    }

    pub fn update_fact(
        &mut self,
        fact_id: &FactId,
        title: &str,
        content: &str,
    ) -> Result<(), DomainError> {
        let fact = self.fact_mut(fact_id)?;
        fact.update(title, content)?;

        self.record(PageEvent::FactUpdated {
            page_id: self.id,
            fact_id: *fact_id,
            title: title.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }

    pub fn remove_fact(&mut self, fact_id: &FactId) -> Result<(), DomainError> {
        let index = self
            .facts
            .iter()
            .position(|f| f.id == *fact_id)
            .ok_or_else(|| DomainError::NotFound(format!("Fact {}", fact_id)))?;

        self.facts.remove(index);

        self.record(PageEvent::FactRemoved {
            page_id: self.id,
            fact_id: *fact_id,
        });
        Ok(())
    }

    pub fn update_fact_image_url(
        &mut self,
        fact_id: &FactId,
        image_url: &str,
    ) -> Result<(), DomainError> {
        let fact = self.fact_mut(fact_id)?;
        fact.update_image_url(image_url);

        self.record(PageEvent::FactImageUrlUpdated {
            page_id: self.id,
            fact_id: *fact_id,
            image_url: image_url.to_string(),
        });
        Ok(())
    }

    /// Names of the changes recorded since the page was loaded or created
    pub fn tracked_changes(&self) -> Vec<&'static str> {
        self.events.iter().map(PageEvent::name).collect()
    }

    pub fn has_changes(&self) -> bool {
        !self.events.is_empty()
    }

    /// Snapshot of the persisted state (pending events excluded)
    pub fn to_record(&self) -> PageRecord {
        PageRecord {
            id: self.id,
            route: self.route.clone(),
            display_name: self.display_name.clone(),
            user_id: self.user_id.clone(),
            avatar_image_url: self.avatar_image_url.clone(),
            reference_image_url: self.reference_image_url.clone(),
            state: self.state,
            contacts: self.contacts.clone(),
            facts: self.facts.clone(),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Drain recorded events for publication
    pub fn take_events(&mut self) -> Vec<PageEvent> {
        std::mem::take(&mut self.events)
    }

    fn fact_mut(&mut self, fact_id: &FactId) -> Result<&mut Fact, DomainError> {
        self.facts
            .iter_mut()
            .find(|f| f.id == *fact_id)
            .ok_or_else(|| DomainError::NotFound(format!("Fact {}", fact_id)))
    }

    fn record(&mut self, event: PageEvent) {
        self.updated_at = Utc::now();
        self.events.push(event);
    }
}

impl From<PageRecord> for Page {
    fn from(record: PageRecord) -> Self {
        Self {
            id: record.id,
            route: record.route,
            display_name: record.display_name,
            user_id: record.user_id,
            avatar_image_url: record.avatar_image_url,
            reference_image_url: record.reference_image_url,
            state: record.state,
            contacts: record.contacts,
            facts: record.facts,
            version: record.version,
            created_at: record.created_at,
            updated_at: record.updated_at,
            events: Vec::new(),
        }
    }
}
