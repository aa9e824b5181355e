//! Contact service

use std::sync::Arc;

use crate::app::common::{ensure_access, save_and_publish};
use crate::domain::entities::{ContactId, CurrentUser, Page, PageId};
use crate::domain::ports::{EventPublisher, PageRepository};
use crate::error::{AppError, DomainError};

/// Service for managing the contacts of a page
pub struct ContactService<PR, EP>
where
    PR: PageRepository,
    EP: EventPublisher,
{
    pages: Arc<PR>,
    publisher: Arc<EP>,
}

impl<PR, EP> ContactService<PR, EP>
where
    PR: PageRepository,
    EP: EventPublisher,
{
    pub fn new(pages: Arc<PR>, publisher: Arc<EP>) -> Self {
        Self { pages, publisher }
    }

    pub async fn add_contact(
        &self,
        user: &CurrentUser,
        page_id: &PageId,
        content: &str,
    ) -> Result<ContactId, AppError> {
        let mut page = self
            .pages
            .find_by_id(page_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Page {}", page_id)))?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        let contact_id = page.add_contact(content)?;

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;
        Ok(contact_id)
    }

    pub async fn update_contact(
        &self,
        user: &CurrentUser,
        contact_id: &ContactId,
        content: &str,
    ) -> Result<ContactId, AppError> {
        let mut page = self.load_page_by_contact(contact_id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        page.update_contact(contact_id, content)?;

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;
        Ok(*contact_id)
    }

    pub async fn remove_contact(
        &self,
        user: &CurrentUser,
        contact_id: &ContactId,
    ) -> Result<ContactId, AppError> {
        let mut page = self.load_page_by_contact(contact_id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        page.remove_contact(contact_id)?;

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;
        Ok(*contact_id)
    }

    async fn load_page_by_contact(&self, contact_id: &ContactId) -> Result<Page, AppError> {
        self.pages
            .find_by_contact_id(contact_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Contact {}", contact_id)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn service(
        page: Page,
    ) -> (
        ContactService<InMemoryPageRepository, RecordingEventPublisher>,
        Arc<InMemoryPageRepository>,
        Arc<RecordingEventPublisher>,
    ) {
        let pages = Arc::new(InMemoryPageRepository::new().with_page(page));
        let publisher = Arc::new(RecordingEventPublisher::new());
        (
            ContactService::new(pages.clone(), publisher.clone()),
            pages,
            publisher,
        )
    }

    #[tokio::test]
    async fn contact_lifecycle() {
        let page = test_page("user-1");
        let page_id = page.id();
        let (service, pages, publisher) = service(page);
        let user = test_user("user-1");

        let id = service
            .add_contact(&user, &page_id, "jane@example.com")
            .await
            .unwrap();
        service
            .update_contact(&user, &id, "https://jane.dev")
            .await
            .unwrap();
        assert_eq!(
            pages.get(&page_id).unwrap().contacts()[0].content,
            "https://jane.dev"
        );

        service.remove_contact(&user, &id).await.unwrap();
        let stored = pages.get(&page_id).unwrap();
        assert!(stored.contacts().is_empty());
        assert_eq!(stored.version(), 3);

        let names: Vec<_> = publisher.events().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["ContactAdded", "ContactUpdated", "ContactRemoved"]);
    }

    #[tokio::test]
    async fn duplicate_contact_is_rejected() {
        let page = test_page("user-1");
        let page_id = page.id();
        let (service, pages, _) = service(page);
        let user = test_user("user-1");

        service
            .add_contact(&user, &page_id, "jane@example.com")
            .await
            .unwrap();
        let result = service
            .add_contact(&user, &page_id, "jane@example.com")
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::AlreadyExists(_)))
        ));
        assert_eq!(pages.get(&page_id).unwrap().contacts().len(), 1);
    }

    #[tokio::test]
    async fn unknown_contact_is_not_found() {
        let (service, _, _) = service(test_page("user-1"));

        let result = service
            .update_contact(&test_user("user-1"), &ContactId::new(), "x")
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn stranger_cannot_remove_contact() {
        let mut page = test_page("user-1");
        let id = page.add_contact("jane@example.com").unwrap();
        page.take_events();
        let (service, _, _) = service(page);

        let result = service.remove_contact(&test_user("user-2"), &id).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
