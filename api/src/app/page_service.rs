//! Page service
//!
//! Page creation, the wizard steps and page lookups.

use std::sync::Arc;

use crate::app::common::{ensure_access, save_and_publish, versioned_file_name};
use crate::domain::entities::{CurrentUser, Page, PageId, PageState};
use crate::domain::ports::{
    EventPublisher, ImageStore, PageRepository, PageSearch, PageSearchResult,
};
use crate::error::{AppError, DomainError};

/// Upper bound for `records_per_page` in searches
pub const MAX_RECORDS_PER_PAGE: u64 = 100;

/// Service for managing pages
pub struct PageService<PR, IS, EP>
where
    PR: PageRepository,
    IS: ImageStore,
    EP: EventPublisher,
{
    pages: Arc<PR>,
    images: Arc<IS>,
    publisher: Arc<EP>,
}

impl<PR, IS, EP> PageService<PR, IS, EP>
where
    PR: PageRepository,
    IS: ImageStore,
    EP: EventPublisher,
{
    pub fn new(pages: Arc<PR>, images: Arc<IS>, publisher: Arc<EP>) -> Self {
        Self {
            pages,
            images,
            publisher,
        }
    }

    /// Create the caller's page. A user owns at most one page.
    pub async fn create_page(&self, user: &CurrentUser, route: &str) -> Result<PageId, AppError> {
        if self.pages.find_by_user_id(&user.user_id).await?.is_some() {
            return Err(DomainError::AlreadyExists("User already has a page".to_string()).into());
        }

        let route_in_use = self.pages.is_route_in_use(route, None).await?;
        let mut page = Page::create(route, &user.user_id, route_in_use)?;

        self.pages.create(&page).await?;
        self.publisher.publish(&page.take_events()).await?;

        tracing::info!(page_id = %page.id(), route = %route, user_id = %user.user_id, "Page created");
        Ok(page.id())
    }

    pub async fn get_page(&self, user: &CurrentUser, id: &PageId) -> Result<Page, AppError> {
        let page = self.load_page(id).await?;
        ensure_access(user, &page)?;
        Ok(page)
    }

    pub async fn get_page_by_user_id(
        &self,
        user: &CurrentUser,
        user_id: &str,
    ) -> Result<Page, AppError> {
        if !user.can_access(user_id) {
            return Err(AppError::Forbidden);
        }

        self.pages
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No page for user {}", user_id)))
    }

    pub async fn user_has_any_page(
        &self,
        user: &CurrentUser,
        user_id: &str,
    ) -> Result<bool, AppError> {
        if !user.can_access(user_id) {
            return Err(AppError::Forbidden);
        }

        Ok(self.pages.find_by_user_id(user_id).await?.is_some())
    }

    /// Public lookup of a completed page by route
    pub async fn get_published_page(&self, route: &str) -> Result<Page, AppError> {
        self.pages
            .find_by_route(route)
            .await?
            .filter(Page::is_published)
            .ok_or_else(|| AppError::NotFound(format!("Page '{}' not found", route)))
    }

    pub async fn update_route(
        &self,
        user: &CurrentUser,
        id: &PageId,
        route: &str,
    ) -> Result<PageId, AppError> {
        let mut page = self.load_page(id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        let route_in_use = self.pages.is_route_in_use(route, Some(id)).await?;
        page.update_route(route, route_in_use)?;

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;
        Ok(*id)
    }

    pub async fn update_display_name(
        &self,
        user: &CurrentUser,
        id: &PageId,
        display_name: &str,
    ) -> Result<PageId, AppError> {
        let mut page = self.load_page(id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        page.update_display_name(display_name)?;

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;
        Ok(*id)
    }

    pub async fn update_state(
        &self,
        user: &CurrentUser,
        id: &PageId,
        state: PageState,
    ) -> Result<PageId, AppError> {
        let mut page = self.load_page(id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        page.update_state(state);
        if !page.has_changes() {
            return Ok(*id);
        }

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;
        Ok(*id)
    }

    pub async fn update_avatar_image(
        &self,
        user: &CurrentUser,
        id: &PageId,
        base64_image: &str,
    ) -> Result<PageId, AppError> {
        let mut page = self.load_page(id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        let url = self.store_page_image(id, "avatar", base64_image).await?;
        page.update_avatar_image_url(&url);

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;
        Ok(*id)
    }

    /// The reference image is what generated fact illustrations should resemble
    pub async fn update_reference_image(
        &self,
        user: &CurrentUser,
        id: &PageId,
        base64_image: &str,
    ) -> Result<PageId, AppError> {
        let mut page = self.load_page(id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        let url = self.store_page_image(id, "reference", base64_image).await?;
        page.update_reference_image_url(&url);

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;
        Ok(*id)
    }

    /// Search all pages (administrators only)
    pub async fn search_pages(
        &self,
        user: &CurrentUser,
        search: &PageSearch,
    ) -> Result<PageSearchResult, AppError> {
        if !user.is_admin {
            return Err(AppError::Forbidden);
        }
        if search.page_number == 0 {
            return Err(AppError::BadRequest(
                "page_number must be at least 1".to_string(),
            ));
        }
        if search.records_per_page == 0 || search.records_per_page > MAX_RECORDS_PER_PAGE {
            return Err(AppError::BadRequest(format!(
                "records_per_page must be between 1 and {}",
                MAX_RECORDS_PER_PAGE
            )));
        }
        if search.checked_offset().is_none() {
            return Err(AppError::BadRequest(
                "page_number is out of range".to_string(),
            ));
        }
        if let (Some(from), Some(to)) = (search.from, search.to) {
            if from > to {
                return Err(AppError::BadRequest(
                    "from must not be after to".to_string(),
                ));
            }
        }

        Ok(self.pages.search(search).await?)
    }

    async fn load_page(&self, id: &PageId) -> Result<Page, AppError> {
        self.pages
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Page {}", id)).into())
    }

    async fn store_page_image(
        &self,
        id: &PageId,
        stem: &str,
        base64_image: &str,
    ) -> Result<String, AppError> {
        if base64_image.trim().is_empty() {
            return Err(DomainError::required("Image").into());
        }

        let page_id = id.to_string();
        let url = self
            .images
            .save_image(&versioned_file_name(stem), base64_image, &["pages", &page_id])
            .await?;
        Ok(url)
    }
}
