//! Page handlers
//!
//! Endpoints for creating pages, walking through the wizard and viewing pages.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EntityIdResponse, ImageUploadRequest};
use crate::domain::entities::{Contact, CurrentUser, Fact, Page, PageId, PageState};
use crate::domain::ports::{PageSearch, SortOrder};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    pub route: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRouteRequest {
    pub route: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDisplayNameRequest {
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStateRequest {
    pub state: PageState,
}

/// Query parameters for the admin page search
#[derive(Debug, Deserialize)]
pub struct SearchPagesQuery {
    pub term: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default = "default_page_number")]
    pub page_number: u64,
    #[serde(default = "default_records_per_page")]
    pub records_per_page: u64,
}

fn default_page_number() -> u64 {
    1
}

fn default_records_per_page() -> u64 {
    20
}

impl From<SearchPagesQuery> for PageSearch {
    fn from(q: SearchPagesQuery) -> Self {
        PageSearch {
            term: q.term.filter(|t| !t.trim().is_empty()),
            from: q.from,
            to: q.to,
            sort_order: q.sort_order,
            page_number: q.page_number,
            records_per_page: q.records_per_page,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: Uuid,
    pub content: String,
}

impl From<&Contact> for ContactResponse {
    fn from(c: &Contact) -> Self {
        ContactResponse {
            id: c.id.0,
            content: c.content.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FactResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub question_id: Option<Uuid>,
}

impl From<&Fact> for FactResponse {
    fn from(f: &Fact) -> Self {
        FactResponse {
            id: f.id.0,
            title: f.title.clone(),
            content: f.content.clone(),
            image_url: f.image_url.clone(),
            question_id: f.question_id.map(|q| q.0),
        }
    }
}

/// Full page view for the owner and administrators
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub id: Uuid,
    pub route: String,
    pub display_name: String,
    pub user_id: String,
    pub avatar_image_url: String,
    pub reference_image_url: String,
    pub state: PageState,
    pub contacts: Vec<ContactResponse>,
    pub facts: Vec<FactResponse>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Page> for PageResponse {
    fn from(p: &Page) -> Self {
        PageResponse {
            id: p.id().0,
            route: p.route().to_string(),
            display_name: p.display_name().to_string(),
            user_id: p.user_id().to_string(),
            avatar_image_url: p.avatar_image_url().to_string(),
            reference_image_url: p.reference_image_url().to_string(),
            state: p.state(),
            contacts: p.contacts().iter().map(ContactResponse::from).collect(),
            facts: p.facts().iter().map(FactResponse::from).collect(),
            version: p.version(),
            created_at: p.created_at().to_rfc3339(),
            updated_at: p.updated_at().to_rfc3339(),
        }
    }
}

/// What visitors of a published page see
#[derive(Debug, Serialize)]
pub struct PublicPageResponse {
    pub route: String,
    pub display_name: String,
    pub avatar_image_url: String,
    pub contacts: Vec<ContactResponse>,
    pub facts: Vec<FactResponse>,
}

impl From<&Page> for PublicPageResponse {
    fn from(p: &Page) -> Self {
        PublicPageResponse {
            route: p.route().to_string(),
            display_name: p.display_name().to_string(),
            avatar_image_url: p.avatar_image_url().to_string(),
            contacts: p.contacts().iter().map(ContactResponse::from).collect(),
            facts: p.facts().iter().map(FactResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchPagesResponse {
    pub items: Vec<PageResponse>,
    pub total_count: u64,
}

#[derive(Debug, Serialize)]
pub struct PageExistsResponse {
    pub exists: bool,
}

/// POST /pages
///
/// Create the caller's page.
pub async fn create_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<CreatePageRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state.page_service.create_page(&user, &request.route).await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// GET /pages
///
/// Search all pages (admin only).
pub async fn search_pages(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<SearchPagesQuery>,
) -> Result<Json<SearchPagesResponse>, AppError> {
    let result = state
        .page_service
        .search_pages(&user, &PageSearch::from(query))
        .await?;

    Ok(Json(SearchPagesResponse {
        items: result.items.iter().map(PageResponse::from).collect(),
        total_count: result.total_count,
    }))
}

/// GET /pages/me
pub async fn get_my_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<PageResponse>, AppError> {
    let page = state
        .page_service
        .get_page_by_user_id(&user, &user.user_id)
        .await?;
    Ok(Json(PageResponse::from(&page)))
}

/// GET /pages/me/exists
pub async fn my_page_exists(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<PageExistsResponse>, AppError> {
    let exists = state
        .page_service
        .user_has_any_page(&user, &user.user_id)
        .await?;
    Ok(Json(PageExistsResponse { exists }))
}

/// GET /pages/:id
pub async fn get_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<PageResponse>, AppError> {
    let page = state.page_service.get_page(&user, &PageId(id)).await?;
    Ok(Json(PageResponse::from(&page)))
}

/// PUT /pages/:id/route
pub async fn update_route(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .page_service
        .update_route(&user, &PageId(id), &request.route)
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// PUT /pages/:id/display-name
pub async fn update_display_name(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDisplayNameRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .page_service
        .update_display_name(&user, &PageId(id), &request.display_name)
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// PUT /pages/:id/avatar-image
pub async fn update_avatar_image(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ImageUploadRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .page_service
        .update_avatar_image(&user, &PageId(id), &request.base64_image)
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// PUT /pages/:id/reference-image
pub async fn update_reference_image(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ImageUploadRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .page_service
        .update_reference_image(&user, &PageId(id), &request.base64_image)
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// PUT /pages/:id/state
pub async fn update_state(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStateRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .page_service
        .update_state(&user, &PageId(id), request.state)
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// GET /p/:route
///
/// Public view of a completed page. No auth.
pub async fn get_published_page(
    State(state): State<AppState>,
    Path(route): Path<String>,
) -> Result<Json<PublicPageResponse>, AppError> {
    let page = state.page_service.get_published_page(&route).await?;
    Ok(Json(PublicPageResponse::from(&page)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    use crate::test_utils::test_page_with_route;

    #[test]
    fn search_query_defaults() {
        let uri: Uri = "/pages?term=jane".parse().unwrap();
        let Query(query) = Query::<SearchPagesQuery>::try_from_uri(&uri).unwrap();

        let search = PageSearch::from(query);
        assert_eq!(search.term.as_deref(), Some("jane"));
        assert_eq!(search.sort_order, SortOrder::Desc);
        assert_eq!(search.page_number, 1);
        assert_eq!(search.records_per_page, 20);
    }

    #[test]
    fn search_query_parses_dates_and_order() {
        let uri: Uri = "/pages?from=2024-01-01T00:00:00Z&sort_order=asc&page_number=3&term="
            .parse()
            .unwrap();
        let Query(query) = Query::<SearchPagesQuery>::try_from_uri(&uri).unwrap();

        let search = PageSearch::from(query);
        assert!(search.term.is_none());
        assert_eq!(search.sort_order, SortOrder::Asc);
        assert_eq!(search.page_number, 3);
        assert_eq!(search.from.unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn state_request_uses_snake_case() {
        let request: UpdateStateRequest =
            serde_json::from_str(r#"{"state":"pending_reference_image"}"#).unwrap();
        assert_eq!(request.state, PageState::PendingReferenceImage);

        assert!(serde_json::from_str::<UpdateStateRequest>(r#"{"state":"Done"}"#).is_err());
    }

    #[test]
    fn public_view_hides_owner_details() {
        let mut page = test_page_with_route("user-1", "jane");
        page.update_display_name("Jane").unwrap();
        page.add_contact("jane@example.com").unwrap();

        let json = serde_json::to_value(PublicPageResponse::from(&page)).unwrap();
        assert_eq!(json["route"], "jane");
        assert_eq!(json["contacts"][0]["content"], "jane@example.com");
        assert!(json.get("user_id").is_none());
        assert!(json.get("reference_image_url").is_none());

        let json = serde_json::to_value(PageResponse::from(&page)).unwrap();
        assert_eq!(json["user_id"], "user-1");
        assert_eq!(json["state"], "pending_display_name");
    }
}
