//! Contact handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::EntityIdResponse;
use crate::domain::entities::{ContactId, CurrentUser, PageId};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddContactRequest {
    pub page_id: Uuid,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    pub content: String,
}

/// POST /contacts
pub async fn add_contact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<AddContactRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .contact_service
        .add_contact(&user, &PageId(request.page_id), &request.content)
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// PUT /contacts/:id
pub async fn update_contact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateContactRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .contact_service
        .update_contact(&user, &ContactId(id), &request.content)
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// DELETE /contacts/:id
pub async fn remove_contact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .contact_service
        .remove_contact(&user, &ContactId(id))
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}
