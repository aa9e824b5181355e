//! Fact handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{EntityIdResponse, ImageUploadRequest};
use crate::domain::entities::{CurrentUser, FactId, PageId, QuestionId};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddFactRequest {
    pub page_id: Uuid,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFactRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateFactRequest {
    pub page_id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
}

/// POST /facts
pub async fn add_fact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<AddFactRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .fact_service
        .add_fact(
            &user,
            &PageId(request.page_id),
            &request.title,
            &request.content,
        )
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// PUT /facts/:id
pub async fn update_fact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFactRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .fact_service
        .update_fact(&user, &FactId(id), &request.title, &request.content)
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// DELETE /facts/:id
pub async fn remove_fact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state.fact_service.remove_fact(&user, &FactId(id)).await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// PUT /facts/:id/image-url
pub async fn update_fact_image(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ImageUploadRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .fact_service
        .update_fact_image(&user, &FactId(id), &request.base64_image)
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

/// POST /facts/generate
///
/// Generate a fact with the AI services. Rate limited per peer IP.
pub async fn generate_fact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<GenerateFactRequest>,
) -> Result<Json<EntityIdResponse>, AppError> {
    let id = state
        .fact_service
        .generate_fact(
            &user,
            &PageId(request.page_id),
            &QuestionId(request.question_id),
            &request.answer,
        )
        .await?;
    Ok(Json(EntityIdResponse::new(id.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_parses() {
        let page_id = Uuid::new_v4();
        let question_id = Uuid::new_v4();
        let body = format!(
            r#"{{"page_id":"{}","question_id":"{}","answer":"Juggling"}}"#,
            page_id, question_id
        );

        let request: GenerateFactRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(request.page_id, page_id);
        assert_eq!(request.question_id, question_id);
        assert_eq!(request.answer, "Juggling");
    }

    #[test]
    fn entity_id_response_shape() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(EntityIdResponse::new(id)).unwrap();
        assert_eq!(json, serde_json::json!({ "entity_id": id.to_string() }));
    }
}
