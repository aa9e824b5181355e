//! Question handlers

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{CurrentUser, Question};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub content: String,
    pub order: i32,
}

impl From<Question> for QuestionResponse {
    fn from(q: Question) -> Self {
        QuestionResponse {
            id: q.id.0,
            content: q.content,
            order: q.order,
        }
    }
}

/// GET /questions/ordered
///
/// Unanswered questions for the caller's page, capped by remaining image credits.
pub async fn get_ordered_questions(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<QuestionResponse>>, AppError> {
    let questions = state.question_service.get_ordered_questions(&user).await?;
    Ok(Json(questions.into_iter().map(QuestionResponse::from).collect()))
}
