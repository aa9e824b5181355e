//! Question service
//!
//! Selects the questions a user is offered in the page wizard.

use std::sync::Arc;

use crate::domain::entities::{CurrentUser, Question, FACT_IMAGE_GENERATOR_BOT};
use crate::domain::ports::{BotRepository, CreditRepository, PageRepository, QuestionRepository};
use crate::error::{AppError, DomainError};

pub struct QuestionService<QR, PR, BR, CR>
where
    QR: QuestionRepository,
    PR: PageRepository,
    BR: BotRepository,
    CR: CreditRepository,
{
    questions: Arc<QR>,
    pages: Arc<PR>,
    bots: Arc<BR>,
    credits: Arc<CR>,
}

impl<QR, PR, BR, CR> QuestionService<QR, PR, BR, CR>
where
    QR: QuestionRepository,
    PR: PageRepository,
    BR: BotRepository,
    CR: CreditRepository,
{
    pub fn new(questions: Arc<QR>, pages: Arc<PR>, bots: Arc<BR>, credits: Arc<CR>) -> Self {
        Self {
            questions,
            pages,
            bots,
            credits,
        }
    }

    /// Questions not yet answered on the user's page, in wizard order
    ///
    /// Each generated fact spends one image credit, so the list is capped at
    /// the user's remaining credits for the image bot.
    pub async fn get_ordered_questions(
        &self,
        user: &CurrentUser,
    ) -> Result<Vec<Question>, AppError> {
        let page = self
            .pages
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No page for user {}", user.user_id)))?;

        let image_bot = self
            .bots
            .find_by_system_name(FACT_IMAGE_GENERATOR_BOT)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "Fact generator bot '{}'",
                    FACT_IMAGE_GENERATOR_BOT
                ))
            })?;

        let credits = self
            .credits
            .user_credits(&image_bot.id, &user.user_id)
            .await?;
        let limit = credits.max(0.0).trunc() as usize;

        let mut questions: Vec<Question> = self
            .questions
            .list()
            .await?
            .into_iter()
            .filter(|q| !page.has_fact_for_question(&q.id))
            .collect();
        questions.sort_by_key(|q| q.order);
        questions.truncate(limit);

        Ok(questions)
    }
}
