//! Fact service
//!
//! Manual fact editing and AI fact generation.

use std::sync::Arc;

use crate::app::common::{ensure_access, save_and_publish, versioned_file_name};
use crate::app::prompt::{fill_prompt, PromptVariables};
use crate::domain::entities::{
    Bot, CurrentUser, FactId, Page, PageId, QuestionId, FACT_CONTENT_GENERATOR_PROMPT,
    FACT_IMAGE_GENERATOR_BOT, FACT_TEXT_GENERATOR_BOT, FACT_TITLE_GENERATOR_PROMPT,
};
use crate::domain::ports::{
    AiImageService, AiTextService, BotRepository, EventPublisher, ImageStore, PageRepository,
    QuestionRepository,
};
use crate::error::{AiError, AppError, DomainError};

/// Service for managing the facts of a page
pub struct FactService<PR, QR, BR, AT, AI, IS, EP>
where
    PR: PageRepository,
    QR: QuestionRepository,
    BR: BotRepository,
    AT: AiTextService,
    AI: AiImageService,
    IS: ImageStore,
    EP: EventPublisher,
{
    pages: Arc<PR>,
    questions: Arc<QR>,
    bots: Arc<BR>,
    ai_text: Arc<AT>,
    ai_image: Arc<AI>,
    images: Arc<IS>,
    publisher: Arc<EP>,
}

impl<PR, QR, BR, AT, AI, IS, EP> FactService<PR, QR, BR, AT, AI, IS, EP>
where
    PR: PageRepository,
    QR: QuestionRepository,
    BR: BotRepository,
    AT: AiTextService,
    AI: AiImageService,
    IS: ImageStore,
    EP: EventPublisher,
{
    pub fn new(
        pages: Arc<PR>,
        questions: Arc<QR>,
        bots: Arc<BR>,
        ai_text: Arc<AT>,
        ai_image: Arc<AI>,
        images: Arc<IS>,
        publisher: Arc<EP>,
    ) -> Self {
        Self {
            pages,
            questions,
            bots,
            ai_text,
            ai_image,
            images,
            publisher,
        }
    }

    /// Add a hand-written fact to a page
    pub async fn add_fact(
        &self,
        user: &CurrentUser,
        page_id: &PageId,
        title: &str,
        content: &str,
    ) -> Result<FactId, AppError> {
        let mut page = self.load_page(page_id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        let fact_id = page.add_fact(title, content, None)?;

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;

        tracing::info!(page_id = %page_id, fact_id = %fact_id, "Fact added");
        Ok(fact_id)
    }

    pub async fn update_fact(
        &self,
        user: &CurrentUser,
        fact_id: &FactId,
        title: &str,
        content: &str,
    ) -> Result<FactId, AppError> {
        let mut page = self.load_page_by_fact(fact_id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        page.update_fact(fact_id, title, content)?;

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;
        Ok(*fact_id)
    }

    pub async fn remove_fact(
        &self,
        user: &CurrentUser,
        fact_id: &FactId,
    ) -> Result<FactId, AppError> {
        let mut page = self.load_page_by_fact(fact_id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        page.remove_fact(fact_id)?;

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;

        tracing::info!(page_id = %page.id(), fact_id = %fact_id, "Fact removed");
        Ok(*fact_id)
    }

    /// Store an uploaded image and attach it to a fact
    pub async fn update_fact_image(
        &self,
        user: &CurrentUser,
        fact_id: &FactId,
        base64_image: &str,
    ) -> Result<FactId, AppError> {
        if base64_image.trim().is_empty() {
            return Err(DomainError::required("Image").into());
        }

        let mut page = self.load_page_by_fact(fact_id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        let image_url = self.store_fact_image(&page, fact_id, base64_image).await?;
        page.update_fact_image_url(fact_id, &image_url)?;

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;
        Ok(*fact_id)
    }

    /// Generate a fact from a question and the user's answer
    ///
    /// Calls the text service twice (content, then title) and the image service
    /// once, stores the image and saves the page. Errors from any step abort
    /// the whole operation; nothing is retried.
    pub async fn generate_fact(
        &self,
        user: &CurrentUser,
        page_id: &PageId,
        question_id: &QuestionId,
        answer: &str,
    ) -> Result<FactId, AppError> {
        if answer.trim().is_empty() {
            return Err(DomainError::required("Answer").into());
        }

        let mut page = self.load_page(page_id).await?;
        ensure_access(user, &page)?;
        let loaded_version = page.version();

        let question = self
            .questions
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Question {}", question_id)))?;

        let text_bot = self.load_bot(FACT_TEXT_GENERATOR_BOT).await?;
        let image_bot = self.load_bot(FACT_IMAGE_GENERATOR_BOT).await?;

        let vars = PromptVariables::new(&question.content, answer);
        let content = self
            .generate_text(&text_bot, FACT_CONTENT_GENERATOR_PROMPT, &vars)
            .await?;

        let vars = vars.with_fact_content(&content);
        let title = self
            .generate_text(&text_bot, FACT_TITLE_GENERATOR_PROMPT, &vars)
            .await?;

        let vars = vars.with_fact_title(&title);
        let image = self.generate_image(&page, &image_bot, &vars).await?;

        let fact_id = page.add_fact(&title, &content, Some(question.id))?;
        let image_url = self.store_fact_image(&page, &fact_id, &image).await?;
        page.update_fact_image_url(&fact_id, &image_url)?;

        save_and_publish(&*self.pages, &*self.publisher, &mut page, loaded_version).await?;

        tracing::info!(
            page_id = %page_id,
            fact_id = %fact_id,
            question_id = %question_id,
            "Fact generated"
        );
        Ok(fact_id)
    }

    async fn load_page(&self, page_id: &PageId) -> Result<Page, AppError> {
        self.pages
            .find_by_id(page_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Page {}", page_id)).into())
    }

    async fn load_page_by_fact(&self, fact_id: &FactId) -> Result<Page, AppError> {
        self.pages
            .find_by_fact_id(fact_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Fact {}", fact_id)).into())
    }

    async fn load_bot(&self, system_name: &str) -> Result<Bot, AppError> {
        self.bots
            .find_by_system_name(system_name)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Fact generator bot '{}'", system_name)).into()
            })
    }

    async fn generate_text(
        &self,
        bot: &Bot,
        prompt_title: &str,
        vars: &PromptVariables,
    ) -> Result<String, AppError> {
        let prompt = bot.prompt_titled(prompt_title).ok_or_else(|| {
            DomainError::Validation(format!(
                "Required prompt '{}' is missing on bot '{}'",
                prompt_title, bot.system_name
            ))
        })?;

        let prompt = fill_prompt(prompt, vars);
        let text = self
            .ai_text
            .generate_text(&bot.llm_parameters, std::slice::from_ref(&prompt))
            .await?;

        let text = text.trim();
        if text.is_empty() {
            return Err(AiError::EmptyResponse.into());
        }
        Ok(text.to_string())
    }

    async fn generate_image(
        &self,
        page: &Page,
        bot: &Bot,
        vars: &PromptVariables,
    ) -> Result<String, AppError> {
        let prompts: Vec<_> = bot
            .ordered_prompts()
            .iter()
            .map(|p| fill_prompt(p, vars))
            .collect();

        let reference = if page.reference_image_url().is_empty() {
            None
        } else {
            Some(self.images.load_base64(page.reference_image_url()).await?)
        };

        let image = self
            .ai_image
            .generate_image(&bot.llm_parameters, &prompts, reference.as_deref())
            .await?;

        if image.trim().is_empty() {
            return Err(AiError::EmptyResponse.into());
        }
        Ok(image)
    }

    async fn store_fact_image(
        &self,
        page: &Page,
        fact_id: &FactId,
        base64_image: &str,
    ) -> Result<String, AppError> {
        let page_id = page.id().to_string();
        let url = self
            .images
            .save_image(
                &versioned_file_name(&fact_id.to_string()),
                base64_image,
                &["pages", &page_id, "facts"],
            )
            .await?;
        Ok(url)
    }
}
