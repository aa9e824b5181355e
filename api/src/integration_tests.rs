//! Full integration tests for the HeyItIsMe API
//!
//! Walks a user through the page wizard using every service against the
//! in-memory adapters:
//! 1. Create page
//! 2. Set display name, avatar and reference image
//! 3. Add contacts
//! 4. Answer questions (generated facts)
//! 5. Complete the page -> visible at its public route
//!
//! Run with: cargo test integration_tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::app::{ContactService, FactService, PageService, QuestionService};
    use crate::domain::entities::{PageEvent, PageState};
    use crate::error::{AppError, DomainError};
    use crate::test_utils::*;

    struct World {
        pages: PageService<InMemoryPageRepository, InMemoryImageStore, RecordingEventPublisher>,
        facts: FactService<
            InMemoryPageRepository,
            InMemoryQuestionRepository,
            InMemoryBotRepository,
            MockAiTextService,
            MockAiImageService,
            InMemoryImageStore,
            RecordingEventPublisher,
        >,
        contacts: ContactService<InMemoryPageRepository, RecordingEventPublisher>,
        questions: QuestionService<
            InMemoryQuestionRepository,
            InMemoryPageRepository,
            InMemoryBotRepository,
            InMemoryCreditRepository,
        >,
        page_repo: Arc<InMemoryPageRepository>,
        ai_image: Arc<MockAiImageService>,
        publisher: Arc<RecordingEventPublisher>,
    }

    fn world(credits: f64) -> World {
        let page_repo = Arc::new(InMemoryPageRepository::new());
        let question_repo = Arc::new(
            InMemoryQuestionRepository::new()
                .with_question(test_question(1, "What is your superpower?"))
                .with_question(test_question(2, "Where did you grow up?"))
                .with_question(test_question(3, "Favourite food?")),
        );
        let image_bot = test_image_bot();
        let credit_repo = Arc::new(InMemoryCreditRepository::new().with_credits(
            &image_bot.id,
            "user-1",
            credits,
        ));
        let bot_repo = Arc::new(
            InMemoryBotRepository::new()
                .with_bot(test_text_bot())
                .with_bot(image_bot),
        );
        let images = Arc::new(InMemoryImageStore::new());
        let ai_image = Arc::new(MockAiImageService::new());
        let publisher = Arc::new(RecordingEventPublisher::new());

        World {
            pages: PageService::new(page_repo.clone(), images.clone(), publisher.clone()),
            facts: FactService::new(
                page_repo.clone(),
                question_repo.clone(),
                bot_repo.clone(),
                Arc::new(MockAiTextService::new()),
                ai_image.clone(),
                images,
                publisher.clone(),
            ),
            contacts: ContactService::new(page_repo.clone(), publisher.clone()),
            questions: QuestionService::new(
                question_repo,
                page_repo.clone(),
                bot_repo,
                credit_repo,
            ),
            page_repo,
            ai_image,
            publisher,
        }
    }

    #[tokio::test]
    async fn page_wizard_to_published_page() {
        let w = world(2.0);
        let user = test_user("user-1");

        let page_id = w.pages.create_page(&user, "jane_doe").await.unwrap();
        assert!(w.pages.user_has_any_page(&user, "user-1").await.unwrap());

        w.pages
            .update_display_name(&user, &page_id, "Jane Doe")
            .await
            .unwrap();
        w.pages
            .update_avatar_image(&user, &page_id, "YXZhdGFy")
            .await
            .unwrap();
        w.pages
            .update_reference_image(&user, &page_id, "cmVmZXJlbmNl")
            .await
            .unwrap();
        w.contacts
            .add_contact(&user, &page_id, "jane@example.com")
            .await
            .unwrap();

        // Two credits: two questions offered, lowest order first
        let offered = w.questions.get_ordered_questions(&user).await.unwrap();
        let orders: Vec<_> = offered.iter().map(|q| q.order).collect();
        assert_eq!(orders, vec![1, 2]);

        w.facts
            .generate_fact(&user, &page_id, &offered[0].id, "Juggling")
            .await
            .unwrap();

        // The reference image uploaded earlier is sent to the image service
        assert_eq!(w.ai_image.calls()[0].1.as_deref(), Some("cmVmZXJlbmNl"));

        let offered = w.questions.get_ordered_questions(&user).await.unwrap();
        let orders: Vec<_> = offered.iter().map(|q| q.order).collect();
        assert_eq!(orders, vec![2, 3]);

        // Not public until completed
        assert!(matches!(
            w.pages.get_published_page("jane_doe").await,
            Err(AppError::NotFound(_))
        ));

        w.pages
            .update_state(&user, &page_id, PageState::Completed)
            .await
            .unwrap();

        let public = w.pages.get_published_page("jane_doe").await.unwrap();
        assert_eq!(public.display_name(), "Jane Doe");
        assert_eq!(public.contacts().len(), 1);
        assert_eq!(public.facts().len(), 1);
        assert!(!public.facts()[0].image_url.is_empty());
        assert_eq!(public.version(), 6);

        let events = w.publisher.events();
        assert!(matches!(events[0], PageEvent::PageCreated { .. }));
        assert!(matches!(
            events.last(),
            Some(PageEvent::PageStateUpdated { .. })
        ));
    }

    #[tokio::test]
    async fn route_can_only_be_taken_once() {
        let w = world(0.0);

        w.pages
            .create_page(&test_user("user-1"), "jane")
            .await
            .unwrap();
        let result = w.pages.create_page(&test_user("user-2"), "jane").await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::AlreadyExists(_)))
        ));
        assert!(w.page_repo.get_by_route("jane").is_some());
    }

    #[tokio::test]
    async fn concurrent_edit_is_rejected() {
        let w = world(0.0);
        let user = test_user("user-1");
        let page_id = w.pages.create_page(&user, "jane").await.unwrap();

        w.page_repo.bump_version_on_next_load(&page_id);
        let result = w.contacts.add_contact(&user, &page_id, "x@y.z").await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Conflict(_)))
        ));
        assert!(w.page_repo.get(&page_id).unwrap().contacts().is_empty());
    }
}
