//! HeyItIsMe API Server
//!
//! Personal page builder: users create a page, add contacts and AI-generated
//! facts, then publish it under a route.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod integration_tests;

use adapters::{
    LocalImageStore, OpenAiImageClient, OpenAiTextClient, PostgresBotRepository,
    PostgresCreditRepository, PostgresPageRepository, PostgresQuestionRepository,
    TracingEventPublisher,
};
use app::{ContactService, FactService, PageService, QuestionService};
use auth::TokenVerifier;
use config::Config;

pub type AppPageService =
    PageService<PostgresPageRepository, LocalImageStore, TracingEventPublisher>;
pub type AppFactService = FactService<
    PostgresPageRepository,
    PostgresQuestionRepository,
    PostgresBotRepository,
    OpenAiTextClient,
    OpenAiImageClient,
    LocalImageStore,
    TracingEventPublisher,
>;
pub type AppContactService = ContactService<PostgresPageRepository, TracingEventPublisher>;
pub type AppQuestionService = QuestionService<
    PostgresQuestionRepository,
    PostgresPageRepository,
    PostgresBotRepository,
    PostgresCreditRepository,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub page_service: Arc<AppPageService>,
    pub fact_service: Arc<AppFactService>,
    pub contact_service: Arc<AppContactService>,
    pub question_service: Arc<AppQuestionService>,
    pub token_verifier: Arc<TokenVerifier>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,heyitisme_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting HeyItIsMe API...");

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let page_repo = Arc::new(PostgresPageRepository::new(db.clone()));
    let question_repo = Arc::new(PostgresQuestionRepository::new(db.clone()));
    let bot_repo = Arc::new(PostgresBotRepository::new(db.clone()));
    let credit_repo = Arc::new(PostgresCreditRepository::new(db.clone()));

    let ai_text = Arc::new(OpenAiTextClient::new(
        config.ai_text_url.clone(),
        config.ai_text_api_key.clone(),
    ));
    let ai_image = Arc::new(OpenAiImageClient::new(
        config.ai_image_url.clone(),
        config.ai_image_api_key.clone(),
    ));
    let image_store = Arc::new(LocalImageStore::new(
        &config.image_storage_dir,
        config.image_public_base_url.clone(),
    ));
    tokio::fs::create_dir_all(image_store.root())
        .await
        .context("Failed to create image storage directory")?;

    let publisher = Arc::new(TracingEventPublisher);

    // Create application services
    let state = AppState {
        page_service: Arc::new(PageService::new(
            page_repo.clone(),
            image_store.clone(),
            publisher.clone(),
        )),
        fact_service: Arc::new(FactService::new(
            page_repo.clone(),
            question_repo.clone(),
            bot_repo.clone(),
            ai_text,
            ai_image,
            image_store.clone(),
            publisher.clone(),
        )),
        contact_service: Arc::new(ContactService::new(page_repo.clone(), publisher)),
        question_service: Arc::new(QuestionService::new(
            question_repo,
            page_repo,
            bot_repo,
            credit_repo,
        )),
        token_verifier: Arc::new(TokenVerifier::new(&config.auth_token_secret)),
    };

    // Fact generation spends AI credits: 1 req/sec sustained, burst of 3
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(1)
            .burst_size(3)
            .finish()
            .context("Failed to build governor config")?,
    );

    let rate_limited_routes = Router::new()
        .route("/facts/generate", post(handlers::generate_fact))
        .layer(GovernorLayer {
            config: governor_config,
        });

    let protected_routes = Router::new()
        // Pages
        .route(
            "/pages",
            post(handlers::create_page).get(handlers::search_pages),
        )
        .route("/pages/me", get(handlers::get_my_page))
        .route("/pages/me/exists", get(handlers::my_page_exists))
        .route("/pages/:id", get(handlers::get_page))
        .route("/pages/:id/route", put(handlers::update_route))
        .route("/pages/:id/display-name", put(handlers::update_display_name))
        .route("/pages/:id/avatar-image", put(handlers::update_avatar_image))
        .route(
            "/pages/:id/reference-image",
            put(handlers::update_reference_image),
        )
        .route("/pages/:id/state", put(handlers::update_state))
        // Facts
        .route("/facts", post(handlers::add_fact))
        .route(
            "/facts/:id",
            put(handlers::update_fact).delete(handlers::remove_fact),
        )
        .route("/facts/:id/image-url", put(handlers::update_fact_image))
        .merge(rate_limited_routes)
        // Contacts
        .route("/contacts", post(handlers::add_contact))
        .route(
            "/contacts/:id",
            put(handlers::update_contact).delete(handlers::remove_contact),
        )
        // Questions
        .route("/questions/ordered", get(handlers::get_ordered_questions))
        .layer(middleware::from_fn_with_state(
            state.token_verifier.clone(),
            auth::auth_middleware,
        ));

    let cors = if config.cors_allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    // Build router
    let app = Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Published pages (no auth)
        .route("/p/:route", get(handlers::get_published_page))
        .merge(protected_routes)
        // Stored images
        .nest_service("/images", ServeDir::new(&config.image_storage_dir))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
