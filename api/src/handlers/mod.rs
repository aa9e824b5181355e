//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod contacts;
pub mod facts;
pub mod pages;
pub mod questions;

pub use contacts::{add_contact, remove_contact, update_contact};
pub use facts::{add_fact, generate_fact, remove_fact, update_fact, update_fact_image};
pub use pages::{
    create_page, get_my_page, get_page, get_published_page, my_page_exists, search_pages,
    update_avatar_image, update_display_name, update_reference_image, update_route, update_state,
};
pub use questions::get_ordered_questions;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response of every mutating command
#[derive(Debug, Serialize)]
pub struct EntityIdResponse {
    pub entity_id: Uuid,
}

impl EntityIdResponse {
    pub fn new(entity_id: Uuid) -> Self {
        Self { entity_id }
    }
}

/// Request carrying a base64 encoded image
#[derive(Debug, Deserialize)]
pub struct ImageUploadRequest {
    pub base64_image: String,
}
