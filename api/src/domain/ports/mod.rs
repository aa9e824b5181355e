//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod ai;
pub mod events;
pub mod images;
pub mod repositories;

pub use ai::{AiImageService, AiTextService};
pub use events::EventPublisher;
pub use images::ImageStore;
pub use repositories::{
    BotRepository, CreditRepository, PageRepository, PageSearch, PageSearchResult,
    QuestionRepository, SortOrder,
};
