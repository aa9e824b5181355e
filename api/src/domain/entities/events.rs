//! Page domain events
//!
//! Raised by [`super::Page`] for every mutation and published after the page
//! has been saved.

use serde::Serialize;

use super::{ContactId, FactId, PageId, PageState};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    PageCreated {
        page_id: PageId,
        route: String,
    },
    PageRouteUpdated {
        page_id: PageId,
        route: String,
    },
    PageDisplayNameUpdated {
        page_id: PageId,
        display_name: String,
    },
    PageAvatarImageUpdated {
        page_id: PageId,
        avatar_image_url: String,
    },
    PageReferenceImageUpdated {
        page_id: PageId,
        reference_image_url: String,
    },
    PageStateUpdated {
        page_id: PageId,
        state: PageState,
    },
    ContactAdded {
        page_id: PageId,
        contact_id: ContactId,
        content: String,
    },
    ContactUpdated {
        page_id: PageId,
        contact_id: ContactId,
        content: String,
    },
    ContactRemoved {
        page_id: PageId,
        contact_id: ContactId,
    },
    FactAdded {
        page_id: PageId,
        fact_id: FactId,
        title: String,
        content: String,
    },
    FactUpdated {
        page_id: PageId,
        fact_id: FactId,
        title: String,
        content: String,
    },
    FactImageUrlUpdated {
        page_id: PageId,
        fact_id: FactId,
        image_url: String,
    },
    FactRemoved {
        page_id: PageId,
        fact_id: FactId,
    },
}

impl PageEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PageEvent::PageCreated { .. } => "PageCreated",
            PageEvent::PageRouteUpdated { .. } => "PageRouteUpdated",
            PageEvent::PageDisplayNameUpdated { .. } => "PageDisplayNameUpdated",
            PageEvent::PageAvatarImageUpdated { .. } => "PageAvatarImageUpdated",
            PageEvent::PageReferenceImageUpdated { .. } => "PageReferenceImageUpdated",
            PageEvent::PageStateUpdated { .. } => "PageStateUpdated",
            PageEvent::ContactAdded { .. } => "ContactAdded",
            PageEvent::ContactUpdated { .. } => "ContactUpdated",
            PageEvent::ContactRemoved { .. } => "ContactRemoved",
            PageEvent::FactAdded { .. } => "FactAdded",
            PageEvent::FactUpdated { .. } => "FactUpdated",
            PageEvent::FactImageUrlUpdated { .. } => "FactImageUrlUpdated",
            PageEvent::FactRemoved { .. } => "FactRemoved",
        }
    }

    pub fn page_id(&self) -> PageId {
        match self {
            PageEvent::PageCreated { page_id, .. }
            | PageEvent::PageRouteUpdated { page_id, .. }
            | PageEvent::PageDisplayNameUpdated { page_id, .. }
            | PageEvent::PageAvatarImageUpdated { page_id, .. }
            | PageEvent::PageReferenceImageUpdated { page_id, .. }
            | PageEvent::PageStateUpdated { page_id, .. }
            | PageEvent::ContactAdded { page_id, .. }
            | PageEvent::ContactUpdated { page_id, .. }
            | PageEvent::ContactRemoved { page_id, .. }
            | PageEvent::FactAdded { page_id, .. }
            | PageEvent::FactUpdated { page_id, .. }
            | PageEvent::FactImageUrlUpdated { page_id, .. }
            | PageEvent::FactRemoved { page_id, .. } => *page_id,
        }
    }
}
