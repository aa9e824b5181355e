//! Helpers shared by the page-mutating services

use rand::Rng;

use crate::domain::entities::{CurrentUser, Page};
use crate::domain::ports::{EventPublisher, PageRepository};
use crate::error::AppError;

/// Fail with `Forbidden` unless the user owns the page or is an administrator
pub fn ensure_access(user: &CurrentUser, page: &Page) -> Result<(), AppError> {
    if user.can_access(page.user_id()) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %user.user_id,
            page_id = %page.id(),
            "Access to page denied"
        );
        Err(AppError::Forbidden)
    }
}

/// Save a page at its loaded version, then publish its events
pub async fn save_and_publish<PR, EP>(
    pages: &PR,
    publisher: &EP,
    page: &mut Page,
    loaded_version: i64,
) -> Result<i64, AppError>
where
    PR: PageRepository,
    EP: EventPublisher,
{
    let new_version = pages
        .concurrency_safe_update(page, loaded_version)
        .await
        .inspect_err(|e| {
            tracing::warn!(page_id = %page.id(), loaded_version, error = %e, "Page update failed");
        })?;

    let events = page.take_events();
    publisher.publish(&events).await?;

    Ok(new_version)
}

/// Image file name with a random cache-busting suffix, e.g. `avatar.jpg?v=48213`
pub fn versioned_file_name(stem: &str) -> String {
    let version: u32 = rand::thread_rng().gen_range(10_000..100_000);
    format!("{}.jpg?v={}", stem, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_file_name_has_five_digit_suffix() {
        let name = versioned_file_name("avatar");
        let (file, version) = name.split_once("?v=").unwrap();
        assert_eq!(file, "avatar.jpg");
        assert_eq!(version.len(), 5);
        assert!(version.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn owner_and_admin_have_access() {
        let page = Page::create("jane", "user-1", false).unwrap();

        let owner = CurrentUser {
            user_id: "user-1".to_string(),
            is_admin: false,
        };
        let admin = CurrentUser {
            user_id: "root".to_string(),
            is_admin: true,
        };
        let stranger = CurrentUser {
            user_id: "user-2".to_string(),
            is_admin: false,
        };

        assert!(ensure_access(&owner, &page).is_ok());
        assert!(ensure_access(&admin, &page).is_ok());
        assert!(matches!(
            ensure_access(&stranger, &page),
            Err(AppError::Forbidden)
        ));
    }
}
