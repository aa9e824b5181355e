//! Image storage port

use async_trait::async_trait;

use crate::error::ImageStoreError;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store a base64 encoded image under `folders/file_name` and return its public URL
    ///
    /// `file_name` may carry a query suffix (`avatar.jpg?v=12345`) used for cache
    /// busting; it is kept in the URL but not in the stored file name.
    async fn save_image(
        &self,
        file_name: &str,
        base64_image: &str,
        folders: &[&str],
    ) -> Result<String, ImageStoreError>;

    /// Load an image by URL and return it base64 encoded
    async fn load_base64(&self, url: &str) -> Result<String, ImageStoreError>;
}
