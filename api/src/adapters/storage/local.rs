//! Local-disk image store
//!
//! Images are written under a root directory that the HTTP server exposes
//! at `public_base_url`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use urlencoding::{decode, encode};

use crate::domain::ports::ImageStore;
use crate::error::ImageStoreError;

pub struct LocalImageStore {
    http: Client,
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: String) -> Self {
        Self {
            http: Client::new(),
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path on disk for a URL served by this store
    fn local_path(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix(&self.public_base_url)?;
        let relative = relative.split('?').next().unwrap_or_default();

        let mut path = self.root.clone();
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            let segment = decode(segment).ok()?;
            if !is_safe_segment(&segment) {
                return None;
            }
            path.push(segment.as_ref());
        }
        Some(path)
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}

/// Decode a base64 payload, accepting `data:image/...;base64,` URLs
fn decode_image(base64_image: &str) -> Result<Vec<u8>, ImageStoreError> {
    let payload = match base64_image.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => base64_image,
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageStoreError::InvalidImage(e.to_string()))?;
    if bytes.is_empty() {
        return Err(ImageStoreError::InvalidImage("Image is empty".to_string()));
    }
    Ok(bytes)
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save_image(
        &self,
        file_name: &str,
        base64_image: &str,
        folders: &[&str],
    ) -> Result<String, ImageStoreError> {
        let (stored_name, query) = match file_name.split_once('?') {
            Some((name, query)) => (name, Some(query)),
            None => (file_name, None),
        };
        if !is_safe_segment(stored_name) || !folders.iter().all(|f| is_safe_segment(f)) {
            return Err(ImageStoreError::InvalidImage(format!(
                "Invalid image path {}/{}",
                folders.join("/"),
                file_name
            )));
        }

        let bytes = decode_image(base64_image)?;

        let dir = folders.iter().fold(self.root.clone(), |p, f| p.join(f));
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(stored_name), &bytes).await?;

        let mut url = self.public_base_url.clone();
        for segment in folders.iter().copied().chain(std::iter::once(stored_name)) {
            url.push('/');
            url.push_str(&encode(segment));
        }
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }

        tracing::debug!(url = %url, bytes = bytes.len(), "Image stored");
        Ok(url)
    }

    async fn load_base64(&self, url: &str) -> Result<String, ImageStoreError> {
        if url.trim().is_empty() {
            return Err(ImageStoreError::InvalidImage("Image url is empty".to_string()));
        }

        let bytes = if url.starts_with(&self.public_base_url) {
            let path = self.local_path(url).ok_or_else(|| {
                ImageStoreError::InvalidImage(format!("Invalid image url {}", url))
            })?;
            tokio::fs::read(path).await?
        } else if url.starts_with("http://") || url.starts_with("https://") {
            self.http
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?
                .to_vec()
        } else {
            return Err(ImageStoreError::InvalidImage(format!(
                "Unsupported image url {}",
                url
            )));
        };

        Ok(STANDARD.encode(bytes))
    }
}
