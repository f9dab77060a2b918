//! Filesystem store for uploaded prompt images.
//!
//! Files are written as `<prompt_id>_<uuid>.<ext>` inside the configured
//! uploads directory and served by the fronting layer under
//! `/uploads/images/`. The prompt-id prefix is the association: listing a
//! prompt's images is a directory scan, no database table involved.

use std::path::{Path, PathBuf};

use promptly_core::types::DbId;
use uuid::Uuid;

/// Public URL prefix under which the uploads directory is served.
const PUBLIC_PREFIX: &str = "/uploads/images";

/// An uploaded image: the client-supplied filename (for its extension) and
/// the raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Accessor for the uploaded-image directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    uploads_dir: PathBuf,
}

impl ImageStore {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }

    /// Public URLs of every stored image belonging to a prompt, sorted by
    /// filename for a stable order.
    ///
    /// A missing uploads directory is an empty result, not an error -- the
    /// directory is created lazily on first upload. Other I/O failures are
    /// returned for the caller to degrade explicitly.
    pub async fn list_prompt_images(&self, prompt_id: DbId) -> std::io::Result<Vec<String>> {
        let prefix = format!("{prompt_id}_");

        let mut entries = match tokio::fs::read_dir(&self.uploads_dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let mut urls = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(&prefix) {
                urls.push(format!("{PUBLIC_PREFIX}/{name}"));
            }
        }
        urls.sort();
        Ok(urls)
    }

    /// Persist a batch of uploaded images for a prompt, returning their
    /// public URLs in input order.
    ///
    /// Partial failure leaves already-written files on disk; callers that
    /// need atomicity run this inside their transaction window and invoke
    /// [`ImageStore::remove_prompt_images`] on rollback.
    pub async fn save_images(
        &self,
        prompt_id: DbId,
        images: &[UploadedImage],
    ) -> std::io::Result<Vec<String>> {
        tokio::fs::create_dir_all(&self.uploads_dir).await?;

        let mut urls = Vec::with_capacity(images.len());
        for image in images {
            let ext = image
                .file_name
                .as_deref()
                .and_then(extension_of)
                .unwrap_or("png");
            let name = format!("{prompt_id}_{}.{ext}", Uuid::new_v4());
            tokio::fs::write(self.uploads_dir.join(&name), &image.bytes).await?;
            urls.push(format!("{PUBLIC_PREFIX}/{name}"));
        }
        Ok(urls)
    }

    /// Best-effort removal of every stored image belonging to a prompt.
    ///
    /// Used to clean up after a rolled-back prompt creation. Failures are
    /// logged, not returned: the database state is already correct and a
    /// stray file is not worth failing the request over.
    pub async fn remove_prompt_images(&self, prompt_id: DbId) {
        let urls = match self.list_prompt_images(prompt_id).await {
            Ok(urls) => urls,
            Err(err) => {
                tracing::warn!(prompt_id, error = %err, "Failed to scan uploads for cleanup");
                return;
            }
        };
        for url in urls {
            let Some(name) = url.rsplit('/').next() else {
                continue;
            };
            if let Err(err) = tokio::fs::remove_file(self.uploads_dir.join(name)).await {
                tracing::warn!(prompt_id, file = name, error = %err, "Failed to remove upload");
            }
        }
    }
}

/// File extension of an uploaded filename, when it has a sane one.
fn extension_of(file_name: &str) -> Option<&str> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
