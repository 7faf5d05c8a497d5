//! Product image intake.
//!
//! Image files are read concurrently and embedded as `data:` URLs. Each file
//! is appended the moment its read finishes, so images land in completion
//! order rather than the order they were picked.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ecobloom_core::{ProductDraft, ValidationError};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Largest accepted image file, in megabytes.
pub const MAX_IMAGE_MB: u64 = 2;

/// Largest accepted image file, in bytes.
pub const MAX_IMAGE_BYTES: u64 = MAX_IMAGE_MB * 1024 * 1024;

/// Errors raised while taking in image files.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Too many images, or a file over the size limit.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The file extension is not a known image type.
    #[error("{name} is not a supported image")]
    UnsupportedType { name: String },

    /// The file could not be read.
    #[error("could not read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one batch of image files.
#[derive(Debug, Default)]
pub struct IntakeReport {
    /// Images appended.
    pub added: usize,
    /// Files skipped, each with its reason.
    pub rejected: Vec<ImageError>,
}

/// A shared, ordered list of image references.
///
/// Clones refer to the same list, so removals can happen while a batch is
/// still loading.
#[derive(Debug, Clone, Default)]
pub struct ImageList {
    inner: Arc<Mutex<Vec<String>>>,
}

impl ImageList {
    #[must_use]
    pub fn new(images: Vec<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(images)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A copy of the current list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Remove the image at `index`, if present.
    pub fn remove(&self, index: usize) -> Option<String> {
        let mut images = self.lock();
        (index < images.len()).then(|| images.remove(index))
    }

    /// Append under the lock, refusing once the list is full. Concurrent
    /// batches each pass the up-front check, so the cap is enforced here too.
    fn push(&self, image: String) -> Result<(), ValidationError> {
        let mut images = self.lock();
        if images.len() >= ProductDraft::MAX_IMAGES {
            return Err(ValidationError::TooManyImages {
                max: ProductDraft::MAX_IMAGES,
            });
        }
        images.push(image);
        Ok(())
    }

    /// Load a batch of image files.
    ///
    /// The batch is refused outright if it would take the list past
    /// [`ProductDraft::MAX_IMAGES`]. Otherwise each file is checked and read
    /// on its own; a bad file is reported in the result and the others still
    /// load.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::TooManyImages` (wrapped) when the batch is
    /// refused; nothing is read.
    #[instrument(skip(self, paths))]
    pub async fn add_files<I>(&self, paths: I) -> Result<IntakeReport, ImageError>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().collect();
        if self.len() + paths.len() > ProductDraft::MAX_IMAGES {
            return Err(ValidationError::TooManyImages {
                max: ProductDraft::MAX_IMAGES,
            }
            .into());
        }

        let mut pending: FuturesUnordered<_> = paths.into_iter().map(load_data_url).collect();
        let mut report = IntakeReport::default();

        while let Some(result) = pending.next().await {
            match result.and_then(|data_url| self.push(data_url).map_err(ImageError::from)) {
                Ok(()) => report.added += 1,
                Err(e) => {
                    warn!(error = %e, "image rejected");
                    report.rejected.push(e);
                }
            }
        }

        debug!(added = report.added, rejected = report.rejected.len(), "image batch done");
        Ok(report)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// MIME type for a file, by extension.
#[must_use]
pub fn mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

/// Encode raw image bytes as a `data:` URL.
#[must_use]
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

async fn load_data_url(path: PathBuf) -> Result<String, ImageError> {
    let name = display_name(&path);
    let mime = mime_type(&path).ok_or_else(|| ImageError::UnsupportedType { name: name.clone() })?;

    let size = tokio::fs::metadata(&path)
        .await
        .map_err(|source| ImageError::Read {
            name: name.clone(),
            source,
        })?
        .len();
    if size > MAX_IMAGE_BYTES {
        return Err(ValidationError::ImageTooLarge {
            name,
            max_mb: MAX_IMAGE_MB,
        }
        .into());
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| ImageError::Read { name, source })?;
    Ok(to_data_url(mime, &bytes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, len: usize) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, vec![0xAB; len]).unwrap();
        path
    }

    #[test]
    fn test_data_url() {
        assert_eq!(to_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
        assert_eq!(mime_type(Path::new("a/B.JPG")), Some("image/jpeg"));
        assert_eq!(mime_type(Path::new("notes.txt")), None);
    }

    #[test]
    fn test_remove_out_of_range() {
        let list = ImageList::new(vec!["a".into(), "b".into()]);
        assert_eq!(list.remove(5), None);
        assert_eq!(list.remove(0), Some("a".to_string()));
        assert_eq!(list.snapshot(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_add_files_encodes_and_appends() {
        let dir = TempDir::new().unwrap();
        let list = ImageList::new(vec!["https://example.com/main.jpg".into()]);
        let report = list
            .add_files([write(&dir, "a.png", 3), write(&dir, "b.webp", 4)])
            .await
            .unwrap();

        assert_eq!(report.added, 2);
        assert!(report.rejected.is_empty());
        let images = list.snapshot();
        assert_eq!(images.len(), 3);
        assert_eq!(images[0], "https://example.com/main.jpg");
        assert!(images[1..].iter().any(|i| i.starts_with("data:image/png;base64,")));
        assert!(images[1..].iter().any(|i| i.starts_with("data:image/webp;base64,")));
    }

    #[tokio::test]
    async fn test_batch_over_limit_is_refused() {
        let dir = TempDir::new().unwrap();
        let list = ImageList::new(vec!["1".into(), "2".into(), "3".into()]);
        let paths: Vec<_> = (0..3).map(|i| write(&dir, &format!("{i}.png"), 1)).collect();

        let err = list.add_files(paths).await.unwrap_err();
        assert_eq!(err.to_string(), "Maximum 5 images allowed");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_push_refuses_past_limit() {
        let list = ImageList::new((0..5).map(|i| i.to_string()).collect());
        assert_eq!(
            list.push("6".into()),
            Err(ValidationError::TooManyImages { max: 5 })
        );
        assert_eq!(list.len(), 5);
    }

    #[tokio::test]
    async fn test_concurrent_batches_stay_within_limit() {
        let dir = TempDir::new().unwrap();
        let list = ImageList::default();
        let first: Vec<_> = (0..3).map(|i| write(&dir, &format!("a{i}.png"), 1)).collect();
        let second: Vec<_> = (0..3).map(|i| write(&dir, &format!("b{i}.png"), 1)).collect();

        let (a, b) = tokio::join!(list.add_files(first), list.add_files(second));
        let added: usize = [a, b].into_iter().flatten().map(|r| r.added).sum();

        assert!(list.len() <= ProductDraft::MAX_IMAGES);
        assert_eq!(added, list.len());
    }

    #[tokio::test]
    async fn test_oversized_file_skipped_others_load() {
        let dir = TempDir::new().unwrap();
        let big = write(&dir, "huge.jpg", usize::try_from(MAX_IMAGE_BYTES).unwrap() + 1);
        let ok = write(&dir, "ok.gif", 10);
        let list = ImageList::default();

        let report = list.add_files([big, ok]).await.unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].to_string(), "huge.jpg is too large (max 2MB)");
        assert!(list.snapshot()[0].starts_with("data:image/gif;base64,"));
    }

    #[tokio::test]
    async fn test_missing_and_unsupported_files_reported() {
        let dir = TempDir::new().unwrap();
        let list = ImageList::default();
        let report = list
            .add_files([dir.path().join("gone.png"), write(&dir, "doc.pdf", 1)])
            .await
            .unwrap();
        assert_eq!(report.added, 0);
        assert_eq!(report.rejected.len(), 2);
        assert!(list.is_empty());
    }
}
