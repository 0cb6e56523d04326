//! Image upload handling
//!
//! A creation request carries scalar form fields plus up to [`MAX_IMAGES`]
//! image parts named `images`. Acceptance is all-or-nothing: too many parts
//! or a non-image part rejects the whole request before anything is
//! persisted. Field validation also runs before files are written, so a
//! rejected record never leaves orphan files behind; if the record write
//! itself fails after persistence, the already-stored files are removed
//! again by a compensating delete.

use async_trait::async_trait;
use axum::extract::Multipart;
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

use crate::core::error::UploadError;
use crate::model::property::{ImageRef, MAX_IMAGES};

/// An image file parsed from a multipart request, held in memory until the
/// whole request has been accepted
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Scalar fields and image parts extracted from one creation request
#[derive(Debug, Default)]
pub struct ListingForm {
    /// Repeated fields (e.g. amenities) keep all values in order
    pub fields: HashMap<String, Vec<String>>,
    pub images: Vec<ImageFile>,
}

/// Read a multipart body into fields and images, enforcing the image count
/// and content-type rules
pub async fn parse_listing_form(mut multipart: Multipart) -> Result<ListingForm, UploadError> {
    let mut form = ListingForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::MalformedBody {
            message: e.to_string(),
        })?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "images" {
            let file_name = field.file_name().unwrap_or("unnamed").to_string();
            let content_type = field.content_type().unwrap_or("").to_string();

            if !content_type.starts_with("image/") {
                return Err(UploadError::NotAnImage {
                    file_name,
                    content_type,
                });
            }
            if form.images.len() == MAX_IMAGES {
                return Err(UploadError::TooManyImages {
                    count: MAX_IMAGES + 1,
                    max: MAX_IMAGES,
                });
            }

            let bytes = field
                .bytes()
                .await
                .map_err(|e| UploadError::MalformedBody {
                    message: e.to_string(),
                })?
                .to_vec();

            form.images.push(ImageFile {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field.text().await.map_err(|e| UploadError::MalformedBody {
                message: e.to_string(),
            })?;
            form.fields.entry(name).or_default().push(value);
        }
    }

    Ok(form)
}

/// Backend that persists accepted image files
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist one file and return its stored reference
    async fn save(&self, image: &ImageFile) -> Result<ImageRef, UploadError>;

    /// Remove a stored file (compensating delete)
    async fn remove(&self, image: &ImageRef) -> Result<(), UploadError>;
}

/// File store writing to a local directory
///
/// Stored names are prefixed with a fresh uuid so uploads can never collide
/// or traverse outside the directory.
pub struct LocalFileStore {
    dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let stored = url.strip_prefix("/uploads/")?;
        Some(self.dir.join(stored))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, image: &ImageFile) -> Result<ImageRef, UploadError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| UploadError::Storage {
                message: e.to_string(),
            })?;

        // keep only the base name from whatever the client sent
        let base = image
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("unnamed");
        let stored = format!("{}_{}", Uuid::new_v4(), base);

        tokio::fs::write(self.dir.join(&stored), &image.bytes)
            .await
            .map_err(|e| UploadError::Storage {
                message: e.to_string(),
            })?;

        Ok(ImageRef {
            file_name: image.file_name.clone(),
            url: format!("/uploads/{}", stored),
        })
    }

    async fn remove(&self, image: &ImageRef) -> Result<(), UploadError> {
        let Some(path) = self.path_for(&image.url) else {
            return Ok(());
        };
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UploadError::Storage {
                message: e.to_string(),
            }),
        }
    }
}

/// Persist a batch of accepted images, rolling back already-saved files if a
/// later one fails
pub async fn save_all(
    store: &dyn FileStore,
    images: &[ImageFile],
) -> Result<Vec<ImageRef>, UploadError> {
    let mut refs = Vec::with_capacity(images.len());
    for image in images {
        match store.save(image).await {
            Ok(stored) => refs.push(stored),
            Err(e) => {
                remove_all(store, &refs).await;
                return Err(e);
            }
        }
    }
    Ok(refs)
}

/// Best-effort compensating delete of stored files
pub async fn remove_all(store: &dyn FileStore, refs: &[ImageRef]) {
    for stored in refs {
        if let Err(e) = store.remove(stored).await {
            tracing::warn!("orphan cleanup failed for {}: {}", stored.url, e);
        }
    }
}
