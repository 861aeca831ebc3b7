use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::fixtures::demo_galleries;
use super::simulate_latency;
use crate::cancel::CancelToken;
use crate::error::VaultError;
use crate::model::{Gallery, GalleryId, GalleryPatch, NewGallery, Photo, PhotoId, PhotoPatch, UserId};
use crate::permissions::{Privacy, ShareLink};

const SHARE_BASE_URL: &str = "https://photovault.example.com/shared/gallery";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareSettings {
    /// Seconds until the link expires. `None` never expires.
    pub expires_in: Option<u64>,
    pub recipients: Vec<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareResult {
    pub gallery_id: GalleryId,
    pub url: String,
    pub link: ShareLink,
    pub recipients: Vec<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddPhotosResult {
    pub gallery_id: GalleryId,
    pub added_count: usize,
}

/// Remote gallery operations.
#[async_trait]
pub trait GalleryService: Send + Sync {
    /// Gallery summaries, without photos.
    async fn list(&self, cancel: &CancelToken) -> Result<Vec<Gallery>, VaultError>;

    /// One gallery with its photos embedded.
    async fn get(&self, id: GalleryId, cancel: &CancelToken) -> Result<Gallery, VaultError>;

    async fn create(&self, data: &NewGallery, cancel: &CancelToken)
        -> Result<Gallery, VaultError>;

    async fn update(
        &self,
        id: GalleryId,
        patch: &GalleryPatch,
        cancel: &CancelToken,
    ) -> Result<Gallery, VaultError>;

    async fn delete(&self, id: GalleryId, cancel: &CancelToken) -> Result<(), VaultError>;

    async fn add_photos(
        &self,
        gallery_id: GalleryId,
        photos: &[Photo],
        cancel: &CancelToken,
    ) -> Result<AddPhotosResult, VaultError>;

    /// Returns how many photos were removed.
    async fn remove_photos(
        &self,
        gallery_id: GalleryId,
        photo_ids: &[PhotoId],
        cancel: &CancelToken,
    ) -> Result<usize, VaultError>;

    async fn update_photo(
        &self,
        photo_id: PhotoId,
        patch: &PhotoPatch,
        cancel: &CancelToken,
    ) -> Result<Photo, VaultError>;

    /// Returns how many photos were updated.
    async fn update_photos_privacy(
        &self,
        photo_ids: &[PhotoId],
        privacy: Privacy,
        cancel: &CancelToken,
    ) -> Result<usize, VaultError>;

    async fn share_gallery(
        &self,
        id: GalleryId,
        settings: &ShareSettings,
        cancel: &CancelToken,
    ) -> Result<ShareResult, VaultError>;
}

/// In-memory gallery backend seeded with the demo fixtures.
pub struct MockGalleryService {
    latency: Duration,
    galleries: Mutex<Vec<Gallery>>,
    last_id: AtomicU64,
}

impl MockGalleryService {
    pub fn new(latency: Duration) -> Self {
        Self::with_galleries(latency, demo_galleries())
    }

    pub fn with_galleries(latency: Duration, galleries: Vec<Gallery>) -> Self {
        Self {
            latency,
            galleries: Mutex::new(galleries),
            last_id: AtomicU64::new(0),
        }
    }

    /// Timestamp-based id, bumped when two creations land in the same millisecond.
    fn next_id(&self) -> GalleryId {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let prev = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(prev + 1)
    }

    fn not_found(id: GalleryId) -> VaultError {
        VaultError::NotFound {
            entity: "Gallery",
            id,
        }
    }
}

#[async_trait]
impl GalleryService for MockGalleryService {
    async fn list(&self, cancel: &CancelToken) -> Result<Vec<Gallery>, VaultError> {
        simulate_latency(self.latency, cancel).await?;
        Ok(self.galleries.lock().iter().map(Gallery::summary).collect())
    }

    async fn get(&self, id: GalleryId, cancel: &CancelToken) -> Result<Gallery, VaultError> {
        simulate_latency(self.latency, cancel).await?;
        let galleries = self.galleries.lock();
        let gallery = galleries
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        let mut detail = gallery.clone();
        detail.photos.get_or_insert_with(Vec::new);
        Ok(detail)
    }

    async fn create(
        &self,
        data: &NewGallery,
        cancel: &CancelToken,
    ) -> Result<Gallery, VaultError> {
        simulate_latency(self.latency, cancel).await?;
        if data.name.trim().is_empty() {
            return Err(VaultError::Validation { field: "name" });
        }

        let gallery = Gallery {
            id: self.next_id(),
            name: data.name.clone(),
            description: data.description.clone(),
            cover_image: data.cover_image.clone().unwrap_or_default(),
            photo_count: 0,
            is_private: data.is_private,
            privacy: Some(if data.is_private {
                Privacy::Private
            } else {
                Privacy::Public
            }),
            owner_id: data.owner_id,
            shared_with: Vec::new(),
            created_at: Utc::now(),
            photos: None,
        };
        self.galleries.lock().push(Gallery {
            photos: Some(Vec::new()),
            ..gallery.clone()
        });
        Ok(gallery)
    }

    async fn update(
        &self,
        id: GalleryId,
        patch: &GalleryPatch,
        cancel: &CancelToken,
    ) -> Result<Gallery, VaultError> {
        simulate_latency(self.latency, cancel).await?;
        let mut galleries = self.galleries.lock();
        let gallery = galleries
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        gallery.apply_patch(patch);
        Ok(gallery.summary())
    }

    async fn delete(&self, id: GalleryId, cancel: &CancelToken) -> Result<(), VaultError> {
        simulate_latency(self.latency, cancel).await?;
        let mut galleries = self.galleries.lock();
        let before = galleries.len();
        galleries.retain(|g| g.id != id);
        if galleries.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn add_photos(
        &self,
        gallery_id: GalleryId,
        photos: &[Photo],
        cancel: &CancelToken,
    ) -> Result<AddPhotosResult, VaultError> {
        simulate_latency(self.latency * 3 / 2, cancel).await?;
        let mut galleries = self.galleries.lock();
        let gallery = galleries
            .iter_mut()
            .find(|g| g.id == gallery_id)
            .ok_or_else(|| Self::not_found(gallery_id))?;
        gallery
            .photos
            .get_or_insert_with(Vec::new)
            .extend(photos.iter().cloned());
        gallery.add_to_photo_count(photos.len());
        Ok(AddPhotosResult {
            gallery_id,
            added_count: photos.len(),
        })
    }

    async fn remove_photos(
        &self,
        gallery_id: GalleryId,
        photo_ids: &[PhotoId],
        cancel: &CancelToken,
    ) -> Result<usize, VaultError> {
        simulate_latency(self.latency, cancel).await?;
        let mut galleries = self.galleries.lock();
        let gallery = galleries
            .iter_mut()
            .find(|g| g.id == gallery_id)
            .ok_or_else(|| Self::not_found(gallery_id))?;
        let photos = gallery.photos.get_or_insert_with(Vec::new);
        let before = photos.len();
        photos.retain(|p| !photo_ids.contains(&p.id));
        let removed = before - photos.len();
        gallery.remove_from_photo_count(removed);
        Ok(removed)
    }

    async fn update_photo(
        &self,
        photo_id: PhotoId,
        patch: &PhotoPatch,
        cancel: &CancelToken,
    ) -> Result<Photo, VaultError> {
        simulate_latency(self.latency * 4 / 5, cancel).await?;
        let mut galleries = self.galleries.lock();
        let photo = galleries
            .iter_mut()
            .filter_map(|g| g.photos.as_mut())
            .flatten()
            .find(|p| p.id == photo_id)
            .ok_or(VaultError::NotFound {
                entity: "Photo",
                id: photo_id,
            })?;
        photo.apply_patch(patch);
        Ok(photo.clone())
    }

    async fn update_photos_privacy(
        &self,
        photo_ids: &[PhotoId],
        privacy: Privacy,
        cancel: &CancelToken,
    ) -> Result<usize, VaultError> {
        simulate_latency(self.latency * 4 / 5, cancel).await?;
        let mut galleries = self.galleries.lock();
        let mut updated = 0;
        for photo in galleries
            .iter_mut()
            .filter_map(|g| g.photos.as_mut())
            .flatten()
            .filter(|p| photo_ids.contains(&p.id))
        {
            photo.privacy = Some(privacy);
            updated += 1;
        }
        Ok(updated)
    }

    async fn share_gallery(
        &self,
        id: GalleryId,
        settings: &ShareSettings,
        cancel: &CancelToken,
    ) -> Result<ShareResult, VaultError> {
        simulate_latency(self.latency * 6 / 5, cancel).await?;
        let mut galleries = self.galleries.lock();
        let gallery = galleries
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        for recipient in &settings.recipients {
            if !gallery.shared_with.contains(recipient) {
                gallery.shared_with.push(*recipient);
            }
        }

        Ok(ShareResult {
            gallery_id: id,
            url: format!("{}/{}", SHARE_BASE_URL, id),
            link: ShareLink::new(settings.expires_in, Utc::now()),
            recipients: settings.recipients.clone(),
        })
    }
}
