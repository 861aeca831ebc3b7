use std::sync::Arc;

use tokio::sync::watch;

use crate::cancel::CancelToken;
use crate::error::VaultError;
use crate::gallery::intent::GalleryIntent;
use crate::gallery::reducer::GalleryReducer;
use crate::gallery::state::GalleryState;
use crate::model::{GalleryId, GalleryPatch, NewGallery, PhotoId, UserId};
use crate::mvi::{RequestCounter, Store};
use crate::permissions::Privacy;
use crate::services::{GalleryService, ShareSettings, UploadedPhoto};

/// Gallery state container.
///
/// Every asynchronous operation marks the state as loading, calls the gallery
/// service and settles with either the result or an error message. Prior data
/// is never partially overwritten on failure.
#[derive(Clone)]
pub struct GalleryContainer {
    store: Store<GalleryReducer>,
    service: Arc<dyn GalleryService>,
    requests: RequestCounter,
}

impl GalleryContainer {
    pub fn new(service: Arc<dyn GalleryService>) -> Self {
        Self {
            store: Store::default(),
            service,
            requests: RequestCounter::new(),
        }
    }

    pub fn state(&self) -> GalleryState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<GalleryState> {
        self.store.subscribe()
    }

    pub async fn fetch_galleries(&self, cancel: &CancelToken) {
        let request = self.begin();
        match self.service.list(cancel).await {
            Ok(galleries) => {
                tracing::debug!(request, count = galleries.len(), "Galleries loaded");
                self.store
                    .dispatch(GalleryIntent::GalleriesLoaded { request, galleries });
            }
            Err(e) => self.settle_failure(request, e),
        }
    }

    pub async fn fetch_gallery(&self, id: GalleryId, cancel: &CancelToken) {
        let request = self.begin();
        match self.service.get(id, cancel).await {
            Ok(gallery) => {
                tracing::debug!(request, gallery_id = id, "Gallery loaded");
                self.store
                    .dispatch(GalleryIntent::GalleryLoaded { request, gallery });
            }
            Err(e) => self.settle_failure(request, e),
        }
    }

    pub async fn create_gallery(&self, data: NewGallery, cancel: &CancelToken) {
        let request = self.begin();
        match self.service.create(&data, cancel).await {
            Ok(gallery) => {
                tracing::info!(gallery_id = gallery.id, name = %gallery.name, "Gallery created");
                self.store
                    .dispatch(GalleryIntent::GalleryCreated { request, gallery });
            }
            Err(e) => self.settle_failure(request, e),
        }
    }

    /// Fails with not-found, leaving state untouched, if `id` is not in the
    /// loaded gallery sequence.
    pub async fn update_gallery(&self, id: GalleryId, patch: GalleryPatch, cancel: &CancelToken) {
        let request = self.begin();
        if self.store.read(|s| s.gallery(id).is_none()) {
            self.settle_failure(request, not_found(id));
            return;
        }

        match self.service.update(id, &patch, cancel).await {
            Ok(_) => {
                tracing::info!(gallery_id = id, "Gallery updated");
                self.store
                    .dispatch(GalleryIntent::GalleryUpdated { request, id, patch });
            }
            Err(e) => self.settle_failure(request, e),
        }
    }

    pub async fn delete_gallery(&self, id: GalleryId, cancel: &CancelToken) {
        let request = self.begin();
        match self.service.delete(id, cancel).await {
            Ok(()) => {
                tracing::info!(gallery_id = id, "Gallery deleted");
                self.store
                    .dispatch(GalleryIntent::GalleryDeleted { request, id });
            }
            Err(e) => self.settle_failure(request, e),
        }
    }

    /// Selecting an id that is already selected is a no-op.
    pub fn select_photo(&self, id: PhotoId) {
        self.store.dispatch(GalleryIntent::PhotoSelected { id });
    }

    pub fn deselect_photo(&self, id: PhotoId) {
        self.store.dispatch(GalleryIntent::PhotoDeselected { id });
    }

    pub fn clear_selection(&self) {
        self.store.dispatch(GalleryIntent::SelectionCleared);
    }

    pub fn clear_error(&self) {
        self.store.dispatch(GalleryIntent::ClearError);
    }

    /// Set `privacy` on every selected photo. Clears the selection on success.
    pub async fn update_selected_privacy(&self, privacy: Privacy, cancel: &CancelToken) {
        let photo_ids = self.store.read(|s| s.selected_photos.clone());
        if photo_ids.is_empty() {
            return;
        }

        let request = self.begin();
        match self
            .service
            .update_photos_privacy(&photo_ids, privacy, cancel)
            .await
        {
            Ok(updated) => {
                tracing::info!(updated, privacy = %privacy, "Photo privacy updated");
                self.store.dispatch(GalleryIntent::PhotosPrivacyChanged {
                    request,
                    photo_ids,
                    privacy,
                });
            }
            Err(e) => self.settle_failure(request, e),
        }
    }

    /// Remove the selected photos from the current gallery. Clears the
    /// selection on success.
    pub async fn remove_selected_photos(&self, cancel: &CancelToken) {
        let (gallery_id, photo_ids) = self.store.read(|s| {
            (
                s.current_gallery.as_ref().map(|g| g.id),
                s.selected_photos.clone(),
            )
        });
        if photo_ids.is_empty() {
            return;
        }

        let request = self.begin();
        let Some(gallery_id) = gallery_id else {
            self.settle_failure(request, VaultError::Validation { field: "gallery" });
            return;
        };

        match self
            .service
            .remove_photos(gallery_id, &photo_ids, cancel)
            .await
        {
            Ok(removed) => {
                tracing::info!(gallery_id, removed, "Photos removed");
                self.store.dispatch(GalleryIntent::PhotosRemoved {
                    request,
                    gallery_id,
                    photo_ids,
                    removed,
                });
            }
            Err(e) => self.settle_failure(request, e),
        }
    }

    /// Create a share link for `id`. The result is kept as `last_share`.
    pub async fn share_gallery(&self, id: GalleryId, settings: ShareSettings, cancel: &CancelToken) {
        let request = self.begin();
        match self.service.share_gallery(id, &settings, cancel).await {
            Ok(share) => {
                tracing::info!(gallery_id = id, url = %share.url, "Gallery shared");
                self.store
                    .dispatch(GalleryIntent::GalleryShared { request, share });
            }
            Err(e) => self.settle_failure(request, e),
        }
    }

    /// Attach freshly uploaded photos to `gallery_id`.
    pub async fn add_uploaded_photos(
        &self,
        gallery_id: GalleryId,
        uploads: &[UploadedPhoto],
        owner: Option<UserId>,
        cancel: &CancelToken,
    ) {
        if uploads.is_empty() {
            return;
        }

        let photos: Vec<_> = uploads.iter().map(|u| u.to_photo(owner)).collect();
        let request = self.begin();
        match self.service.add_photos(gallery_id, &photos, cancel).await {
            Ok(result) => {
                tracing::info!(gallery_id, added = result.added_count, "Photos added");
                self.store.dispatch(GalleryIntent::PhotosAdded {
                    request,
                    gallery_id,
                    photos,
                });
            }
            Err(e) => self.settle_failure(request, e),
        }
    }

    fn begin(&self) -> u64 {
        let request = self.requests.next();
        self.store.dispatch(GalleryIntent::RequestStarted { request });
        request
    }

    fn settle_failure(&self, request: u64, error: VaultError) {
        if error.is_cancelled() {
            tracing::debug!(request, "Gallery request cancelled");
            self.store.dispatch(GalleryIntent::RequestSettled { request });
            return;
        }
        tracing::warn!(request, error = %error, kind = error.kind(), "Gallery request failed");
        self.store.dispatch(GalleryIntent::RequestFailed {
            request,
            message: error.to_string(),
        });
    }
}

fn not_found(id: GalleryId) -> VaultError {
    VaultError::NotFound {
        entity: "Gallery",
        id,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::services::MockGalleryService;

    fn container() -> GalleryContainer {
        GalleryContainer::new(Arc::new(MockGalleryService::new(Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_fetch_galleries_replaces_sequence() {
        let galleries = container();
        galleries.fetch_galleries(&CancelToken::new()).await;
        let state = galleries.state();
        assert_eq!(state.galleries.len(), 3);
        assert!(!state.loading);
        assert!(state.current_gallery.is_none());
    }

    #[tokio::test]
    async fn test_fetch_missing_gallery_sets_error() {
        let galleries = container();
        galleries.fetch_gallery(42, &CancelToken::new()).await;
        let state = galleries.state();
        assert_eq!(state.error.as_deref(), Some("Gallery 42 not found"));
        assert!(state.current_gallery.is_none());

        galleries.clear_error();
        assert!(galleries.state().error.is_none());
    }

    #[tokio::test]
    async fn test_create_appends_summary() {
        let galleries = container();
        let cancel = CancelToken::new();
        galleries.fetch_galleries(&cancel).await;
        galleries
            .create_gallery(
                NewGallery {
                    name: "Trips".into(),
                    owner_id: Some(1),
                    ..NewGallery::default()
                },
                &cancel,
            )
            .await;
        let state = galleries.state();
        let created = state.galleries.last().unwrap();
        assert_eq!(created.name, "Trips");
        assert_eq!(created.photo_count, 0);
        assert_eq!(state.galleries.len(), 4);
    }

    #[tokio::test]
    async fn test_cancelled_fetch_settles_without_error() {
        let galleries = container();
        let cancel = CancelToken::new();
        cancel.cancel();
        galleries.fetch_galleries(&cancel).await;
        let state = galleries.state();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.galleries.is_empty());
    }

    #[tokio::test]
    async fn test_update_selected_privacy_clears_selection() {
        let galleries = container();
        let cancel = CancelToken::new();
        galleries.fetch_gallery(1, &cancel).await;
        galleries.select_photo(2);
        galleries.select_photo(3);
        galleries
            .update_selected_privacy(Privacy::Shared, &cancel)
            .await;

        let state = galleries.state();
        assert!(state.selected_photos.is_empty());
        let photos = state.current_gallery.unwrap().photos.unwrap();
        assert_eq!(photos[1].privacy, Some(Privacy::Shared));
        assert_eq!(photos[2].privacy, Some(Privacy::Shared));
        assert_eq!(photos[3].privacy, Some(Privacy::Private));
    }

    #[tokio::test]
    async fn test_remove_selected_without_gallery_fails() {
        let galleries = container();
        galleries.select_photo(1);
        galleries.remove_selected_photos(&CancelToken::new()).await;
        let state = galleries.state();
        assert_eq!(state.error.as_deref(), Some("gallery is required"));
        assert_eq!(state.selected_photos, vec![1]);
    }

    #[tokio::test]
    async fn test_share_records_last_share() {
        let galleries = container();
        let cancel = CancelToken::new();
        galleries.fetch_galleries(&cancel).await;
        galleries
            .share_gallery(
                1,
                ShareSettings {
                    expires_in: Some(3600),
                    recipients: vec![7],
                },
                &cancel,
            )
            .await;

        let state = galleries.state();
        let share = state.last_share.as_ref().unwrap();
        assert_eq!(share.gallery_id, 1);
        assert!(share.url.ends_with("/1"));
        assert!(share.link.expires_at.is_some());
        assert_eq!(state.gallery(1).unwrap().shared_with, vec![7]);
    }
}
