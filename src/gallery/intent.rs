use crate::model::{Gallery, GalleryId, GalleryPatch, Photo, PhotoId};
use crate::mvi::Intent;
use crate::permissions::Privacy;
use crate::services::ShareResult;

/// Transitions of the gallery container.
///
/// Fetch results carrying a superseded request tag are dropped. Mutation
/// results always land, since the backend has already applied them; only
/// the latest request clears `loading`.
#[derive(Debug, Clone)]
pub enum GalleryIntent {
    RequestStarted { request: u64 },
    GalleriesLoaded { request: u64, galleries: Vec<Gallery> },
    GalleryLoaded { request: u64, gallery: Gallery },
    GalleryCreated { request: u64, gallery: Gallery },
    GalleryUpdated {
        request: u64,
        id: GalleryId,
        patch: GalleryPatch,
    },
    GalleryDeleted { request: u64, id: GalleryId },
    PhotosAdded {
        request: u64,
        gallery_id: GalleryId,
        photos: Vec<Photo>,
    },
    PhotosRemoved {
        request: u64,
        gallery_id: GalleryId,
        photo_ids: Vec<PhotoId>,
        removed: usize,
    },
    PhotosPrivacyChanged {
        request: u64,
        photo_ids: Vec<PhotoId>,
        privacy: Privacy,
    },
    GalleryShared { request: u64, share: ShareResult },
    RequestFailed { request: u64, message: String },
    /// Cancelled before a result arrived.
    RequestSettled { request: u64 },
    PhotoSelected { id: PhotoId },
    PhotoDeselected { id: PhotoId },
    SelectionCleared,
    ClearError,
}

impl Intent for GalleryIntent {}
