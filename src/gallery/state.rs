use crate::model::{Gallery, GalleryId, PhotoId};
use crate::mvi::UiState;
use crate::services::ShareResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryState {
    /// Summaries, in the order the service returned them.
    pub galleries: Vec<Gallery>,
    /// Detail view of one gallery, with photos embedded. Kept in sync with
    /// the matching summary in `galleries`.
    pub current_gallery: Option<Gallery>,
    /// Insertion-ordered, no duplicates.
    pub selected_photos: Vec<PhotoId>,
    pub loading: bool,
    pub error: Option<String>,
    /// Tag of the most recent request.
    pub latest_request: u64,
    pub last_share: Option<ShareResult>,
}

impl UiState for GalleryState {}

impl GalleryState {
    pub fn gallery(&self, id: GalleryId) -> Option<&Gallery> {
        self.galleries.iter().find(|g| g.id == id)
    }

    pub fn is_selected(&self, id: PhotoId) -> bool {
        self.selected_photos.contains(&id)
    }

    pub(super) fn accepts(&self, request: u64) -> bool {
        self.latest_request == request
    }

    /// Clear `loading` if `request` is still the latest one.
    pub(super) fn settle(self, request: u64) -> Self {
        let loading = self.loading && !self.accepts(request);
        Self { loading, ..self }
    }

    /// Apply `f` to the gallery with `id` in both slots.
    pub(super) fn update_both(mut self, id: GalleryId, mut f: impl FnMut(&mut Gallery)) -> Self {
        if let Some(summary) = self.galleries.iter_mut().find(|g| g.id == id) {
            f(summary);
        }
        if let Some(current) = self.current_gallery.as_mut().filter(|g| g.id == id) {
            f(current);
        }
        self
    }
}
