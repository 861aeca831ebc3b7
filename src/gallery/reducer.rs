use crate::gallery::intent::GalleryIntent;
use crate::gallery::state::GalleryState;
use crate::mvi::Reducer;

pub struct GalleryReducer;

impl Reducer for GalleryReducer {
    type State = GalleryState;
    type Intent = GalleryIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            GalleryIntent::RequestStarted { request } => GalleryState {
                loading: true,
                latest_request: request,
                ..state
            },
            GalleryIntent::GalleriesLoaded { request, galleries } if state.accepts(request) => {
                GalleryState {
                    galleries,
                    ..state.settle(request)
                }
            }
            GalleryIntent::GalleryLoaded { request, gallery } if state.accepts(request) => {
                // Selection refers to the photos of the gallery being replaced
                let same_gallery = state.current_gallery.as_ref().map(|g| g.id) == Some(gallery.id);
                let selected_photos = if same_gallery {
                    state.selected_photos.clone()
                } else {
                    Vec::new()
                };
                GalleryState {
                    current_gallery: Some(gallery),
                    selected_photos,
                    ..state.settle(request)
                }
            }
            GalleryIntent::GalleryCreated { request, gallery } => {
                let mut state = state.settle(request);
                state.galleries.push(gallery.summary());
                state
            }
            GalleryIntent::GalleryUpdated { request, id, patch } => state
                .settle(request)
                .update_both(id, |g| g.apply_patch(&patch)),
            GalleryIntent::GalleryDeleted { request, id } => {
                let mut state = state.settle(request);
                state.galleries.retain(|g| g.id != id);
                if state.current_gallery.as_ref().is_some_and(|g| g.id == id) {
                    state.current_gallery = None;
                    state.selected_photos.clear();
                }
                state
            }
            GalleryIntent::PhotosAdded {
                request,
                gallery_id,
                photos,
            } => state.settle(request).update_both(gallery_id, |g| {
                g.add_to_photo_count(photos.len());
                if let Some(embedded) = g.photos.as_mut() {
                    embedded.extend(photos.iter().cloned());
                }
            }),
            GalleryIntent::PhotosRemoved {
                request,
                gallery_id,
                photo_ids,
                removed,
            } => {
                let mut state = state.settle(request).update_both(gallery_id, |g| {
                    g.remove_from_photo_count(removed);
                    if let Some(embedded) = g.photos.as_mut() {
                        embedded.retain(|p| !photo_ids.contains(&p.id));
                    }
                });
                state.selected_photos.retain(|id| !photo_ids.contains(id));
                state
            }
            GalleryIntent::PhotosPrivacyChanged {
                request,
                photo_ids,
                privacy,
            } => {
                let mut state = state.settle(request);
                if let Some(photos) = state.current_gallery.as_mut().and_then(|g| g.photos.as_mut())
                {
                    for photo in photos.iter_mut().filter(|p| photo_ids.contains(&p.id)) {
                        photo.privacy = Some(privacy);
                    }
                }
                state.selected_photos.retain(|id| !photo_ids.contains(id));
                state
            }
            GalleryIntent::GalleryShared { request, share } => {
                let recipients = share.recipients.clone();
                let state = state.settle(request).update_both(share.gallery_id, |g| {
                    for recipient in &recipients {
                        if !g.shared_with.contains(recipient) {
                            g.shared_with.push(*recipient);
                        }
                    }
                });
                GalleryState {
                    last_share: Some(share),
                    ..state
                }
            }
            GalleryIntent::RequestFailed { request, message } => GalleryState {
                error: Some(message),
                ..state.settle(request)
            },
            GalleryIntent::RequestSettled { request } => state.settle(request),
            GalleryIntent::PhotoSelected { id } if !state.is_selected(id) => {
                let mut state = state;
                state.selected_photos.push(id);
                state
            }
            GalleryIntent::PhotoDeselected { id } => {
                let mut state = state;
                state.selected_photos.retain(|selected| *selected != id);
                state
            }
            GalleryIntent::SelectionCleared => GalleryState {
                selected_photos: Vec::new(),
                ..state
            },
            GalleryIntent::ClearError => GalleryState {
                error: None,
                ..state
            },
            // Stale fetch result, or a photo that is already selected
            _ => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gallery, GalleryPatch};
    use crate::services::demo_galleries;

    fn loaded() -> GalleryState {
        let galleries: Vec<Gallery> = demo_galleries().iter().map(Gallery::summary).collect();
        let current = demo_galleries().into_iter().find(|g| g.id == 1);
        GalleryState {
            galleries,
            current_gallery: current,
            ..GalleryState::default()
        }
    }

    fn started(state: GalleryState, request: u64) -> GalleryState {
        GalleryReducer::reduce(state, GalleryIntent::RequestStarted { request })
    }

    #[test]
    fn test_stale_fetch_is_dropped() {
        let state = started(started(GalleryState::default(), 1), 2);
        let state = GalleryReducer::reduce(
            state,
            GalleryIntent::GalleriesLoaded {
                request: 1,
                galleries: demo_galleries(),
            },
        );
        assert!(state.galleries.is_empty());
        assert!(state.loading);

        let state = GalleryReducer::reduce(
            state,
            GalleryIntent::GalleriesLoaded {
                request: 2,
                galleries: demo_galleries(),
            },
        );
        assert_eq!(state.galleries.len(), 3);
        assert!(!state.loading);
    }

    #[test]
    fn test_superseded_mutation_still_lands() {
        let state = started(started(loaded(), 1), 2);
        let state = GalleryReducer::reduce(
            state,
            GalleryIntent::GalleryUpdated {
                request: 1,
                id: 1,
                patch: GalleryPatch::rename("Trip"),
            },
        );
        assert_eq!(state.gallery(1).unwrap().name, "Trip");
        assert_eq!(state.current_gallery.as_ref().unwrap().name, "Trip");
        assert!(state.loading);
    }

    #[test]
    fn test_update_keeps_embedded_photos() {
        let state = GalleryReducer::reduce(
            loaded(),
            GalleryIntent::GalleryUpdated {
                request: 0,
                id: 1,
                patch: GalleryPatch::rename("Trip"),
            },
        );
        let current = state.current_gallery.unwrap();
        assert_eq!(current.photos.unwrap().len(), 24);
        assert!(state.galleries[0].photos.is_none());
    }

    #[test]
    fn test_delete_current_gallery_clears_slot() {
        let mut state = loaded();
        state.selected_photos = vec![1, 2];
        let state = GalleryReducer::reduce(state, GalleryIntent::GalleryDeleted { request: 0, id: 1 });
        assert!(state.current_gallery.is_none());
        assert!(state.selected_photos.is_empty());
        assert_eq!(state.galleries.len(), 2);
    }

    #[test]
    fn test_delete_other_gallery_keeps_current() {
        let state = GalleryReducer::reduce(loaded(), GalleryIntent::GalleryDeleted { request: 0, id: 3 });
        assert_eq!(state.current_gallery.unwrap().id, 1);
        assert_eq!(state.galleries.len(), 2);
    }

    #[test]
    fn test_selection_is_unique() {
        let state = GalleryReducer::reduce(GalleryState::default(), GalleryIntent::PhotoSelected { id: 7 });
        let state = GalleryReducer::reduce(state, GalleryIntent::PhotoSelected { id: 7 });
        assert_eq!(state.selected_photos, vec![7]);
        let state = GalleryReducer::reduce(state, GalleryIntent::PhotoDeselected { id: 7 });
        assert!(state.selected_photos.is_empty());
    }

    #[test]
    fn test_loading_another_gallery_resets_selection() {
        let mut state = started(loaded(), 1);
        state.selected_photos = vec![3];
        let other = demo_galleries().into_iter().find(|g| g.id == 2).unwrap();
        let state = GalleryReducer::reduce(state, GalleryIntent::GalleryLoaded { request: 1, gallery: other });
        assert!(state.selected_photos.is_empty());
        assert_eq!(state.current_gallery.unwrap().id, 2);
    }

    #[test]
    fn test_photos_removed_adjusts_both_counts() {
        let mut state = loaded();
        state.selected_photos = vec![1, 2, 5];
        let state = GalleryReducer::reduce(
            state,
            GalleryIntent::PhotosRemoved {
                request: 0,
                gallery_id: 1,
                photo_ids: vec![1, 2],
                removed: 2,
            },
        );
        assert_eq!(state.gallery(1).unwrap().photo_count, 22);
        let current = state.current_gallery.unwrap();
        assert_eq!(current.photo_count, 22);
        assert_eq!(current.photos.unwrap().len(), 22);
        assert_eq!(state.selected_photos, vec![5]);
    }

    #[test]
    fn test_failure_keeps_data() {
        let before = started(loaded(), 4);
        let state = GalleryReducer::reduce(
            before.clone(),
            GalleryIntent::RequestFailed {
                request: 4,
                message: "Gallery 9 not found".into(),
            },
        );
        assert_eq!(state.galleries, before.galleries);
        assert_eq!(state.current_gallery, before.current_gallery);
        assert_eq!(state.error.as_deref(), Some("Gallery 9 not found"));
        assert!(!state.loading);
    }
}
