mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{test_app, user};
use photovault::cancel::CancelToken;
use photovault::gallery::GalleryContainer;
use photovault::model::GalleryPatch;
use photovault::permissions::{can_view, Privacy, ViewOptions};
use photovault::services::MockGalleryService;

#[tokio::test]
async fn update_propagates_to_both_slots() {
    let (app, _session) = test_app();
    let cancel = CancelToken::new();
    app.galleries.fetch_galleries(&cancel).await;
    app.galleries.fetch_gallery(2, &cancel).await;
    app.galleries
        .update_gallery(2, GalleryPatch::rename("X"), &cancel)
        .await;

    let state = app.galleries.state();
    assert!(state.error.is_none());
    assert_eq!(state.current_gallery.as_ref().unwrap().name, "X");
    assert_eq!(state.gallery(2).unwrap().name, "X");
    assert_eq!(
        state.current_gallery.unwrap().photos.unwrap().len(),
        15,
        "embedded photos survive the merge"
    );
}

#[tokio::test]
async fn update_unknown_gallery_leaves_data_untouched() {
    let (app, _session) = test_app();
    let cancel = CancelToken::new();
    app.galleries.fetch_galleries(&cancel).await;
    let before = app.galleries.state();

    app.galleries
        .update_gallery(99, GalleryPatch::rename("X"), &cancel)
        .await;

    let after = app.galleries.state();
    assert_eq!(after.galleries, before.galleries);
    assert_eq!(after.error.as_deref(), Some("Gallery 99 not found"));
    assert!(!after.loading);
}

#[tokio::test]
async fn marking_gallery_private_hides_it_from_strangers() {
    let (app, _session) = test_app();
    let cancel = CancelToken::new();
    app.galleries.fetch_galleries(&cancel).await;
    app.galleries.fetch_gallery(1, &cancel).await;
    let stranger = user(99);
    let options = ViewOptions::default();
    assert!(can_view(
        app.galleries.state().gallery(1),
        Some(&stranger),
        &options
    ));

    let patch = GalleryPatch {
        is_private: Some(true),
        ..GalleryPatch::default()
    };
    app.galleries.update_gallery(1, patch, &cancel).await;

    let state = app.galleries.state();
    assert!(state.error.is_none());
    assert_eq!(state.gallery(1).unwrap().privacy, Some(Privacy::Private));
    assert!(!can_view(state.gallery(1), Some(&stranger), &options));
    assert!(!can_view(
        state.current_gallery.as_ref(),
        Some(&stranger),
        &options
    ));
}

#[tokio::test]
async fn delete_removes_entry_and_current() {
    let (app, _session) = test_app();
    let cancel = CancelToken::new();
    app.galleries.fetch_galleries(&cancel).await;
    app.galleries.fetch_gallery(1, &cancel).await;
    app.galleries.delete_gallery(1, &cancel).await;

    let state = app.galleries.state();
    assert!(state.current_gallery.is_none());
    assert!(state.gallery(1).is_none());
    assert_eq!(state.galleries.len(), 2);

    app.galleries.delete_gallery(1, &cancel).await;
    assert_eq!(
        app.galleries.state().error.as_deref(),
        Some("Gallery 1 not found")
    );
}

#[test]
fn repeated_selection_is_deduplicated() {
    let (app, _session) = test_app();
    app.galleries.select_photo(7);
    app.galleries.select_photo(7);
    assert_eq!(app.galleries.state().selected_photos, vec![7]);

    app.galleries.deselect_photo(7);
    assert!(app.galleries.state().selected_photos.is_empty());
}

#[test]
fn selection_keeps_insertion_order() {
    let (app, _session) = test_app();
    for id in [5, 2, 9, 2] {
        app.galleries.select_photo(id);
    }
    assert_eq!(app.galleries.state().selected_photos, vec![5, 2, 9]);
}

#[test]
fn clear_selection_is_idempotent() {
    let (app, _session) = test_app();
    app.galleries.select_photo(1);
    app.galleries.clear_selection();
    assert!(app.galleries.state().selected_photos.is_empty());
    app.galleries.clear_selection();
    assert!(app.galleries.state().selected_photos.is_empty());
}

#[tokio::test]
async fn remove_selected_photos_updates_counts() {
    let (app, _session) = test_app();
    let cancel = CancelToken::new();
    app.galleries.fetch_galleries(&cancel).await;
    app.galleries.fetch_gallery(3, &cancel).await;
    app.galleries.select_photo(200);
    app.galleries.select_photo(201);
    app.galleries.remove_selected_photos(&cancel).await;

    let state = app.galleries.state();
    assert!(state.selected_photos.is_empty());
    assert_eq!(state.gallery(3).unwrap().photo_count, 30);
    let current = state.current_gallery.unwrap();
    assert_eq!(current.photo_count, 30);
    assert!(current.photos.unwrap().iter().all(|p| p.id >= 202));
}

#[tokio::test]
async fn privacy_batch_survives_refetch() {
    let (app, _session) = test_app();
    let cancel = CancelToken::new();
    app.galleries.fetch_gallery(1, &cancel).await;
    app.galleries.select_photo(1);
    app.galleries
        .update_selected_privacy(Privacy::Unlisted, &cancel)
        .await;

    app.galleries.fetch_gallery(1, &cancel).await;
    let photos = app.galleries.state().current_gallery.unwrap().photos.unwrap();
    assert_eq!(photos[0].privacy, Some(Privacy::Unlisted));
}

#[tokio::test]
async fn empty_selection_batch_is_noop() {
    let (app, _session) = test_app();
    let before = app.galleries.state();
    app.galleries
        .update_selected_privacy(Privacy::Public, &CancelToken::new())
        .await;
    app.galleries
        .remove_selected_photos(&CancelToken::new())
        .await;
    assert_eq!(app.galleries.state(), before);
}

#[tokio::test(start_paused = true)]
async fn loading_tracks_latest_request() {
    let galleries = GalleryContainer::new(Arc::new(MockGalleryService::new(
        Duration::from_millis(1000),
    )));
    let cancel = CancelToken::new();
    let mut updates = galleries.subscribe();

    let (_, observed) = tokio::join!(galleries.fetch_galleries(&cancel), async {
        updates.changed().await.unwrap();
        updates.borrow_and_update().loading
    });

    assert!(observed, "subscribers see the loading state");
    let state = galleries.state();
    assert!(!state.loading);
    assert_eq!(state.galleries.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn stale_fetch_does_not_clobber_newer_one() {
    let galleries = GalleryContainer::new(Arc::new(MockGalleryService::new(
        Duration::from_millis(1000),
    )));
    let cancel = CancelToken::new();

    tokio::join!(galleries.fetch_gallery(1, &cancel), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        galleries.fetch_gallery(2, &cancel).await;
    });

    let state = galleries.state();
    assert_eq!(state.current_gallery.unwrap().id, 2);
    assert!(!state.loading);
}
