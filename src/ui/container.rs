use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::config::UiConfig;
use crate::mvi::Store;
use crate::ui::intent::UiIntent;
use crate::ui::reducer::UiReducer;
use crate::ui::state::{
    ModalData, ModalKind, NewNotification, Notification, ShellState, Theme, ViewMode,
};

/// UI state container.
///
/// Every operation is a single transition except notifications, which also
/// own an expiry timer each.
#[derive(Clone)]
pub struct UiContainer {
    store: Store<UiReducer>,
    next_notification: Arc<AtomicU64>,
    timers: Arc<Mutex<HashMap<u64, AbortHandle>>>,
    default_duration_ms: u64,
}

impl UiContainer {
    /// Initial state from config. The sidebar starts open when the viewport
    /// is at least `sidebar_breakpoint` wide, or when the width is unknown.
    pub fn new(config: &UiConfig, viewport_width: Option<u16>) -> Self {
        let initial = ShellState {
            theme: config.theme,
            sidebar_open: viewport_width.map_or(true, |w| w >= config.sidebar_breakpoint),
            view_mode: config.view_mode,
            grid_columns: config.grid_columns,
            ..ShellState::default()
        };
        Self {
            store: Store::new(initial),
            next_notification: Arc::new(AtomicU64::new(0)),
            timers: Arc::new(Mutex::new(HashMap::new())),
            default_duration_ms: config.notification_duration_ms,
        }
    }

    pub fn state(&self) -> ShellState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ShellState> {
        self.store.subscribe()
    }

    pub fn toggle_theme(&self) {
        self.store.dispatch(UiIntent::ToggleTheme);
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store.dispatch(UiIntent::SetTheme(theme));
    }

    pub fn toggle_sidebar(&self) {
        self.store.dispatch(UiIntent::ToggleSidebar);
    }

    pub fn set_sidebar(&self, open: bool) {
        self.store.dispatch(UiIntent::SetSidebar(open));
    }

    pub fn set_view_mode(&self, mode: ViewMode) {
        self.store.dispatch(UiIntent::SetViewMode(mode));
    }

    pub fn set_grid_columns(&self, columns: u16) {
        self.store.dispatch(UiIntent::SetGridColumns(columns));
    }

    /// Queue a notification and return its id.
    ///
    /// Unless its duration is 0 it is removed automatically once the duration
    /// elapses. Auto-removal needs a tokio runtime; without one the
    /// notification stays until removed.
    pub fn add_notification(&self, request: NewNotification) -> u64 {
        let id = self.next_notification.fetch_add(1, Ordering::SeqCst) + 1;
        let notification = Notification {
            id,
            message: request.message,
            kind: request.kind.unwrap_or_default(),
            duration_ms: request.duration_ms.unwrap_or(self.default_duration_ms),
        };
        let duration_ms = notification.duration_ms;
        self.store.dispatch(UiIntent::AddNotification(notification));

        if duration_ms > 0 {
            self.schedule_expiry(id, Duration::from_millis(duration_ms));
        }
        id
    }

    /// Remove by id. Unknown ids are ignored.
    pub fn remove_notification(&self, id: u64) {
        if let Some(timer) = self.timers.lock().remove(&id) {
            timer.abort();
        }
        self.store.dispatch(UiIntent::RemoveNotification { id });
    }

    pub fn clear_notifications(&self) {
        for (_, timer) in self.timers.lock().drain() {
            timer.abort();
        }
        self.store.dispatch(UiIntent::ClearNotifications);
    }

    pub fn open_upload_modal(&self, data: Option<ModalData>) {
        self.open_modal(ModalKind::Upload, data);
    }

    pub fn close_upload_modal(&self) {
        self.close_modal(ModalKind::Upload);
    }

    pub fn open_edit_modal(&self, data: Option<ModalData>) {
        self.open_modal(ModalKind::Edit, data);
    }

    pub fn close_edit_modal(&self) {
        self.close_modal(ModalKind::Edit);
    }

    pub fn open_share_modal(&self, data: Option<ModalData>) {
        self.open_modal(ModalKind::Share, data);
    }

    pub fn close_share_modal(&self) {
        self.close_modal(ModalKind::Share);
    }

    pub fn open_modal(&self, kind: ModalKind, data: Option<ModalData>) {
        self.store.dispatch(UiIntent::OpenModal { kind, data });
    }

    pub fn close_modal(&self, kind: ModalKind) {
        self.store.dispatch(UiIntent::CloseModal { kind });
    }

    /// Number of expiry timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.lock().len()
    }

    fn schedule_expiry(&self, id: u64, after: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(id, "No async runtime; notification will not expire");
            return;
        };

        // Held across the spawn so the task cannot remove its entry before it exists.
        let mut timers = self.timers.lock();
        let container = self.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(after).await;
            container.timers.lock().remove(&id);
            container
                .store
                .dispatch(UiIntent::RemoveNotification { id });
        });
        timers.insert(id, task.abort_handle());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> UiContainer {
        UiContainer::new(&UiConfig::default(), None)
    }

    #[test]
    fn test_sidebar_follows_viewport_width() {
        let config = UiConfig::default();
        assert!(!UiContainer::new(&config, Some(600)).state().sidebar_open);
        assert!(UiContainer::new(&config, Some(768)).state().sidebar_open);
        assert!(UiContainer::new(&config, None).state().sidebar_open);
    }

    #[test]
    fn test_zero_duration_notification_needs_no_runtime() {
        let ui = container();
        let id = ui.add_notification(NewNotification::new("sticky").duration_ms(0));
        assert_eq!(ui.pending_timers(), 0);
        assert_eq!(ui.state().notifications[0].id, id);
        assert_eq!(ui.state().notifications[0].duration_ms, 0);
    }

    #[test]
    fn test_modal_shortcuts() {
        let ui = container();
        ui.open_upload_modal(Some(ModalData::Gallery(2)));
        assert!(ui.state().is_upload_modal_open());
        assert_eq!(ui.state().modal_data, Some(ModalData::Gallery(2)));

        ui.open_edit_modal(None);
        assert!(ui.state().is_edit_modal_open());
        assert!(!ui.state().is_upload_modal_open());

        ui.close_share_modal();
        assert!(ui.state().is_edit_modal_open());
        ui.close_edit_modal();
        assert_eq!(ui.state().active_modal, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_expires_after_duration() {
        let ui = container();
        let id = ui.add_notification(NewNotification::new("saved").duration_ms(1000));
        assert_eq!(ui.state().notifications.len(), 1);
        assert_eq!(ui.pending_timers(), 1);

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(ui.state().notifications[0].id, id);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(ui.state().notifications.is_empty());
        assert_eq!(ui.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_removal_aborts_timer() {
        let ui = container();
        let first = ui.add_notification(NewNotification::new("one"));
        let second = ui.add_notification(NewNotification::new("two"));
        assert!(second > first);

        ui.remove_notification(first);
        assert_eq!(ui.pending_timers(), 1);
        assert_eq!(ui.state().notifications.len(), 1);

        ui.clear_notifications();
        assert_eq!(ui.pending_timers(), 0);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(ui.state().notifications.is_empty());
    }
}
