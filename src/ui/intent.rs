use crate::mvi::Intent;
use crate::ui::state::{ModalData, ModalKind, Notification, Theme, ViewMode};

#[derive(Debug, Clone)]
pub enum UiIntent {
    ToggleTheme,
    SetTheme(Theme),
    ToggleSidebar,
    SetSidebar(bool),
    SetViewMode(ViewMode),
    SetGridColumns(u16),
    /// Appended as is; the container assigns id and defaults.
    AddNotification(Notification),
    RemoveNotification { id: u64 },
    ClearNotifications,
    /// Replaces whatever modal is open. `data` becomes the modal payload.
    OpenModal {
        kind: ModalKind,
        data: Option<ModalData>,
    },
    /// No-op unless `kind` is the open modal.
    CloseModal { kind: ModalKind },
}

impl Intent for UiIntent {}
