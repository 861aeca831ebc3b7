//! Ephemeral presentation state: theme, layout, modals and notifications.

mod container;
mod intent;
mod reducer;
mod state;

pub use container::UiContainer;
pub use intent::UiIntent;
pub use reducer::UiReducer;
pub use state::{
    ModalData, ModalKind, NewNotification, Notification, NotificationKind, ShellState, Theme,
    ViewMode,
};
