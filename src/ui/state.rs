use serde::{Deserialize, Serialize};

use crate::model::{GalleryId, PhotoId};
use crate::mvi::UiState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Upload,
    Edit,
    Share,
}

/// Payload handed to the modal being opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalData {
    Gallery(GalleryId),
    Photo {
        gallery_id: GalleryId,
        photo_id: PhotoId,
    },
    Photos(Vec<PhotoId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    /// Lifetime in milliseconds; 0 stays until removed.
    pub duration_ms: u64,
}

/// A notification as requested by the caller, before it gets an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNotification {
    pub message: String,
    pub kind: Option<NotificationKind>,
    pub duration_ms: Option<u64>,
}

impl NewNotification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: NotificationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// `0` keeps the notification until it is removed explicitly.
    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShellState {
    pub theme: Theme,
    pub sidebar_open: bool,
    pub view_mode: ViewMode,
    /// Not range-checked; callers keep it within what the grid can render.
    pub grid_columns: u16,
    /// Oldest first.
    pub notifications: Vec<Notification>,
    /// At most one modal is open at a time.
    pub active_modal: Option<ModalKind>,
    pub modal_data: Option<ModalData>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            sidebar_open: true,
            view_mode: ViewMode::Grid,
            grid_columns: 4,
            notifications: Vec::new(),
            active_modal: None,
            modal_data: None,
        }
    }
}

impl UiState for ShellState {}

impl ShellState {
    pub fn is_modal_open(&self, kind: ModalKind) -> bool {
        self.active_modal == Some(kind)
    }

    pub fn is_upload_modal_open(&self) -> bool {
        self.is_modal_open(ModalKind::Upload)
    }

    pub fn is_edit_modal_open(&self) -> bool {
        self.is_modal_open(ModalKind::Edit)
    }

    pub fn is_share_modal_open(&self) -> bool {
        self.is_modal_open(ModalKind::Share)
    }
}
