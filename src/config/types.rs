use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ui::{Theme, ViewMode};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the persisted session lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Session file path. Defaults to `<data_dir>/photovault/session.json`.
    #[serde(default)]
    pub session_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn session_path(&self) -> PathBuf {
        self.session_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("photovault")
                .join("session.json")
        })
    }
}

/// Simulated service latency, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    /// Auth calls (default: 1000).
    #[serde(default = "default_auth_ms")]
    pub auth_ms: u64,
    /// Gallery calls (default: 1000).
    #[serde(default = "default_gallery_ms")]
    pub gallery_ms: u64,
    /// Photo uploads (default: 2000).
    #[serde(default = "default_upload_ms")]
    pub upload_ms: u64,
    /// Image processing, thumbnails and metadata (default: 300).
    #[serde(default = "default_processing_ms")]
    pub processing_ms: u64,
}

impl LatencyConfig {
    /// No artificial delay at all. Used by tests and scripted runs.
    pub fn instant() -> Self {
        Self {
            auth_ms: 0,
            gallery_ms: 0,
            upload_ms: 0,
            processing_ms: 0,
        }
    }

    pub fn auth(&self) -> Duration {
        Duration::from_millis(self.auth_ms)
    }

    pub fn gallery(&self) -> Duration {
        Duration::from_millis(self.gallery_ms)
    }

    pub fn upload(&self) -> Duration {
        Duration::from_millis(self.upload_ms)
    }

    pub fn processing(&self) -> Duration {
        Duration::from_millis(self.processing_ms)
    }
}

/// Initial presentation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub view_mode: ViewMode,
    /// Grid columns at startup, 2 to 6 (default: 4).
    #[serde(default = "default_grid_columns")]
    pub grid_columns: u16,
    /// Viewport width from which the sidebar starts open (default: 768).
    #[serde(default = "default_sidebar_breakpoint")]
    pub sidebar_breakpoint: u16,
    /// Notification lifetime when the caller gives none (default: 5000).
    #[serde(default = "default_notification_duration_ms")]
    pub notification_duration_ms: u64,
}

fn default_auth_ms() -> u64 {
    1000
}

fn default_gallery_ms() -> u64 {
    1000
}

fn default_upload_ms() -> u64 {
    2000
}

fn default_processing_ms() -> u64 {
    300
}

fn default_grid_columns() -> u16 {
    4
}

fn default_sidebar_breakpoint() -> u16 {
    768
}

fn default_notification_duration_ms() -> u64 {
    5000
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            auth_ms: default_auth_ms(),
            gallery_ms: default_gallery_ms(),
            upload_ms: default_upload_ms(),
            processing_ms: default_processing_ms(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            view_mode: ViewMode::default(),
            grid_columns: default_grid_columns(),
            sidebar_breakpoint: default_sidebar_breakpoint(),
            notification_duration_ms: default_notification_duration_ms(),
        }
    }
}
