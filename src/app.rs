//! Application shell: wires the containers to their services.

use std::sync::Arc;

use crate::auth::AuthContainer;
use crate::cancel::CancelToken;
use crate::config::{Config, LatencyConfig};
use crate::error::VaultError;
use crate::gallery::GalleryContainer;
use crate::model::GalleryId;
use crate::permissions::Privacy;
use crate::services::{
    AuthService, GalleryService, MockAuthService, MockGalleryService, MockUploadService,
    UploadFile, UploadOptions, UploadResult, UploadService,
};
use crate::session::SessionStore;
use crate::ui::{NewNotification, NotificationKind, UiContainer};

/// Service implementations handed to `App::new`.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub gallery: Arc<dyn GalleryService>,
    pub upload: Arc<dyn UploadService>,
}

impl Services {
    /// The in-process mocks, delayed as configured.
    pub fn mock(latency: &LatencyConfig) -> Self {
        Self {
            auth: Arc::new(MockAuthService::new(latency.auth())),
            gallery: Arc::new(MockGalleryService::new(latency.gallery())),
            upload: Arc::new(MockUploadService::new(
                latency.upload(),
                latency.processing(),
            )),
        }
    }
}

/// The three state containers plus the services behind them.
///
/// Built once at startup and passed to whatever renders it.
#[derive(Clone)]
pub struct App {
    pub auth: AuthContainer,
    pub ui: UiContainer,
    pub galleries: GalleryContainer,
    services: Services,
}

impl App {
    pub fn new(
        config: &Config,
        services: Services,
        session: Arc<dyn SessionStore>,
        viewport_width: Option<u16>,
    ) -> Self {
        Self {
            auth: AuthContainer::new(Arc::clone(&services.auth), session),
            ui: UiContainer::new(&config.ui, viewport_width),
            galleries: GalleryContainer::new(Arc::clone(&services.gallery)),
            services,
        }
    }

    /// Restore the persisted session, if any.
    pub fn bootstrap(&self) {
        self.auth.bootstrap();
    }

    /// Invalidate the token remotely, then forget the session locally.
    ///
    /// The local sign-out happens even when the remote call fails.
    pub async fn sign_out(&self, cancel: &CancelToken) {
        let token = self.auth.current_user().and_then(|u| u.token);
        if let Err(e) = self.services.auth.logout(token.as_deref(), cancel).await {
            tracing::warn!(error = %e, "Remote logout failed");
        }
        self.auth.logout();
    }

    /// Process and upload `files` into `gallery_id`, then attach the result to
    /// the gallery. Outcome is also reported as a notification.
    pub async fn upload_to_gallery(
        &self,
        gallery_id: GalleryId,
        files: Vec<UploadFile>,
        privacy: Option<Privacy>,
        cancel: &CancelToken,
    ) -> Result<UploadResult, VaultError> {
        match self.upload(gallery_id, files, privacy, cancel).await {
            Ok(result) => {
                self.ui.add_notification(
                    NewNotification::new(format!("Uploaded {} photos", result.uploaded_count))
                        .kind(NotificationKind::Success),
                );
                Ok(result)
            }
            Err(e) => {
                if !e.is_cancelled() {
                    self.ui.add_notification(
                        NewNotification::new(e.to_string()).kind(NotificationKind::Error),
                    );
                }
                Err(e)
            }
        }
    }

    async fn upload(
        &self,
        gallery_id: GalleryId,
        files: Vec<UploadFile>,
        privacy: Option<Privacy>,
        cancel: &CancelToken,
    ) -> Result<UploadResult, VaultError> {
        let mut processed = Vec::with_capacity(files.len());
        for file in files {
            processed.push(self.services.upload.process_image(file, cancel).await?);
        }

        let options = UploadOptions {
            gallery_id: Some(gallery_id),
            privacy,
        };
        let result = self
            .services
            .upload
            .upload_photos(&processed, &options, cancel)
            .await?;

        let owner = self.auth.current_user().map(|u| u.id);
        self.galleries
            .add_uploaded_photos(gallery_id, &result.files, owner, cancel)
            .await;
        Ok(result)
    }
}
