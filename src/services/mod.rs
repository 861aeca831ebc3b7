//! Service boundary consumed by the containers.
//!
//! Each service is an `async_trait` so containers can hold `Arc<dyn ...>` and
//! tests can swap in their own. The bundled mocks resolve after a configured
//! delay and serve canned fixtures.

mod auth;
mod fixtures;
mod gallery;
mod upload;

use std::time::Duration;

use crate::cancel::CancelToken;
use crate::error::VaultError;

pub use auth::{AuthService, MockAuthService};
pub use fixtures::{demo_galleries, DEMO_AVATAR, DEMO_USER_ID, DEMO_USER_NAME};
pub use gallery::{
    AddPhotosResult, GalleryService, MockGalleryService, ShareResult, ShareSettings,
};
pub use upload::{
    ImageMetadata, MockUploadService, ProgressCallback, UploadFile, UploadOptions,
    UploadProgressHandle, UploadResult, UploadService, UploadedPhoto,
};

/// Wait out a simulated network delay unless `cancel` fires first.
pub(crate) async fn simulate_latency(
    delay: Duration,
    cancel: &CancelToken,
) -> Result<(), VaultError> {
    if cancel.is_cancelled() {
        return Err(VaultError::Cancelled);
    }
    if delay.is_zero() {
        return Ok(());
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        _ = cancel.cancelled() => Err(VaultError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_latency_elapses() {
        let start = tokio::time::Instant::now();
        simulate_latency(Duration::from_millis(1000), &CancelToken::new())
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_cut_short_by_cancel() {
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let start = tokio::time::Instant::now();
        let result = simulate_latency(Duration::from_secs(5), &cancel).await;
        assert!(matches!(result, Err(VaultError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_already_cancelled_fails_fast() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = simulate_latency(Duration::ZERO, &cancel).await;
        assert!(matches!(result, Err(VaultError::Cancelled)));
    }
}
