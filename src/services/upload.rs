use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::simulate_latency;
use crate::cancel::CancelToken;
use crate::error::VaultError;
use crate::model::{GalleryId, Photo, PhotoId, PhotoMetadata, UserId};
use crate::permissions::Privacy;

/// Interval between simulated progress reports.
const PROGRESS_TICK: Duration = Duration::from_millis(500);
const PROGRESS_STEP: f64 = 10.0;

/// Dimensions reported when the header cannot be decoded.
const FALLBACK_DIMENSIONS: (u32, u32) = (800, 600);

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    /// MIME type as reported by the picker, e.g. `image/jpeg`.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    fn size_mb(&self) -> String {
        format!("{:.2}MB", self.size() as f64 / 1024.0 / 1024.0)
    }

    fn dimensions(&self) -> (u32, u32) {
        image::ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok())
            .unwrap_or(FALLBACK_DIMENSIONS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    pub gallery_id: Option<GalleryId>,
    /// Defaults to private.
    pub privacy: Option<Privacy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPhoto {
    pub id: PhotoId,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub url: String,
    pub thumbnail: String,
    pub upload_date: DateTime<Utc>,
    pub gallery_id: Option<GalleryId>,
    pub privacy: Privacy,
    pub metadata: PhotoMetadata,
}

impl UploadedPhoto {
    /// The photo record to attach to a gallery.
    pub fn to_photo(&self, owner: Option<UserId>) -> Photo {
        Photo {
            id: self.id,
            url: self.url.clone(),
            thumbnail: self.thumbnail.clone(),
            title: self.file_name.clone(),
            description: String::new(),
            date_added: self.upload_date,
            privacy: Some(self.privacy),
            owner_id: owner,
            shared_with: Vec::new(),
            metadata: Some(self.metadata.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub upload_id: String,
    pub uploaded_count: usize,
    pub files: Vec<UploadedPhoto>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub camera: String,
    pub date_taken: DateTime<Utc>,
    pub location: Option<String>,
    /// `WIDTHxHEIGHT`
    pub dimensions: String,
    pub size: String,
    pub format: String,
}

pub type ProgressCallback = Box<dyn FnMut(f64) + Send + 'static>;

/// Controls a running progress tracker.
pub struct UploadProgressHandle {
    task: JoinHandle<()>,
}

impl UploadProgressHandle {
    /// Stop reporting progress. Returns false if tracking had already finished.
    pub fn abort(&self) -> bool {
        let running = !self.task.is_finished();
        self.task.abort();
        running
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Upload and image processing operations.
#[async_trait]
pub trait UploadService: Send + Sync {
    async fn upload_photos(
        &self,
        files: &[UploadFile],
        options: &UploadOptions,
        cancel: &CancelToken,
    ) -> Result<UploadResult, VaultError>;

    /// Prepare an image for upload. Non-images are rejected.
    async fn process_image(
        &self,
        file: UploadFile,
        cancel: &CancelToken,
    ) -> Result<UploadFile, VaultError>;

    async fn generate_thumbnail(
        &self,
        file: UploadFile,
        max_width: u32,
        max_height: u32,
        cancel: &CancelToken,
    ) -> Result<UploadFile, VaultError>;

    /// Returns true once the upload has been cancelled.
    async fn cancel_upload(&self, upload_id: &str, cancel: &CancelToken)
        -> Result<bool, VaultError>;

    /// Report progress percentages to `callback` until 100 or `abort()`.
    ///
    /// Must be called from within a tokio runtime.
    fn track_upload_progress(&self, callback: ProgressCallback) -> UploadProgressHandle;

    async fn extract_image_metadata(
        &self,
        file: &UploadFile,
        cancel: &CancelToken,
    ) -> Result<ImageMetadata, VaultError>;
}

/// Uploads that never leave the process. Processing steps pass files through.
pub struct MockUploadService {
    upload_latency: Duration,
    processing_latency: Duration,
}

impl MockUploadService {
    pub fn new(upload_latency: Duration, processing_latency: Duration) -> Self {
        Self {
            upload_latency,
            processing_latency,
        }
    }
}

#[async_trait]
impl UploadService for MockUploadService {
    async fn upload_photos(
        &self,
        files: &[UploadFile],
        options: &UploadOptions,
        cancel: &CancelToken,
    ) -> Result<UploadResult, VaultError> {
        simulate_latency(self.upload_latency, cancel).await?;

        let now = Utc::now();
        let base_id = now.timestamp_millis().max(0) as u64;
        let privacy = options.privacy.unwrap_or(Privacy::Private);
        let uploaded: Vec<UploadedPhoto> = files
            .iter()
            .enumerate()
            .map(|(index, file)| {
                let (width, height) = file.dimensions();
                let blob = format!("blob:photovault/{}", Uuid::new_v4());
                UploadedPhoto {
                    id: base_id + index as u64,
                    file_name: file.name.clone(),
                    file_size: file.size(),
                    file_type: file.mime.clone(),
                    url: blob.clone(),
                    thumbnail: blob,
                    upload_date: now,
                    gallery_id: options.gallery_id,
                    privacy,
                    metadata: PhotoMetadata {
                        width: Some(width),
                        height: Some(height),
                        size: Some(file.size_mb()),
                        ..PhotoMetadata::default()
                    },
                }
            })
            .collect();

        tracing::info!(count = uploaded.len(), gallery_id = ?options.gallery_id, "Photos uploaded");
        Ok(UploadResult {
            upload_id: Uuid::new_v4().to_string(),
            uploaded_count: uploaded.len(),
            files: uploaded,
        })
    }

    async fn process_image(
        &self,
        file: UploadFile,
        cancel: &CancelToken,
    ) -> Result<UploadFile, VaultError> {
        if !file.is_image() {
            return Err(VaultError::NotAnImage { mime: file.mime });
        }
        simulate_latency(self.processing_latency, cancel).await?;
        Ok(file)
    }

    async fn generate_thumbnail(
        &self,
        file: UploadFile,
        _max_width: u32,
        _max_height: u32,
        cancel: &CancelToken,
    ) -> Result<UploadFile, VaultError> {
        simulate_latency(self.processing_latency, cancel).await?;
        Ok(file)
    }

    async fn cancel_upload(
        &self,
        upload_id: &str,
        cancel: &CancelToken,
    ) -> Result<bool, VaultError> {
        simulate_latency(self.processing_latency / 2, cancel).await?;
        tracing::info!(upload_id = %upload_id, "Upload cancelled");
        Ok(true)
    }

    fn track_upload_progress(&self, mut callback: ProgressCallback) -> UploadProgressHandle {
        let task = tokio::spawn(async move {
            let mut progress = 0.0;
            let mut ticker = tokio::time::interval(PROGRESS_TICK);
            ticker.tick().await;
            while progress < 100.0 {
                ticker.tick().await;
                progress = (progress + PROGRESS_STEP).min(100.0);
                callback(progress);
            }
        });
        UploadProgressHandle { task }
    }

    async fn extract_image_metadata(
        &self,
        file: &UploadFile,
        cancel: &CancelToken,
    ) -> Result<ImageMetadata, VaultError> {
        simulate_latency(self.processing_latency, cancel).await?;
        let (width, height) = file.dimensions();
        Ok(ImageMetadata {
            camera: "Unknown Camera".to_string(),
            date_taken: Utc::now(),
            location: None,
            dimensions: format!("{}x{}", width, height),
            size: file.size_mb(),
            format: file
                .mime
                .split_once('/')
                .map(|(_, subtype)| subtype.to_string())
                .unwrap_or_default(),
        })
    }
}
