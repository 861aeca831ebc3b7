//! Domain records: users, galleries and photos.
//!
//! Field names serialize in camelCase to match the persisted session slot
//! and the service payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::permissions::{deserialize_privacy_lenient, Privacy};

pub type UserId = u64;
pub type GalleryId = u64;
pub type PhotoId = u64;

/// An authenticated user. Owned by the auth container; views get clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl User {
    pub fn apply_patch(&mut self, patch: &UserPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(avatar) = &patch.avatar {
            self.avatar = Some(avatar.clone());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Optional per-photo metadata (EXIF-like).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub camera: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// A photo. Only exists nested under a fetched gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: PhotoId,
    pub url: String,
    pub thumbnail: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date_added: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_privacy_lenient")]
    pub privacy: Option<Privacy>,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub shared_with: Vec<UserId>,
    #[serde(default)]
    pub metadata: Option<PhotoMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub privacy: Option<Privacy>,
}

impl Photo {
    pub fn apply_patch(&mut self, patch: &PhotoPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(privacy) = patch.privacy {
            self.privacy = Some(privacy);
        }
    }
}

/// A gallery.
///
/// The same record type is used for entries in the gallery sequence (where
/// `photos` is `None`) and for the richer current-gallery view, which embeds
/// the fetched photos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gallery {
    pub id: GalleryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub photo_count: u32,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, deserialize_with = "deserialize_privacy_lenient")]
    pub privacy: Option<Privacy>,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub shared_with: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<Photo>>,
}

/// Data for a gallery that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGallery {
    pub name: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub is_private: bool,
    pub owner_id: Option<UserId>,
}

/// Shallow patch over a gallery. Present fields win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_private: Option<bool>,
    pub privacy: Option<Privacy>,
    pub shared_with: Option<Vec<UserId>>,
}

impl GalleryPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl Gallery {
    /// Merge `patch` over this record. Embedded photos are kept as they are.
    pub fn apply_patch(&mut self, patch: &GalleryPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(cover) = &patch.cover_image {
            self.cover_image = cover.clone();
        }
        // `is_private` and `privacy` describe the same policy and move together.
        if let Some(is_private) = patch.is_private {
            self.is_private = is_private;
            if is_private {
                self.privacy = Some(Privacy::Private);
            } else if matches!(self.privacy, Some(Privacy::Private) | None) {
                self.privacy = Some(Privacy::Public);
            }
        }
        if let Some(privacy) = patch.privacy {
            self.privacy = Some(privacy);
            self.is_private = privacy == Privacy::Private;
        }
        if let Some(shared_with) = &patch.shared_with {
            self.shared_with = shared_with.clone();
        }
    }

    /// Adjust `photo_count` by photos added or removed, saturating at the bounds.
    pub fn add_to_photo_count(&mut self, added: usize) {
        let added = u32::try_from(added).unwrap_or(u32::MAX);
        self.photo_count = self.photo_count.saturating_add(added);
    }

    pub fn remove_from_photo_count(&mut self, removed: usize) {
        let removed = u32::try_from(removed).unwrap_or(u32::MAX);
        self.photo_count = self.photo_count.saturating_sub(removed);
    }

    /// The record without embedded photos, as stored in the gallery sequence.
    pub fn summary(&self) -> Gallery {
        Gallery {
            photos: None,
            ..self.clone()
        }
    }
}
