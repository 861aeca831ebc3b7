//! Privacy levels and view/edit permission evaluation.
//!
//! Everything here is pure: no state, no I/O. Unknown or missing privacy
//! levels always deny access.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{Gallery, Photo, User, UserId};

/// Visibility policy attached to a gallery or photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    /// Visible to everyone.
    Public,
    /// Accessible only with a share token.
    Unlisted,
    /// Visible to the users listed in `shared_with`.
    Shared,
    /// Visible to the owner only.
    Private,
}

impl Privacy {
    /// Parse a privacy level. Unknown values return `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Privacy::Public),
            "unlisted" => Some(Privacy::Unlisted),
            "shared" => Some(Privacy::Shared),
            "private" => Some(Privacy::Private),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Public => "public",
            Privacy::Unlisted => "unlisted",
            Privacy::Shared => "shared",
            Privacy::Private => "private",
        }
    }

    pub fn all() -> &'static [Privacy] {
        &[
            Privacy::Public,
            Privacy::Unlisted,
            Privacy::Shared,
            Privacy::Private,
        ]
    }
}

impl std::fmt::Display for Privacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deserialize an optional privacy level, mapping unknown strings to `None`.
pub fn deserialize_privacy_lenient<'de, D>(deserializer: D) -> Result<Option<Privacy>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Privacy::parse))
}

/// Anything the evaluator can reason about.
pub trait Protected {
    fn privacy(&self) -> Option<Privacy>;
    fn owner_id(&self) -> Option<UserId>;
    fn shared_with(&self) -> &[UserId];
}

impl Protected for Gallery {
    fn privacy(&self) -> Option<Privacy> {
        self.privacy
    }

    fn owner_id(&self) -> Option<UserId> {
        self.owner_id
    }

    fn shared_with(&self) -> &[UserId] {
        &self.shared_with
    }
}

impl Protected for Photo {
    fn privacy(&self) -> Option<Privacy> {
        self.privacy
    }

    fn owner_id(&self) -> Option<UserId> {
        self.owner_id
    }

    fn shared_with(&self) -> &[UserId] {
        &self.shared_with
    }
}

/// Extra context for a view check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Token presented through a share link. Its validity is not checked here.
    pub share_token: Option<String>,
}

impl ViewOptions {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            share_token: Some(token.into()),
        }
    }

    fn has_token(&self) -> bool {
        self.share_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

fn is_owner<T: Protected + ?Sized>(item: &T, viewer: &User) -> bool {
    item.owner_id() == Some(viewer.id)
}

/// Decide whether `viewer` may see `item`.
///
/// The owner always sees their own content. Otherwise the privacy level
/// decides; a missing item or privacy level denies.
pub fn can_view<T: Protected + ?Sized>(
    item: Option<&T>,
    viewer: Option<&User>,
    options: &ViewOptions,
) -> bool {
    let Some(item) = item else {
        return false;
    };
    let Some(privacy) = item.privacy() else {
        return false;
    };

    if viewer.is_some_and(|v| is_owner(item, v)) {
        return true;
    }

    match privacy {
        Privacy::Public => true,
        Privacy::Unlisted => options.has_token(),
        Privacy::Shared => viewer.is_some_and(|v| item.shared_with().contains(&v.id)),
        Privacy::Private => false,
    }
}

/// Editing is owner-only, whatever the privacy level.
pub fn can_edit<T: Protected + ?Sized>(item: Option<&T>, viewer: Option<&User>) -> bool {
    match (item, viewer) {
        (Some(item), Some(viewer)) => is_owner(item, viewer),
        _ => false,
    }
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Generate an opaque share token of the form `<random>-<time>`, both base-36.
///
/// Uniqueness is best effort. The token is not signed and must not be relied
/// on as proof of authorization.
pub fn generate_share_token() -> String {
    generate_share_token_at(Utc::now())
}

pub fn generate_share_token_at(now: DateTime<Utc>) -> String {
    let random_part = to_base36(rand::random::<u64>());
    let time_part = to_base36(now.timestamp_millis().max(0) as u64);
    format!("{}-{}", random_part, time_part)
}

/// Choices offered when creating a share link: `(seconds, label)`.
pub const EXPIRATION_OPTIONS: &[(Option<u64>, &str)] = &[
    (None, "Never expires"),
    (Some(3_600), "1 hour"),
    (Some(86_400), "24 hours"),
    (Some(604_800), "7 days"),
    (Some(2_592_000), "30 days"),
];

/// Expiration instant for a share valid for `seconds`. `None` or zero never
/// expires, and so does a lifetime past the representable date range.
pub fn calculate_expiration(seconds: Option<u64>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(seconds.filter(|&s| s > 0)?).ok()?;
    now.checked_add_signed(Duration::try_seconds(secs)?)
}

/// Strictly after `expires_at`. No expiration means never expired.
pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_some_and(|at| now > at)
}

/// A share token together with its optional expiration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShareLink {
    pub fn new(expires_in: Option<u64>, now: DateTime<Utc>) -> Self {
        Self {
            token: generate_share_token_at(now),
            expires_at: calculate_expiration(expires_in, now),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.expires_at, now)
    }
}
