//! Canned payloads served by the mock services.

use chrono::{DateTime, Utc};

use crate::model::{Gallery, Photo, PhotoId, PhotoMetadata, UserId};
use crate::permissions::Privacy;

pub const DEMO_USER_ID: UserId = 1;
pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_AVATAR: &str = "https://via.placeholder.com/150";
const COVER_IMAGE: &str = "https://via.placeholder.com/300";

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

struct PhotoSet {
    label: &'static str,
    thumb_label: &'static str,
    title: &'static str,
    description: &'static str,
    location: &'static str,
    camera: &'static str,
    size: &'static str,
    first_id: PhotoId,
    count: u32,
}

fn photos(set: &PhotoSet, added: DateTime<Utc>, privacy: impl Fn(u32) -> Privacy) -> Vec<Photo> {
    (0..set.count)
        .map(|i| {
            let n = i + 1;
            Photo {
                id: set.first_id + PhotoId::from(i),
                url: format!("https://via.placeholder.com/800x600?text={}{}", set.label, n),
                thumbnail: format!(
                    "https://via.placeholder.com/200x150?text={}{}",
                    set.thumb_label, n
                ),
                title: format!("{} {}", set.title, n),
                description: format!("{} - photo {}", set.description, n),
                date_added: added,
                privacy: Some(privacy(i)),
                owner_id: Some(DEMO_USER_ID),
                shared_with: Vec::new(),
                metadata: Some(PhotoMetadata {
                    location: Some(set.location.to_string()),
                    camera: Some(set.camera.to_string()),
                    size: Some(set.size.to_string()),
                    width: None,
                    height: None,
                }),
            }
        })
        .collect()
}

fn gallery(
    id: u64,
    name: &str,
    description: &str,
    is_private: bool,
    created_at: DateTime<Utc>,
    photos: Vec<Photo>,
) -> Gallery {
    Gallery {
        id,
        name: name.to_string(),
        description: description.to_string(),
        cover_image: COVER_IMAGE.to_string(),
        photo_count: photos.len() as u32,
        is_private,
        privacy: Some(if is_private {
            Privacy::Private
        } else {
            Privacy::Public
        }),
        owner_id: Some(DEMO_USER_ID),
        shared_with: Vec::new(),
        created_at,
        photos: Some(photos),
    }
}

/// The three demo galleries, photos embedded.
pub fn demo_galleries() -> Vec<Gallery> {
    let vacation_at = at(1_684_146_600);
    let family_at = at(1_682_000_520);
    let nature_at = at(1_678_439_700);

    let vacation = PhotoSet {
        label: "Vacation",
        thumb_label: "VacThumb",
        title: "Vacation Photo",
        description: "Beautiful scene from my vacation",
        location: "Beach Resort",
        camera: "iPhone 13 Pro",
        size: "3.2MB",
        first_id: 1,
        count: 24,
    };
    let family = PhotoSet {
        label: "Family",
        thumb_label: "FamThumb",
        title: "Family Photo",
        description: "Family gathering",
        location: "Home",
        camera: "Canon EOS R5",
        size: "5.7MB",
        first_id: 100,
        count: 15,
    };
    let nature = PhotoSet {
        label: "Nature",
        thumb_label: "NatThumb",
        title: "Nature Photo",
        description: "Beautiful landscape",
        location: "National Park",
        camera: "Sony A7 IV",
        size: "8.1MB",
        first_id: 200,
        count: 32,
    };

    vec![
        gallery(
            1,
            "Vacation Photos",
            "Photos from my last vacation",
            false,
            vacation_at,
            photos(&vacation, vacation_at, |i| {
                if i % 3 == 0 {
                    Privacy::Private
                } else {
                    Privacy::Public
                }
            }),
        ),
        gallery(
            2,
            "Family",
            "Family photos",
            true,
            family_at,
            photos(&family, family_at, |_| Privacy::Private),
        ),
        gallery(
            3,
            "Nature",
            "Beautiful landscapes and wildlife",
            false,
            nature_at,
            photos(&nature, nature_at, |_| Privacy::Public),
        ),
    ]
}
