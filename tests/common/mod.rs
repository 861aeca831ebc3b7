//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use photovault::app::{App, Services};
use photovault::config::{Config, LatencyConfig};
use photovault::model::{Gallery, User};
use photovault::permissions::Privacy;
use photovault::session::{MemorySessionStore, SessionStore};
use tempfile::TempDir;

/// Config whose services answer immediately.
pub fn instant_config() -> Config {
    Config {
        latency: LatencyConfig::instant(),
        ..Config::default()
    }
}

/// App on instant mock services with an in-memory session slot.
pub fn test_app() -> (App, Arc<MemorySessionStore>) {
    let session = Arc::new(MemorySessionStore::new());
    let app = app_with_session(session.clone());
    (app, session)
}

pub fn app_with_session(session: Arc<dyn SessionStore>) -> App {
    let config = instant_config();
    App::new(&config, Services::mock(&config.latency), session, None)
}

/// Write `content` to a config file in a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, content).expect("Failed to write config");
    (temp_dir, path)
}

pub fn user(id: u64) -> User {
    User {
        id,
        name: format!("User {}", id),
        email: format!("user{}@example.com", id),
        avatar: None,
        token: None,
    }
}

pub fn gallery(owner: Option<u64>, privacy: Option<Privacy>, shared_with: Vec<u64>) -> Gallery {
    Gallery {
        id: 10,
        name: "Test".into(),
        description: String::new(),
        cover_image: String::new(),
        photo_count: 0,
        is_private: privacy == Some(Privacy::Private),
        privacy,
        owner_id: owner,
        shared_with,
        created_at: DateTime::<Utc>::default(),
        photos: None,
    }
}
