mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{test_app, user};
use photovault::auth::{AuthContainer, AuthPhase};
use photovault::cancel::CancelToken;
use photovault::model::{Credentials, Registration, UserPatch};
use photovault::services::MockAuthService;
use photovault::session::{self, FileSessionStore, MemorySessionStore, SessionStore};

fn slow_container(session: Arc<dyn SessionStore>) -> AuthContainer {
    AuthContainer::new(
        Arc::new(MockAuthService::new(Duration::from_millis(1000))),
        session,
    )
}

#[tokio::test]
async fn login_authenticates_and_persists() {
    let (app, session) = test_app();
    app.bootstrap();
    assert_eq!(app.auth.state().phase(), AuthPhase::Anonymous);

    app.auth
        .login(Credentials::new("a@b.com", "x"), &CancelToken::new())
        .await;

    let state = app.auth.state();
    assert!(state.is_authenticated);
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.user.as_ref().unwrap().email, "a@b.com");

    let persisted = session::load_user(session.as_ref()).unwrap();
    assert_eq!(persisted.email, "a@b.com");
    assert!(persisted.token.is_some());
}

#[tokio::test]
async fn login_without_credentials_sets_error() {
    let (app, session) = test_app();
    app.bootstrap();
    app.auth
        .login(Credentials::default(), &CancelToken::new())
        .await;

    let state = app.auth.state();
    assert!(!state.is_authenticated);
    assert!(!state.loading);
    assert!(!state.error.unwrap().is_empty());
    assert!(session.read().unwrap().is_none());
}

#[tokio::test]
async fn clear_error_touches_nothing_else() {
    let (app, _session) = test_app();
    app.bootstrap();
    app.auth
        .login(Credentials::new("", "x"), &CancelToken::new())
        .await;
    let before = app.auth.state();
    assert_eq!(before.error.as_deref(), Some("email is required"));

    app.auth.clear_error();
    let after = app.auth.state();
    assert!(after.error.is_none());
    assert_eq!(after.user, before.user);
    assert_eq!(after.loading, before.loading);
    assert_eq!(after.is_authenticated, before.is_authenticated);
}

#[test]
fn bootstrap_restores_persisted_user() {
    let raw = serde_json::to_string(&user(3)).unwrap();
    let session = Arc::new(MemorySessionStore::with_raw(raw));
    let app = common::app_with_session(session);
    assert_eq!(app.auth.state().phase(), AuthPhase::Loading);

    app.bootstrap();
    let state = app.auth.state();
    assert!(state.is_authenticated);
    assert!(!state.loading);
    assert_eq!(state.user.unwrap().id, 3);
}

#[test]
fn bootstrap_treats_malformed_session_as_absent() {
    let session = Arc::new(MemorySessionStore::with_raw("{not json"));
    let app = common::app_with_session(session);
    app.bootstrap();

    let state = app.auth.state();
    assert_eq!(state.phase(), AuthPhase::Anonymous);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn logout_clears_session_and_keeps_error() {
    let (app, session) = test_app();
    app.bootstrap();
    let cancel = CancelToken::new();
    app.auth.login(Credentials::new("a@b.com", "x"), &cancel).await;
    app.auth
        .request_password_reset("", &cancel)
        .await;
    assert!(app.auth.state().error.is_some());

    app.auth.logout();
    let state = app.auth.state();
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    assert!(!state.loading);
    assert!(state.error.is_some());
    assert!(session.read().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn latest_login_wins() {
    let session = Arc::new(MemorySessionStore::new());
    let auth = slow_container(session.clone());
    auth.bootstrap();
    let cancel = CancelToken::new();

    tokio::join!(
        auth.login(Credentials::new("first@b.com", "x"), &cancel),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            auth.login(Credentials::new("second@b.com", "x"), &cancel)
                .await;
        }
    );

    let state = auth.state();
    assert_eq!(state.user.unwrap().email, "second@b.com");
    assert!(!state.loading);
    let persisted = session::load_user(session.as_ref()).unwrap();
    assert_eq!(persisted.email, "second@b.com");
}

#[tokio::test(start_paused = true)]
async fn logout_supersedes_login_in_flight() {
    let session = Arc::new(MemorySessionStore::new());
    let auth = slow_container(session.clone());
    auth.bootstrap();
    let cancel = CancelToken::new();

    tokio::join!(
        auth.login(Credentials::new("a@b.com", "x"), &cancel),
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            auth.logout();
        }
    );

    let state = auth.state();
    assert!(!state.is_authenticated);
    assert!(!state.loading);
    assert!(session.read().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn cancelled_login_settles_quietly() {
    let auth = slow_container(Arc::new(MemorySessionStore::new()));
    auth.bootstrap();
    let cancel = CancelToken::new();
    let trigger = cancel.clone();

    tokio::join!(
        auth.login(Credentials::new("a@b.com", "x"), &cancel),
        async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        }
    );

    let state = auth.state();
    assert!(!state.is_authenticated);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn register_signs_in_new_user() {
    let (app, session) = test_app();
    app.bootstrap();
    let data = Registration {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        password: "secret".into(),
    };
    app.auth.register(data, &CancelToken::new()).await;

    let state = app.auth.state();
    assert!(state.is_authenticated);
    assert_eq!(state.user.unwrap().name, "Ada");
    assert!(session.read().unwrap().is_some());
}

#[tokio::test]
async fn update_profile_persists_changes() {
    let (app, session) = test_app();
    app.bootstrap();
    let cancel = CancelToken::new();
    app.auth.login(Credentials::new("a@b.com", "x"), &cancel).await;

    let patch = UserPatch {
        name: Some("Renamed".into()),
        ..UserPatch::default()
    };
    app.auth.update_profile(patch, &cancel).await;

    assert_eq!(app.auth.current_user().unwrap().name, "Renamed");
    assert_eq!(session::load_user(session.as_ref()).unwrap().name, "Renamed");
}

#[tokio::test]
async fn update_profile_requires_sign_in() {
    let (app, _session) = test_app();
    app.bootstrap();
    app.auth
        .update_profile(UserPatch::default(), &CancelToken::new())
        .await;
    assert!(app.auth.state().error.is_some());
}

#[tokio::test]
async fn verify_session_signs_out_unknown_token() {
    let mut stale = user(1);
    stale.token = Some("mock-from-another-process".into());
    let session = Arc::new(MemorySessionStore::with_raw(
        serde_json::to_string(&stale).unwrap(),
    ));
    let app = common::app_with_session(session.clone());
    app.bootstrap();
    assert!(app.auth.state().is_authenticated);

    app.auth.verify_session(&CancelToken::new()).await;
    let state = app.auth.state();
    assert!(!state.is_authenticated);
    assert!(state.error.is_some());
    assert!(session.read().unwrap().is_none());
}

#[tokio::test]
async fn verify_session_keeps_valid_token() {
    let (app, _session) = test_app();
    app.bootstrap();
    let cancel = CancelToken::new();
    app.auth.login(Credentials::new("a@b.com", "x"), &cancel).await;

    app.auth.verify_session(&cancel).await;
    assert!(app.auth.state().is_authenticated);
}

#[tokio::test]
async fn password_reset_reports_outcome() {
    let (app, _session) = test_app();
    app.bootstrap();
    let cancel = CancelToken::new();
    assert!(app.auth.request_password_reset("a@b.com", &cancel).await);
    assert!(!app.auth.request_password_reset("  ", &cancel).await);
}

#[tokio::test]
async fn file_session_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let first = common::app_with_session(Arc::new(FileSessionStore::new(&path)));
    first.bootstrap();
    first
        .auth
        .login(Credentials::new("a@b.com", "x"), &CancelToken::new())
        .await;

    let second = common::app_with_session(Arc::new(FileSessionStore::new(&path)));
    second.bootstrap();
    assert_eq!(second.auth.current_user().unwrap().email, "a@b.com");

    second.auth.logout();
    assert!(!path.exists());
}
