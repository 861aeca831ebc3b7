use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::intent::AuthIntent;
use crate::auth::reducer::AuthReducer;
use crate::auth::state::AuthState;
use crate::cancel::CancelToken;
use crate::error::VaultError;
use crate::model::{Credentials, Registration, User, UserPatch};
use crate::mvi::{RequestCounter, Store};
use crate::services::AuthService;
use crate::session::{self, SessionStore};

/// Auth state container.
///
/// Owns the current user. Only `login`, `register`, `update_profile`,
/// `verify_session` and `logout` touch the persisted session; everything
/// else is a plain state transition. Failures end up in `AuthState::error`.
#[derive(Clone)]
pub struct AuthContainer {
    store: Store<AuthReducer>,
    service: Arc<dyn AuthService>,
    session: Arc<dyn SessionStore>,
    requests: RequestCounter,
}

fn required(value: &str, field: &'static str) -> Result<(), VaultError> {
    if value.trim().is_empty() {
        return Err(VaultError::Validation { field });
    }
    Ok(())
}

impl AuthContainer {
    pub fn new(service: Arc<dyn AuthService>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            store: Store::default(),
            service,
            session,
            requests: RequestCounter::new(),
        }
    }

    pub fn state(&self) -> AuthState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.store.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.store.read(|s| s.user.clone())
    }

    /// Restore the persisted session. Malformed data counts as no session.
    pub fn bootstrap(&self) {
        let user = session::load_user(self.session.as_ref());
        tracing::info!(restored = user.is_some(), "Session bootstrap finished");
        self.store.dispatch(AuthIntent::Restored { user });
    }

    pub async fn login(&self, credentials: Credentials, cancel: &CancelToken) {
        let request = self.begin();
        let result = match required(&credentials.email, "email")
            .and_then(|_| required(&credentials.password, "password"))
        {
            Ok(()) => {
                self.service
                    .login(&credentials.email, &credentials.password, cancel)
                    .await
            }
            Err(e) => Err(e),
        };
        self.settle_authentication(request, result);
    }

    pub async fn register(&self, data: Registration, cancel: &CancelToken) {
        let request = self.begin();
        let result = match required(&data.email, "email")
            .and_then(|_| required(&data.password, "password"))
        {
            Ok(()) => self.service.register(&data, cancel).await,
            Err(e) => Err(e),
        };
        self.settle_authentication(request, result);
    }

    /// Check the stored token with the auth service. An invalid token signs
    /// the user out; a missing session is a no-op.
    pub async fn verify_session(&self, cancel: &CancelToken) {
        let Some(token) = self.store.read(|s| s.user.as_ref().and_then(|u| u.token.clone()))
        else {
            return;
        };

        let request = self.begin();
        let result = self.service.verify_token(&token, cancel).await;
        if matches!(result, Err(VaultError::Auth(_))) && self.is_current(request) {
            self.clear_persisted();
        }
        self.settle_authentication(request, result);
    }

    pub async fn update_profile(&self, patch: UserPatch, cancel: &CancelToken) {
        let request = self.begin();
        let result = match self.current_user() {
            Some(user) => self.service.update_profile(&user, &patch, cancel).await,
            None => Err(VaultError::Auth("Not authenticated".to_string())),
        };

        match result {
            Ok(user) => {
                if self.is_current(request) {
                    self.persist(&user);
                }
                self.store
                    .dispatch(AuthIntent::ProfileUpdated { request, user });
            }
            Err(e) => self.settle_failure(request, e),
        }
    }

    /// Ask for a password reset mail. Returns whether the request went through.
    pub async fn request_password_reset(&self, email: &str, cancel: &CancelToken) -> bool {
        let request = self.begin();
        let result = match required(email, "email") {
            Ok(()) => self.service.request_password_reset(email, cancel).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.store.dispatch(AuthIntent::RequestSettled { request });
                true
            }
            Err(e) => {
                self.settle_failure(request, e);
                false
            }
        }
    }

    /// Forget the session locally. Leaves any stored error in place.
    pub fn logout(&self) {
        self.clear_persisted();
        let request = self.requests.next();
        self.store.dispatch(AuthIntent::LoggedOut { request });
        tracing::info!("Logged out");
    }

    pub fn clear_error(&self) {
        self.store.dispatch(AuthIntent::ClearError);
    }

    fn begin(&self) -> u64 {
        let request = self.requests.next();
        self.store.dispatch(AuthIntent::RequestStarted { request });
        request
    }

    fn is_current(&self, request: u64) -> bool {
        self.store.read(|s| s.latest_request == request)
    }

    fn settle_authentication(&self, request: u64, result: Result<User, VaultError>) {
        match result {
            Ok(user) => {
                if self.is_current(request) {
                    self.persist(&user);
                    tracing::info!(user_id = user.id, "Authenticated");
                } else {
                    tracing::debug!(request, "Discarding stale authentication response");
                }
                self.store
                    .dispatch(AuthIntent::Authenticated { request, user });
            }
            Err(VaultError::Cancelled) => {
                self.store.dispatch(AuthIntent::RequestSettled { request });
            }
            Err(e) => {
                tracing::warn!(request, error = %e, kind = e.kind(), "Authentication failed");
                self.store.dispatch(AuthIntent::AuthenticationFailed {
                    request,
                    message: e.to_string(),
                });
            }
        }
    }

    fn settle_failure(&self, request: u64, error: VaultError) {
        if error.is_cancelled() {
            self.store.dispatch(AuthIntent::RequestSettled { request });
            return;
        }
        tracing::warn!(request, error = %error, kind = error.kind(), "Auth request failed");
        self.store.dispatch(AuthIntent::RequestFailed {
            request,
            message: error.to_string(),
        });
    }

    fn persist(&self, user: &User) {
        if let Err(e) = session::save_user(self.session.as_ref(), user) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
    }

    fn clear_persisted(&self) {
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
    }
}
