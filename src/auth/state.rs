use crate::model::User;
use crate::mvi::UiState;

/// Coarse view of the auth state, as routing needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Session bootstrap or a request is still pending.
    Loading,
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
    /// Tag of the most recent request. Responses carrying another tag are stale.
    pub latest_request: u64,
}

impl Default for AuthState {
    /// Application start: anonymous, waiting for session bootstrap.
    fn default() -> Self {
        Self {
            is_authenticated: false,
            user: None,
            loading: true,
            error: None,
            latest_request: 0,
        }
    }
}

impl UiState for AuthState {}

impl AuthState {
    pub fn phase(&self) -> AuthPhase {
        if self.is_authenticated {
            AuthPhase::Authenticated
        } else if self.loading {
            AuthPhase::Loading
        } else {
            AuthPhase::Anonymous
        }
    }

    pub(super) fn authenticated(self, user: User) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
            loading: false,
            error: None,
            ..self
        }
    }

    pub(super) fn anonymous(self) -> Self {
        Self {
            is_authenticated: false,
            user: None,
            loading: false,
            ..self
        }
    }

    pub(super) fn accepts(&self, request: u64) -> bool {
        self.latest_request == request
    }
}
