use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use super::fixtures::{DEMO_AVATAR, DEMO_USER_ID, DEMO_USER_NAME};
use super::simulate_latency;
use crate::cancel::CancelToken;
use crate::error::VaultError;
use crate::model::{Registration, User, UserPatch};

/// Remote authentication operations.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(
        &self,
        email: &str,
        password: &str,
        cancel: &CancelToken,
    ) -> Result<User, VaultError>;

    async fn register(&self, data: &Registration, cancel: &CancelToken)
        -> Result<User, VaultError>;

    /// Invalidate `token` on the remote side.
    async fn logout(&self, token: Option<&str>, cancel: &CancelToken) -> Result<(), VaultError>;

    async fn verify_token(&self, token: &str, cancel: &CancelToken) -> Result<User, VaultError>;

    async fn update_profile(
        &self,
        current: &User,
        patch: &UserPatch,
        cancel: &CancelToken,
    ) -> Result<User, VaultError>;

    async fn request_password_reset(
        &self,
        email: &str,
        cancel: &CancelToken,
    ) -> Result<(), VaultError>;
}

/// Accepts any non-empty email/password pair and remembers issued tokens.
pub struct MockAuthService {
    latency: Duration,
    sessions: Mutex<HashMap<String, User>>,
}

impl MockAuthService {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn issue(&self, mut user: User) -> User {
        let token = format!("mock-{}", Uuid::new_v4());
        user.token = Some(token.clone());
        self.sessions.lock().insert(token, user.clone());
        user
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn login(
        &self,
        email: &str,
        password: &str,
        cancel: &CancelToken,
    ) -> Result<User, VaultError> {
        simulate_latency(self.latency, cancel).await?;
        if email.is_empty() || password.is_empty() {
            return Err(VaultError::Auth("Invalid credentials".to_string()));
        }

        Ok(self.issue(User {
            id: DEMO_USER_ID,
            name: DEMO_USER_NAME.to_string(),
            email: email.to_string(),
            avatar: Some(DEMO_AVATAR.to_string()),
            token: None,
        }))
    }

    async fn register(
        &self,
        data: &Registration,
        cancel: &CancelToken,
    ) -> Result<User, VaultError> {
        simulate_latency(self.latency, cancel).await?;
        if data.email.is_empty() || data.password.is_empty() {
            return Err(VaultError::Auth("Invalid user data".to_string()));
        }

        Ok(self.issue(User {
            id: Utc::now().timestamp_millis().max(0) as u64,
            name: data.name.clone(),
            email: data.email.clone(),
            avatar: None,
            token: None,
        }))
    }

    async fn logout(&self, token: Option<&str>, cancel: &CancelToken) -> Result<(), VaultError> {
        simulate_latency(self.latency / 3, cancel).await?;
        if let Some(token) = token {
            self.sessions.lock().remove(token);
        }
        Ok(())
    }

    async fn verify_token(&self, token: &str, cancel: &CancelToken) -> Result<User, VaultError> {
        simulate_latency(self.latency / 2, cancel).await?;
        self.sessions
            .lock()
            .get(token)
            .cloned()
            .ok_or_else(|| VaultError::Auth("Invalid or expired token".to_string()))
    }

    async fn update_profile(
        &self,
        current: &User,
        patch: &UserPatch,
        cancel: &CancelToken,
    ) -> Result<User, VaultError> {
        simulate_latency(self.latency, cancel).await?;
        let mut updated = current.clone();
        updated.apply_patch(patch);
        if let Some(token) = &updated.token {
            self.sessions.lock().insert(token.clone(), updated.clone());
        }
        Ok(updated)
    }

    async fn request_password_reset(
        &self,
        email: &str,
        cancel: &CancelToken,
    ) -> Result<(), VaultError> {
        simulate_latency(self.latency, cancel).await?;
        if email.is_empty() {
            return Err(VaultError::Validation { field: "email" });
        }
        Ok(())
    }
}
