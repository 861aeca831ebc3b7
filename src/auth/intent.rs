use crate::model::User;
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum AuthIntent {
    /// Session bootstrap finished. `None` means no usable persisted session.
    Restored { user: Option<User> },
    /// An asynchronous request was issued; it becomes the only one whose
    /// response is honoured.
    RequestStarted { request: u64 },
    /// Login, registration or token verification succeeded.
    Authenticated { request: u64, user: User },
    /// Login, registration or token verification failed. Leaves the user anonymous.
    AuthenticationFailed { request: u64, message: String },
    ProfileUpdated { request: u64, user: User },
    /// A request that does not affect authentication failed.
    RequestFailed { request: u64, message: String },
    /// Finished without a payload: cancelled, or nothing to store.
    RequestSettled { request: u64 },
    /// Also supersedes any request still in flight.
    LoggedOut { request: u64 },
    ClearError,
}

impl Intent for AuthIntent {}
