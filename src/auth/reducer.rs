use crate::auth::intent::AuthIntent;
use crate::auth::state::AuthState;
use crate::mvi::Reducer;

pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Intent = AuthIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            AuthIntent::Restored { user } => match user {
                Some(user) => state.authenticated(user),
                None => state.anonymous(),
            },
            AuthIntent::RequestStarted { request } => AuthState {
                loading: true,
                latest_request: request,
                ..state
            },
            AuthIntent::Authenticated { request, user } if state.accepts(request) => {
                state.authenticated(user)
            }
            AuthIntent::AuthenticationFailed { request, message } if state.accepts(request) => {
                AuthState {
                    error: Some(message),
                    ..state.anonymous()
                }
            }
            AuthIntent::ProfileUpdated { request, user } if state.accepts(request) => {
                AuthState {
                    user: Some(user),
                    loading: false,
                    error: None,
                    ..state
                }
            }
            AuthIntent::RequestFailed { request, message } if state.accepts(request) => {
                AuthState {
                    loading: false,
                    error: Some(message),
                    ..state
                }
            }
            AuthIntent::RequestSettled { request } if state.accepts(request) => AuthState {
                loading: false,
                ..state
            },
            AuthIntent::LoggedOut { request } => AuthState {
                latest_request: request,
                ..state.anonymous()
            },
            AuthIntent::ClearError => AuthState {
                error: None,
                ..state
            },
            // Response to a superseded request
            _ => state,
        }
    }
}
