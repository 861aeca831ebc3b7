//! Current-user and session state.

mod container;
mod intent;
mod reducer;
mod state;

pub use container::AuthContainer;
pub use intent::AuthIntent;
pub use reducer::AuthReducer;
pub use state::{AuthPhase, AuthState};
