//! Model-View-Intent (MVI) primitives shared by every state container.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot of a container's data
//! - **Intent**: Named request to change state
//! - **Reducer**: Pure function that transforms state based on intents
//! - **Store**: Owns the current state and broadcasts changes to subscribers

mod intent;
mod reducer;
mod state;
mod store;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
pub use store::{RequestCounter, Store};
