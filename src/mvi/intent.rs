//! Base trait for intents in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (select a photo, toggle the theme)
/// - Service responses (galleries loaded, login failed)
/// - Timers (notification expired)
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
