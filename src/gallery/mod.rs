//! Gallery collection, current gallery and batch selection.

mod container;
mod intent;
mod reducer;
mod state;

pub use container::GalleryContainer;
pub use intent::GalleryIntent;
pub use reducer::GalleryReducer;
pub use state::GalleryState;
