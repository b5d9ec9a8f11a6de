pub mod classifier;
pub mod position;
pub mod tracking;

pub use classifier::TitleClassifier;
pub use position::{PositionStore, Rect};
pub use tracking::TrackedWindow;
