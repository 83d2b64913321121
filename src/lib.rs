pub mod detection;
pub mod errors;
pub mod models;

pub use detection::{DetectionOutput, Detector};
pub use errors::{DetectError, Result};
pub use models::{BoundingBox, Detection};

#[cfg(feature = "gui")]
pub mod gui;
