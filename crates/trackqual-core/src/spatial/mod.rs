pub mod classifier;
pub mod distance;

pub use classifier::{Partition, PixelSample, SpatialClassifier};
pub use distance::distance_transform;
