pub mod density;
pub mod frame;
pub mod reduce;

pub use density::min_pairwise_distance;
pub use frame::{compute_frame_stats, signal_stats, FrameStats, SignalStats};
pub use reduce::{nan_mean, nan_std};
