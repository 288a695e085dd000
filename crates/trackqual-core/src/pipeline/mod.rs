pub mod config;
mod aggregator;
mod orchestrator;
mod types;

pub use aggregator::VideoAggregator;
pub use orchestrator::{process_pairs, run_quality, run_quality_reported};
pub use types::{
    FrameSeries, NoOpReporter, ProgressReporter, RunReport, SkippedVideo, VideoOutcome,
    VideoReport, VideoStage, VideoSummary,
};
