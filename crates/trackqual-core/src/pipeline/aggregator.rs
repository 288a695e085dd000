use tracing::{debug, info};

use crate::error::Result;
use crate::frame::{FrameGrid, VideoStack};
use crate::io::discovery::VideoPair;
use crate::io::source::{open_source, read_stack};
use crate::io::tracks::{TrackFormat, TrackIndex, TrackTable};
use crate::spatial::SpatialClassifier;
use crate::stats::{compute_frame_stats, FrameStats};

use super::config::QualityConfig;
use super::types::{FrameSeries, ProgressReporter, VideoReport, VideoStage, VideoSummary};

/// Per-video driver: loads one video and its tracks, scans every frame and
/// reduces the resulting series to a summary row.
///
/// Holds only configuration; nothing carries over between videos.
#[derive(Clone, Debug)]
pub struct VideoAggregator {
    config: QualityConfig,
}

impl VideoAggregator {
    pub fn new(config: QualityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Load, scan and reduce one paired video.
    ///
    /// Errors here are local to the video: an unopenable source or an empty
    /// or malformed track table.
    pub fn process(
        &self,
        pair: &VideoPair,
        track_format: &TrackFormat,
        reporter: &dyn ProgressReporter,
    ) -> Result<VideoReport> {
        reporter.stage(VideoStage::Loading);
        let mut source = open_source(&pair.video)?;
        let stack = read_stack(source.as_mut());
        drop(source);

        let tracks = TrackTable::load(&pair.tracks, track_format)?;
        info!(
            key = %pair.key,
            width = stack.width,
            height = stack.height,
            frames = stack.frame_count(),
            rows = tracks.records.len(),
            "Loaded video"
        );

        Ok(self.process_loaded(pair.identifier(), &stack, &tracks, reporter))
    }

    /// Scan and reduce an already loaded video.
    pub fn process_loaded(
        &self,
        identifier: String,
        stack: &VideoStack,
        tracks: &TrackTable,
        reporter: &dyn ProgressReporter,
    ) -> VideoReport {
        reporter.stage(VideoStage::Scanning);
        let series = self.scan(stack, &tracks.by_time(), reporter);

        reporter.stage(VideoStage::Reducing);
        let summary = VideoSummary::from_series(
            identifier,
            stack.width,
            stack.height,
            &series,
            tracks.distinct_objects(),
        );
        VideoReport { summary, series }
    }

    /// Compute statistics for every frame in time order.
    pub fn scan(
        &self,
        stack: &VideoStack,
        tracks: &TrackIndex,
        reporter: &dyn ProgressReporter,
    ) -> FrameSeries {
        let classifier = SpatialClassifier::new(stack.width, stack.height, &self.config);
        let mut series = FrameSeries::with_capacity(stack.frame_count());

        for (t, frame) in stack.frames.iter().enumerate() {
            let positions = tracks.positions(t);
            let stats = if positions.is_empty() {
                debug!(frame = t, "No annotated objects");
                FrameStats::undefined()
            } else {
                self.frame_stats(&classifier, frame, positions)
            };
            series.push(stats);
            reporter.advance_frames(t + 1);
        }
        series
    }

    /// Statistics of one frame with at least one object.
    ///
    /// Density and count are always computed; the signal statistics only
    /// when both populations reach `min_samples`.
    pub fn frame_stats(
        &self,
        classifier: &SpatialClassifier,
        frame: &FrameGrid,
        positions: &[(f64, f64)],
    ) -> FrameStats {
        let Some(partition) = classifier.classify(positions) else {
            return FrameStats::from_positions(positions);
        };
        if !partition.is_usable(self.config.min_samples) {
            debug!(
                foreground = partition.foreground.len(),
                background = partition.background.len(),
                "Too few samples for signal statistics"
            );
            return FrameStats::from_positions(positions);
        }

        let (fg, bg) = partition.values(frame);
        compute_frame_stats(&fg, &bg, positions)
    }
}
