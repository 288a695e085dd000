use crate::consts::UNIT_DIMENSION;
use crate::error::QualityError;
use crate::stats::{nan_mean, nan_std, FrameStats};

/// Processing stage of one video, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoStage {
    Loading,
    Scanning,
    Reducing,
}

impl std::fmt::Display for VideoStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading video"),
            Self::Scanning => write!(f, "Scanning frames"),
            Self::Reducing => write!(f, "Reducing series"),
        }
    }
}

/// Per-frame statistics of one video, indexed by time.
#[derive(Clone, Debug, Default)]
pub struct FrameSeries {
    pub snr: Vec<f64>,
    pub cr: Vec<f64>,
    pub het: Vec<f64>,
    pub den: Vec<f64>,
    pub num: Vec<f64>,
}

impl FrameSeries {
    pub fn with_capacity(frames: usize) -> Self {
        Self {
            snr: Vec::with_capacity(frames),
            cr: Vec::with_capacity(frames),
            het: Vec::with_capacity(frames),
            den: Vec::with_capacity(frames),
            num: Vec::with_capacity(frames),
        }
    }

    pub fn push(&mut self, stats: FrameStats) {
        self.snr.push(stats.snr);
        self.cr.push(stats.cr);
        self.het.push(stats.het);
        self.den.push(stats.den);
        self.num.push(stats.num);
    }

    pub fn len(&self) -> usize {
        self.num.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num.is_empty()
    }

    /// Statistics recorded for frame `t`.
    pub fn get(&self, t: usize) -> Option<FrameStats> {
        (t < self.len()).then(|| FrameStats {
            snr: self.snr[t],
            cr: self.cr[t],
            het: self.het[t],
            den: self.den[t],
            num: self.num[t],
        })
    }
}

/// One output row: video-level aggregates plus video metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSummary {
    /// Row key, the video's file name.
    pub identifier: String,
    pub snr_mean: f64,
    pub cr_mean: f64,
    pub het_mean: f64,
    pub den_mean: f64,
    pub den_std: f64,
    pub num_mean: f64,
    pub num_std: f64,
    pub width: usize,
    pub height: usize,
    pub depth: u32,
    pub channels: u32,
    pub frame_count: usize,
    pub spacing_xy: u32,
    pub spacing_z: u32,
    pub frame_interval: u32,
    /// Distinct object ids over the whole track table.
    pub distinct_objects: usize,
}

impl VideoSummary {
    /// Reduce a frame series with NaN-aware mean/std.
    pub fn from_series(
        identifier: String,
        width: usize,
        height: usize,
        series: &FrameSeries,
        distinct_objects: usize,
    ) -> Self {
        Self {
            identifier,
            snr_mean: nan_mean(&series.snr),
            cr_mean: nan_mean(&series.cr),
            het_mean: nan_mean(&series.het),
            den_mean: nan_mean(&series.den),
            den_std: nan_std(&series.den),
            num_mean: nan_mean(&series.num),
            num_std: nan_std(&series.num),
            width,
            height,
            depth: UNIT_DIMENSION,
            channels: UNIT_DIMENSION,
            frame_count: series.len(),
            spacing_xy: UNIT_DIMENSION,
            spacing_z: UNIT_DIMENSION,
            frame_interval: UNIT_DIMENSION,
            distinct_objects,
        }
    }
}

/// A processed video: its summary row and the series it was reduced from.
#[derive(Clone, Debug)]
pub struct VideoReport {
    pub summary: VideoSummary,
    pub series: FrameSeries,
}

/// How one video's processing ended.
#[derive(Debug)]
pub enum VideoOutcome {
    Emitted(Box<VideoReport>),
    Skipped(QualityError),
}

/// A video excluded from the table, with the reason.
#[derive(Debug)]
pub struct SkippedVideo {
    pub key: String,
    pub error: QualityError,
}

/// Result of a full run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per emitted row, in output order.
    pub videos: Vec<VideoReport>,
    pub skipped: Vec<SkippedVideo>,
    pub unmatched_videos: usize,
    pub unmatched_tracks: usize,
}

impl RunReport {
    pub fn summaries(&self) -> impl Iterator<Item = &VideoSummary> {
        self.videos.iter().map(|v| &v.summary)
    }
}

/// Thread-safe progress reporting for a run.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// The run is about to process `total_videos` paired videos.
    fn begin_run(&self, _total_videos: usize) {}

    /// Processing of the video with base name `key` starts.
    fn begin_video(&self, _key: &str) {}

    /// The current video entered a new stage.
    fn stage(&self, _stage: VideoStage) {}

    /// `frames_done` frames of the current video have been scanned.
    fn advance_frames(&self, _frames_done: usize) {}

    /// The current video is finished, emitted or skipped.
    fn finish_video(&self, _outcome: &VideoOutcome) {}
}

/// No-op progress reporter, used when `run_quality` delegates.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
