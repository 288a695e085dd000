use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BACKGROUND_DISTANCE, DEFAULT_FOREGROUND_DISTANCE, DEFAULT_MIN_SAMPLES,
    DEFAULT_SAMPLING_STRIDE, DEFAULT_VIDEO_EXTENSIONS,
};
use crate::error::{QualityError, Result};
use crate::io::tracks::TrackFormat;

/// Thresholds and sampling used by the per-frame classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Stride of the regular pixel sample, in pixels.
    #[serde(default = "default_sampling_stride")]
    pub sampling_stride: usize,
    /// Samples farther than this from every object are background.
    #[serde(default = "default_background_distance")]
    pub background_distance: f64,
    /// Samples closer than this to some object are foreground.
    #[serde(default = "default_foreground_distance")]
    pub foreground_distance: f64,
    /// Minimum size of each population before signal statistics are computed.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

fn default_sampling_stride() -> usize {
    DEFAULT_SAMPLING_STRIDE
}
fn default_background_distance() -> f64 {
    DEFAULT_BACKGROUND_DISTANCE
}
fn default_foreground_distance() -> f64 {
    DEFAULT_FOREGROUND_DISTANCE
}
fn default_min_samples() -> usize {
    DEFAULT_MIN_SAMPLES
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            sampling_stride: DEFAULT_SAMPLING_STRIDE,
            background_distance: DEFAULT_BACKGROUND_DISTANCE,
            foreground_distance: DEFAULT_FOREGROUND_DISTANCE,
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }
}

impl QualityConfig {
    /// Reject settings under which a sample could be both foreground and
    /// background, or no sample could be taken.
    pub fn validate(&self) -> Result<()> {
        if self.sampling_stride == 0 {
            return Err(QualityError::InvalidConfig(
                "sampling_stride must be at least 1".into(),
            ));
        }
        if !self.foreground_distance.is_finite() || self.foreground_distance < 0.0 {
            return Err(QualityError::InvalidConfig(format!(
                "foreground_distance must be finite and non-negative, got {}",
                self.foreground_distance
            )));
        }
        if !self.background_distance.is_finite() || self.background_distance < 0.0 {
            return Err(QualityError::InvalidConfig(format!(
                "background_distance must be finite and non-negative, got {}",
                self.background_distance
            )));
        }
        if self.foreground_distance >= self.background_distance {
            return Err(QualityError::InvalidConfig(format!(
                "foreground_distance ({}) must be below background_distance ({})",
                self.foreground_distance, self.background_distance
            )));
        }
        if self.min_samples == 0 {
            return Err(QualityError::InvalidConfig(
                "min_samples must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Output options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Append a mean heterogeneity column to the summary table.
    #[serde(default)]
    pub include_heterogeneity: bool,
    /// Write one per-frame CSV per video into this directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_series_dir: Option<PathBuf>,
}

/// Everything needed for one run over a dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directories searched recursively for videos.
    pub datasets: Vec<PathBuf>,
    /// Directory searched recursively for track CSVs.
    pub tracks: PathBuf,
    /// Summary table path.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Extensions treated as videos during discovery.
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
    #[serde(default)]
    pub quality: QualityConfig,
    #[serde(default)]
    pub tracks_format: TrackFormat,
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_output() -> PathBuf {
    PathBuf::from("quality_overall.csv")
}

fn default_video_extensions() -> Vec<String> {
    DEFAULT_VIDEO_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl RunConfig {
    pub fn new(datasets: Vec<PathBuf>, tracks: PathBuf) -> Self {
        Self {
            datasets,
            tracks,
            output: default_output(),
            video_extensions: default_video_extensions(),
            quality: QualityConfig::default(),
            tracks_format: TrackFormat::default(),
            report: ReportConfig::default(),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.datasets.is_empty() {
            return Err(QualityError::NoDatasets);
        }
        if self.video_extensions.is_empty() {
            return Err(QualityError::InvalidConfig(
                "video_extensions must not be empty".into(),
            ));
        }
        self.quality.validate()
    }
}
