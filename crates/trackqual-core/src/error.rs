use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QualityError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open video source {path}: {reason}")]
    CannotOpenSource { path: PathBuf, reason: String },

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Track table {path} has no rows")]
    EmptyTrackData { path: PathBuf },

    #[error("Malformed track table {path}, line {line}: {reason}")]
    MalformedTrackTable {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No dataset directories given")]
    NoDatasets,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl QualityError {
    /// Per-video failures that skip the video instead of aborting the run.
    pub fn is_video_local(&self) -> bool {
        matches!(
            self,
            Self::CannotOpenSource { .. }
                | Self::InvalidSer(_)
                | Self::InvalidDimensions { .. }
                | Self::FrameIndexOutOfRange { .. }
                | Self::EmptyTrackData { .. }
                | Self::MalformedTrackTable { .. }
                | Self::Csv(_)
                | Self::ImageError(_)
                | Self::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, QualityError>;
