use ndarray::Array2;
use std::path::PathBuf;

/// A single decoded grayscale frame.
/// Pixel values are raw 8-bit intensities.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameGrid {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<u8>,
}

impl FrameGrid {
    pub fn new(data: Array2<u8>) -> Self {
        Self { data }
    }

    /// All-zero frame, used in place of a frame the source failed to decode.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            data: Array2::zeros((height, width)),
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Intensity at column `x`, row `y`.
    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.data[[y, x]]
    }
}

/// All frames of one video, indexed by time.
#[derive(Clone, Debug)]
pub struct VideoStack {
    pub frames: Vec<FrameGrid>,
    pub width: usize,
    pub height: usize,
}

impl VideoStack {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Decoded size in bytes (one byte per pixel).
    pub fn byte_size(&self) -> usize {
        self.width * self.height * self.frames.len()
    }
}

/// Container format of a video source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Ser,
    Gif,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ser => write!(f, "SER"),
            Self::Gif => write!(f, "GIF"),
        }
    }
}

/// Metadata about a video source.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub kind: SourceKind,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
}
