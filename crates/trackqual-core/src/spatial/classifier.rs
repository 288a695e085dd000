use ndarray::Array2;

use crate::frame::FrameGrid;
use crate::pipeline::config::QualityConfig;

use super::distance::distance_transform;

/// Regular grid of `(x, y)` sample coordinates spanning a frame,
/// row-major (y outer, x inner).
#[derive(Clone, Debug, PartialEq)]
pub struct PixelSample {
    points: Vec<(usize, usize)>,
}

impl PixelSample {
    pub fn regular(width: usize, height: usize, stride: usize) -> Self {
        let stride = stride.max(1);
        let points = (0..height)
            .step_by(stride)
            .flat_map(|y| (0..width).step_by(stride).map(move |x| (x, y)))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[(usize, usize)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sample coordinates split by proximity to annotated objects.
/// Points in the band between the two thresholds belong to neither set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
    pub foreground: Vec<(usize, usize)>,
    pub background: Vec<(usize, usize)>,
}

impl Partition {
    /// Both populations hold at least `min_samples` points.
    pub fn is_usable(&self, min_samples: usize) -> bool {
        self.foreground.len() >= min_samples && self.background.len() >= min_samples
    }

    /// Intensities of the foreground and background points in `frame`.
    pub fn values(&self, frame: &FrameGrid) -> (Vec<u8>, Vec<u8>) {
        let fg = self.foreground.iter().map(|&(x, y)| frame.at(x, y)).collect();
        let bg = self.background.iter().map(|&(x, y)| frame.at(x, y)).collect();
        (fg, bg)
    }
}

/// Foreground/background classifier for frames of one video.
///
/// Holds the frame extent, the two distance thresholds and the pixel sample,
/// all fixed for the lifetime of one video.
#[derive(Clone, Debug)]
pub struct SpatialClassifier {
    width: usize,
    height: usize,
    foreground_distance: f64,
    background_distance: f64,
    sample: PixelSample,
}

impl SpatialClassifier {
    pub fn new(width: usize, height: usize, config: &QualityConfig) -> Self {
        Self {
            width,
            height,
            foreground_distance: config.foreground_distance,
            background_distance: config.background_distance,
            sample: PixelSample::regular(width, height, config.sampling_stride),
        }
    }

    pub fn sample(&self) -> &PixelSample {
        &self.sample
    }

    /// Occupancy grid with one cell marked per object.
    ///
    /// Positions are rounded half-to-even and clamped into the frame;
    /// objects landing on the same cell collapse into one.
    pub fn occupancy(&self, positions: &[(f64, f64)]) -> Array2<bool> {
        let mut grid = Array2::from_elem((self.height, self.width), false);
        if self.width == 0 || self.height == 0 {
            return grid;
        }

        let max_x = self.width as i64 - 1;
        let max_y = self.height as i64 - 1;
        for &(x, y) in positions {
            let col = (x.round_ties_even() as i64).clamp(0, max_x) as usize;
            let row = (y.round_ties_even() as i64).clamp(0, max_y) as usize;
            grid[[row, col]] = true;
        }
        grid
    }

    /// Distance from every pixel to the nearest object, or `None` when the
    /// frame has no objects.
    pub fn distance_field(&self, positions: &[(f64, f64)]) -> Option<Array2<f64>> {
        if positions.is_empty() {
            return None;
        }
        distance_transform(&self.occupancy(positions))
    }

    /// Split the sample by a precomputed distance field.
    pub fn partition(&self, field: &Array2<f64>) -> Partition {
        let mut partition = Partition::default();
        for &(x, y) in self.sample.points() {
            let d = field[[y, x]];
            if d > self.background_distance {
                partition.background.push((x, y));
            } else if d < self.foreground_distance {
                partition.foreground.push((x, y));
            }
        }
        partition
    }

    /// Classify the sample for one frame's object positions.
    ///
    /// Returns `None` when there are no objects.
    pub fn classify(&self, positions: &[(f64, f64)]) -> Option<Partition> {
        self.distance_field(positions).map(|field| self.partition(&field))
    }
}
