use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageDecoder, RgbaImage};
use ndarray::Array2;

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{QualityError, Result};
use crate::frame::{FrameGrid, SourceInfo, SourceKind};

use super::source::FrameSource;

/// Frame source over an animated GIF.
///
/// The GIF container carries no frame count, so all frames are composited and
/// converted on open; `next_frame` then hands them out in order.
pub struct GifSource {
    info: SourceInfo,
    frames: VecDeque<FrameGrid>,
}

impl GifSource {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let decoder = GifDecoder::new(reader)?;
        let (width, height) = decoder.dimensions();
        if width == 0 || height == 0 {
            return Err(QualityError::InvalidDimensions { width, height });
        }

        let frames: VecDeque<FrameGrid> = decoder
            .into_frames()
            .collect_frames()?
            .iter()
            .map(|frame| rgba_to_gray(frame.buffer()))
            .collect();

        let info = SourceInfo {
            filename: path.to_path_buf(),
            kind: SourceKind::Gif,
            total_frames: frames.len(),
            width,
            height,
            bit_depth: 8,
        };

        Ok(Self { info, frames })
    }
}

impl FrameSource for GifSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Option<Result<FrameGrid>> {
        self.frames.pop_front().map(Ok)
    }
}

/// BT.601 luminance of an RGBA buffer; alpha is ignored.
fn rgba_to_gray(buffer: &RgbaImage) -> FrameGrid {
    let (w, h) = buffer.dimensions();
    let mut data = Array2::<u8>::zeros((h as usize, w as usize));
    for (col, row, pixel) in buffer.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        let luma = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
        data[[row as usize, col as usize]] = luma.round().clamp(0.0, 255.0) as u8;
    }
    FrameGrid::new(data)
}
