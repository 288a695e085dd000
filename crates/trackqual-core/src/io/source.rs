use std::path::Path;

use tracing::{debug, warn};

use crate::error::{QualityError, Result};
use crate::frame::{FrameGrid, SourceInfo, VideoStack};

use super::gif::GifSource;
use super::ser::SerSource;

/// A decoded video that yields grayscale frames in time order.
///
/// Dropping the source releases the underlying file.
pub trait FrameSource {
    fn info(&self) -> &SourceInfo;

    /// `(width, height, frame_count)` as declared by the container.
    fn dimensions(&self) -> (usize, usize, usize) {
        let info = self.info();
        (
            info.width as usize,
            info.height as usize,
            info.total_frames,
        )
    }

    /// Next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Option<Result<FrameGrid>>;
}

/// Open a video source, choosing the decoder from the file extension.
///
/// Every failure is reported as [`QualityError::CannotOpenSource`].
pub fn open_source(path: &Path) -> Result<Box<dyn FrameSource>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let opened: Result<Box<dyn FrameSource>> = match ext.as_deref() {
        Some("ser") => SerSource::open(path).map(|s| Box::new(s) as Box<dyn FrameSource>),
        Some("gif") => GifSource::open(path).map(|s| Box::new(s) as Box<dyn FrameSource>),
        _ => {
            return Err(QualityError::CannotOpenSource {
                path: path.to_path_buf(),
                reason: "unsupported container".into(),
            })
        }
    };

    opened.map_err(|e| match e {
        QualityError::CannotOpenSource { .. } => e,
        other => QualityError::CannotOpenSource {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })
}

/// Decode every frame of a source into memory.
///
/// The stack always holds exactly the declared frame count. A frame that
/// fails to decode, has the wrong shape, or is missing because the stream
/// ended early stays all-zero.
pub fn read_stack(source: &mut dyn FrameSource) -> VideoStack {
    let (width, height, total) = source.dimensions();
    let mut frames = Vec::with_capacity(total);

    for t in 0..total {
        let frame = match source.next_frame() {
            Some(Ok(frame)) if frame.width() == width && frame.height() == height => frame,
            Some(Ok(frame)) => {
                warn!(
                    frame = t,
                    got_width = frame.width(),
                    got_height = frame.height(),
                    "Frame shape differs from header, using blank frame"
                );
                FrameGrid::blank(width, height)
            }
            Some(Err(e)) => {
                warn!(frame = t, error = %e, "Frame decode failed, using blank frame");
                FrameGrid::blank(width, height)
            }
            None => {
                debug!(frame = t, "Stream ended early, using blank frame");
                FrameGrid::blank(width, height)
            }
        };
        frames.push(frame);
    }

    VideoStack {
        frames,
        width,
        height,
    }
}
