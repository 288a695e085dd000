/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Pixel scale of the reference acquisition, in pixels per micron.
pub const PIXEL_SCALE: f64 = 0.8;

/// Default distance (pixels) beyond which a sample counts as background.
pub const DEFAULT_BACKGROUND_DISTANCE: f64 = 20.0 / PIXEL_SCALE;

/// Default distance (pixels) below which a sample counts as foreground.
pub const DEFAULT_FOREGROUND_DISTANCE: f64 = 3.0 / PIXEL_SCALE;

/// Default stride of the regular pixel sample grid.
pub const DEFAULT_SAMPLING_STRIDE: usize = 1;

/// Minimum foreground and background population size for signal statistics.
pub const DEFAULT_MIN_SAMPLES: usize = 3;

/// Stand-in for the self-distance when searching the minimum pairwise distance.
/// A minimum equal to this value means no pair was found.
pub const DENSITY_SENTINEL: f64 = 9999.0;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Depth, channel count, voxel spacing and frame interval written for every
/// video. Reserved for multi-dimensional inputs.
pub const UNIT_DIMENSION: u32 = 1;

/// Default file extensions treated as video sources during discovery.
pub const DEFAULT_VIDEO_EXTENSIONS: [&str; 2] = ["ser", "gif"];

/// File extension of track tables.
pub const TRACK_EXTENSION: &str = "csv";
