pub mod discovery;
pub mod gif;
pub mod report;
pub mod ser;
pub mod source;
pub mod tracks;

pub use discovery::{discover_pairs, Pairing, VideoPair};
pub use source::{open_source, read_stack, FrameSource};
pub use tracks::{TrackFormat, TrackIndex, TrackRecord, TrackTable};
