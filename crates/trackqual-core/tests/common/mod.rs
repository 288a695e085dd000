use std::path::{Path, PathBuf};

use trackqual_core::io::ser::SER_HEADER_SIZE;

/// Build a SER file header for mono 8-bit frames.
///
/// Returns a `Vec<u8>` containing just the 178-byte header.
/// Append frame pixel data after calling this function.
pub fn build_ser_header(width: u32, height: u32, num_frames: usize) -> Vec<u8> {
    build_ser_header_full(width, height, 8, num_frames, 0)
}

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 8..=11=BAYER, 100=RGB, 101=BGR
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID (4 bytes)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID (4 bytes)
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    // Width
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    // Height
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    // PixelDepth
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    // FrameCount
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer, Instrument, Telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 120]);
    // DateTime, DateTimeUTC (8 bytes each)
    buf.extend_from_slice(&[0u8; 16]);

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Build a complete synthetic mono 8-bit SER file with the given frame data.
pub fn build_ser_with_frames(width: u32, height: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header(width, height, frames.len());
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Frame with a dark background and a bright 3x3 block centred on each object.
pub fn spot_frame(width: usize, height: usize, objects: &[(usize, usize)]) -> Vec<u8> {
    let mut data: Vec<u8> = (0..width * height).map(|i| 20 + (i % 3) as u8).collect();
    for &(x, y) in objects {
        for r in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for c in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                data[r * width + c] = 200;
            }
        }
    }
    data
}

/// Write a SER file at `path`.
pub fn write_ser(path: &Path, width: u32, height: u32, frames: &[Vec<u8>]) {
    std::fs::write(path, build_ser_with_frames(width, height, frames)).expect("write SER");
}

/// Write a track CSV with a header row. Rows are `(id, x, y, t)`.
pub fn write_tracks(path: &Path, rows: &[(i64, f64, f64, i64)]) -> PathBuf {
    let mut out = String::from("id,x,y,t\n");
    for (id, x, y, t) in rows {
        out.push_str(&format!("{id},{x},{y},{t}\n"));
    }
    std::fs::write(path, out).expect("write tracks");
    path.to_path_buf()
}

/// Read a summary CSV back as (identifier, cells) rows, header excluded.
pub fn read_summary(path: &Path) -> (Vec<String>, Vec<(String, Vec<String>)>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .expect("open summary");
    let header = reader
        .headers()
        .expect("summary header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| {
            let r = r.expect("summary row");
            let cells: Vec<String> = r.iter().map(str::to_string).collect();
            (cells[0].clone(), cells[1..].to_vec())
        })
        .collect();
    (header, rows)
}
