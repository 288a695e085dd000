use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::pipeline::{FrameSeries, VideoSummary};

/// Summary table columns after the unnamed identifier column.
pub const SUMMARY_COLUMNS: [&str; 15] = [
    "SNR", "CR", "DEN avg", "DEN std", "NUM avg", "NUM std", "W", "H", "D", "C", "T", "dxy",
    "dz", "dt", "N.TRACKS",
];

/// Optional trailing column holding the mean heterogeneity.
pub const HETEROGENEITY_COLUMN: &str = "HET";

/// Per-frame export columns.
pub const FRAME_SERIES_COLUMNS: [&str; 6] = ["t", "SNR", "CR", "HET", "DEN", "NUM"];

/// Write the summary table, one row per video, keyed by identifier.
/// Undefined values are written as empty cells.
pub fn write_summary_table<W: Write>(
    writer: W,
    rows: &[VideoSummary],
    include_heterogeneity: bool,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(SUMMARY_COLUMNS.len() + 2);
    header.push("");
    header.extend(SUMMARY_COLUMNS);
    if include_heterogeneity {
        header.push(HETEROGENEITY_COLUMN);
    }
    csv.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.identifier.clone(),
            fmt_value(row.snr_mean),
            fmt_value(row.cr_mean),
            fmt_value(row.den_mean),
            fmt_value(row.den_std),
            fmt_value(row.num_mean),
            fmt_value(row.num_std),
            row.width.to_string(),
            row.height.to_string(),
            row.depth.to_string(),
            row.channels.to_string(),
            row.frame_count.to_string(),
            row.spacing_xy.to_string(),
            row.spacing_z.to_string(),
            row.frame_interval.to_string(),
            row.distinct_objects.to_string(),
        ];
        if include_heterogeneity {
            record.push(fmt_value(row.het_mean));
        }
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the summary table to `path`, creating parent directories.
pub fn write_summary_csv(
    path: &Path,
    rows: &[VideoSummary],
    include_heterogeneity: bool,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_summary_table(File::create(path)?, rows, include_heterogeneity)
}

/// Write one video's per-frame series to `<dir>/<stem>.frames.csv`, where
/// `stem` is the identifier without its extension.
pub fn write_frame_series(dir: &Path, identifier: &str, series: &FrameSeries) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let stem = Path::new(identifier)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| identifier.to_string());
    let path = dir.join(format!("{stem}.frames.csv"));
    let mut csv = csv::Writer::from_path(&path)?;
    csv.write_record(FRAME_SERIES_COLUMNS)?;

    for t in 0..series.len() {
        csv.write_record([
            t.to_string(),
            fmt_value(series.snr[t]),
            fmt_value(series.cr[t]),
            fmt_value(series.het[t]),
            fmt_value(series.den[t]),
            fmt_value(series.num[t]),
        ])?;
    }

    csv.flush()?;
    Ok(path)
}

fn fmt_value(v: f64) -> String {
    if v.is_nan() { String::new() } else { v.to_string() }
}
