use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QualityError, Result};

/// Column positions of the track table.
const COL_ID: usize = 0;
const COL_X: usize = 1;
const COL_Y: usize = 2;
const COL_T: usize = 3;
const MIN_COLUMNS: usize = 4;

/// Layout options for track CSV files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackFormat {
    /// Skip the first row as a header.
    #[serde(default = "default_has_header")]
    pub has_header: bool,
}

fn default_has_header() -> bool {
    true
}

impl Default for TrackFormat {
    fn default() -> Self {
        Self { has_header: true }
    }
}

/// One observed object in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackRecord {
    /// Opaque identity; numeric ids are normalised so `3` and `3.0` agree.
    pub object_id: String,
    pub x: f64,
    pub y: f64,
    /// `None` when the time is not a whole number; such rows match no frame.
    pub time_index: Option<i64>,
}

/// All track rows of one video.
#[derive(Clone, Debug)]
pub struct TrackTable {
    pub path: PathBuf,
    pub records: Vec<TrackRecord>,
}

impl TrackTable {
    /// Load a track CSV. Columns are read by position; extra columns are ignored.
    ///
    /// A table without data rows is [`QualityError::EmptyTrackData`].
    pub fn load(path: &Path, format: &TrackFormat) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(format.has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let malformed = |reason: String| QualityError::MalformedTrackTable {
                path: path.to_path_buf(),
                line,
                reason,
            };

            if row.len() < MIN_COLUMNS {
                return Err(malformed(format!(
                    "expected at least {MIN_COLUMNS} columns, got {}",
                    row.len()
                )));
            }

            let object_id = normalize_id(&row[COL_ID]);
            let x = parse_coordinate(&row[COL_X])
                .ok_or_else(|| malformed(format!("bad x {:?}", &row[COL_X])))?;
            let y = parse_coordinate(&row[COL_Y])
                .ok_or_else(|| malformed(format!("bad y {:?}", &row[COL_Y])))?;
            let time_index = parse_time(&row[COL_T])
                .ok_or_else(|| malformed(format!("bad time index {:?}", &row[COL_T])))?;

            records.push(TrackRecord {
                object_id,
                x,
                y,
                time_index,
            });
        }

        if records.is_empty() {
            return Err(QualityError::EmptyTrackData {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Number of distinct object identities across the whole table.
    pub fn distinct_objects(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.object_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Group positions by time index, preserving row order within a frame.
    pub fn by_time(&self) -> TrackIndex {
        let mut frames: BTreeMap<i64, Vec<(f64, f64)>> = BTreeMap::new();
        for r in &self.records {
            if let Some(t) = r.time_index {
                frames.entry(t).or_default().push((r.x, r.y));
            }
        }
        TrackIndex { frames }
    }
}

/// Object positions per time index.
#[derive(Clone, Debug, Default)]
pub struct TrackIndex {
    frames: BTreeMap<i64, Vec<(f64, f64)>>,
}

impl TrackIndex {
    /// Positions annotated in frame `t`; empty when none.
    pub fn positions(&self, t: usize) -> &[(f64, f64)] {
        i64::try_from(t)
            .ok()
            .and_then(|t| self.frames.get(&t))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Integers may be written as floats ("3.0") by some exporters.
fn parse_integral(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// Numeric time, `Some(None)` when it has a fractional part.
fn parse_time(s: &str) -> Option<Option<i64>> {
    if let Some(t) = parse_integral(s) {
        return Some(Some(t));
    }
    s.parse::<f64>().ok().map(|_| None)
}

fn normalize_id(s: &str) -> String {
    match parse_integral(s) {
        Some(id) => id.to_string(),
        None => s.to_string(),
    }
}

fn parse_coordinate(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integral_accepts_float_notation() {
        assert_eq!(parse_integral("7"), Some(7));
        assert_eq!(parse_integral("7.0"), Some(7));
        assert_eq!(parse_integral("-2"), Some(-2));
        assert_eq!(parse_integral("7.5"), None);
        assert_eq!(parse_integral("abc"), None);
    }

    #[test]
    fn test_parse_time_keeps_fractional_as_unmatched() {
        assert_eq!(parse_time("4"), Some(Some(4)));
        assert_eq!(parse_time("4.0"), Some(Some(4)));
        assert_eq!(parse_time("2.5"), Some(None));
        assert_eq!(parse_time("soon"), None);
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("3.0"), "3");
        assert_eq!(normalize_id("cell_1"), "cell_1");
    }

    #[test]
    fn test_parse_coordinate_rejects_non_finite() {
        assert_eq!(parse_coordinate("1.25"), Some(1.25));
        assert_eq!(parse_coordinate("NaN"), None);
        assert_eq!(parse_coordinate("inf"), None);
    }
}
