use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::consts::TRACK_EXTENSION;
use crate::error::{QualityError, Result};

/// A video and the track table that shares its base name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoPair {
    /// Base name without extension, shared by both files.
    pub key: String,
    pub video: PathBuf,
    pub tracks: PathBuf,
}

impl VideoPair {
    /// Identifier written to the output table: the video's file name.
    pub fn identifier(&self) -> String {
        self.video
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.key.clone())
    }
}

/// Result of matching videos against track tables.
#[derive(Clone, Debug, Default)]
pub struct Pairing {
    /// Matched pairs, sorted by key.
    pub pairs: Vec<VideoPair>,
    pub unmatched_videos: usize,
    pub unmatched_tracks: usize,
}

/// Find videos under every dataset directory and track CSVs under
/// `track_dir` (recursively) and pair them by base name.
///
/// When several files share a base name the last one in sorted path order
/// wins. Missing directories contribute no files.
pub fn discover_pairs(
    datasets: &[PathBuf],
    track_dir: &Path,
    video_extensions: &[String],
) -> Result<Pairing> {
    if datasets.is_empty() {
        return Err(QualityError::NoDatasets);
    }

    let mut videos: BTreeMap<String, PathBuf> = BTreeMap::new();
    for dir in datasets {
        for path in collect_files(dir, video_extensions)? {
            if let Some(key) = stem(&path) {
                videos.insert(key, path);
            }
        }
    }

    let mut tracks: BTreeMap<String, PathBuf> = BTreeMap::new();
    for path in collect_files(track_dir, &[TRACK_EXTENSION.to_string()])? {
        if let Some(key) = stem(&path) {
            tracks.insert(key, path);
        }
    }

    let mut pairing = Pairing::default();
    for (key, video) in &videos {
        match tracks.get(key) {
            Some(track) => pairing.pairs.push(VideoPair {
                key: key.clone(),
                video: video.clone(),
                tracks: track.clone(),
            }),
            None => {
                debug!(key = %key, "Video has no track table");
                pairing.unmatched_videos += 1;
            }
        }
    }
    pairing.unmatched_tracks = tracks.keys().filter(|k| !videos.contains_key(*k)).count();

    Ok(pairing)
}

/// All files below `root` whose extension matches one of `extensions`
/// (case-insensitive), in sorted path order.
fn collect_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    if !root.is_dir() {
        warn!(path = %root.display(), "Directory not found, skipping");
        return Ok(out);
    }
    walk(root, extensions, &mut out)?;
    out.sort();
    Ok(out)
}

fn walk(dir: &Path, extensions: &[String], out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, extensions, out)?;
        } else if has_extension(&path, extensions) {
            out.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

fn stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}
