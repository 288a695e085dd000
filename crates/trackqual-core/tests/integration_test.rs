#[allow(dead_code)]
mod common;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use tempfile::TempDir;

use trackqual_core::error::QualityError;
use trackqual_core::io::report::{HETEROGENEITY_COLUMN, SUMMARY_COLUMNS};
use trackqual_core::pipeline::config::{QualityConfig, RunConfig};
use trackqual_core::pipeline::{
    run_quality, run_quality_reported, ProgressReporter, VideoOutcome, VideoStage,
};

/// Dataset layout with separate video and track directories.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("videos")).unwrap();
        std::fs::create_dir_all(dir.path().join("tracks")).unwrap();
        Self { dir }
    }

    fn videos(&self) -> PathBuf {
        self.dir.path().join("videos")
    }

    fn tracks(&self) -> PathBuf {
        self.dir.path().join("tracks")
    }

    fn add_video(&self, key: &str, width: u32, height: u32, frames: &[Vec<u8>]) {
        common::write_ser(&self.videos().join(format!("{key}.ser")), width, height, frames);
    }

    fn add_tracks(&self, key: &str, rows: &[(i64, f64, f64, i64)]) {
        common::write_tracks(&self.tracks().join(format!("{key}.csv")), rows);
    }

    fn config(&self) -> RunConfig {
        let mut config = RunConfig::new(vec![self.videos()], self.tracks());
        config.output = self.dir.path().join("out/quality_overall.csv");
        config
    }
}

/// Thresholds small enough for a 10x10 frame to hold both populations.
fn small_frame_quality() -> QualityConfig {
    QualityConfig {
        foreground_distance: 1.5,
        background_distance: 3.0,
        ..QualityConfig::default()
    }
}

fn cell<'a>(header: &[String], cells: &'a [String], column: &str) -> &'a str {
    let idx = header
        .iter()
        .skip(1)
        .position(|h| h == column)
        .unwrap_or_else(|| panic!("missing column {column}"));
    &cells[idx]
}

fn population(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Background intensities of a frame, found by brute force.
fn background_values(
    frame: &[u8],
    width: usize,
    objects: &[(usize, usize)],
    threshold: f64,
) -> Vec<f64> {
    frame
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            let (x, y) = ((i % width) as f64, (i / width) as f64);
            objects.iter().all(|&(ox, oy)| {
                let (dx, dy) = (x - ox as f64, y - oy as f64);
                (dx * dx + dy * dy).sqrt() > threshold
            })
        })
        .map(|(_, &v)| v as f64)
        .collect()
}

#[test]
fn test_two_frame_video_with_objects_in_second_frame() {
    let fx = Fixture::new();
    let objects = [(1, 1), (5, 1), (1, 5)];
    let frame = common::spot_frame(10, 10, &objects);
    fx.add_video("clip", 10, 10, &[frame.clone(), frame.clone()]);
    fx.add_tracks(
        "clip",
        &[(1, 1.0, 1.0, 1), (2, 5.0, 1.0, 1), (3, 1.0, 5.0, 1)],
    );

    let mut config = fx.config();
    config.quality = small_frame_quality();
    let report = run_quality(&config).unwrap();

    assert_eq!(report.videos.len(), 1);
    assert!(report.skipped.is_empty());
    let video = &report.videos[0];
    let s = &video.summary;
    assert_eq!(s.identifier, "clip.ser");
    assert_eq!((s.width, s.height, s.frame_count), (10, 10, 2));
    assert_eq!(s.distinct_objects, 3);

    // Frame 0 has no annotations and contributes nothing.
    assert!(video.series.snr[0].is_nan());
    assert!(video.series.num[0].is_nan());
    assert_eq!(s.num_mean, 3.0);
    assert_eq!(s.num_std, 0.0);
    assert_relative_eq!(s.den_mean, 4.0);
    assert_eq!(s.den_std, 0.0);

    // Foreground is exactly the bright blocks.
    let (bg_mean, bg_std) = population(&background_values(&frame, 10, &objects, 3.0));
    assert_relative_eq!(s.snr_mean, (200.0 - bg_mean) / bg_std, epsilon = 1e-9);
    assert_relative_eq!(s.cr_mean, 200.0 / bg_mean, epsilon = 1e-9);
    assert_eq!(s.het_mean, 0.0);

    let (header, rows) = common::read_summary(&config.output);
    assert_eq!(header[0], "");
    assert_eq!(&header[1..], SUMMARY_COLUMNS);
    assert_eq!(rows.len(), 1);
    let (id, cells) = &rows[0];
    assert_eq!(id, "clip.ser");
    assert_eq!(cell(&header, cells, "NUM avg"), "3");
    assert_eq!(cell(&header, cells, "DEN avg"), "4");
    assert_eq!(cell(&header, cells, "W"), "10");
    assert_eq!(cell(&header, cells, "T"), "2");
    assert_eq!(cell(&header, cells, "D"), "1");
    assert_eq!(cell(&header, cells, "dt"), "1");
    assert_eq!(cell(&header, cells, "N.TRACKS"), "3");
    let snr: f64 = cell(&header, cells, "SNR").parse().unwrap();
    assert_relative_eq!(snr, s.snr_mean);
}

#[test]
fn test_tracks_outside_frame_range_give_undefined_row() {
    let fx = Fixture::new();
    fx.add_video("late", 8, 8, &[vec![10; 64], vec![10; 64]]);
    fx.add_tracks("late", &[(1, 2.0, 2.0, 5), (1, 3.0, 3.0, 6)]);

    let config = fx.config();
    let report = run_quality(&config).unwrap();

    let s = &report.videos[0].summary;
    for v in [s.snr_mean, s.cr_mean, s.den_mean, s.den_std, s.num_mean, s.num_std] {
        assert!(v.is_nan());
    }
    assert_eq!(s.frame_count, 2);
    assert_eq!(s.distinct_objects, 1);

    let (header, rows) = common::read_summary(&config.output);
    let cells = &rows[0].1;
    for column in ["SNR", "CR", "DEN avg", "DEN std", "NUM avg", "NUM std"] {
        assert_eq!(cell(&header, cells, column), "", "column {column}");
    }
    assert_eq!(cell(&header, cells, "N.TRACKS"), "1");
}

#[test]
fn test_constant_background_has_undefined_snr() {
    let fx = Fixture::new();
    let mut frame = vec![20u8; 100];
    for r in 3..=5 {
        for c in 3..=5 {
            frame[r * 10 + c] = 200;
        }
    }
    fx.add_video("flat", 10, 10, &[frame]);
    fx.add_tracks("flat", &[(1, 4.0, 4.0, 0)]);

    let mut config = fx.config();
    config.quality = small_frame_quality();
    let report = run_quality(&config).unwrap();

    let s = &report.videos[0].summary;
    assert!(s.snr_mean.is_nan());
    assert_relative_eq!(s.cr_mean, 10.0);
    // A single object has no neighbour.
    assert!(s.den_mean.is_nan());
    assert_eq!(s.num_mean, 1.0);
}

#[test]
fn test_too_few_samples_keeps_density_and_count() {
    let fx = Fixture::new();
    let frame = common::spot_frame(10, 10, &[(2, 2), (6, 6)]);
    fx.add_video("tiny", 10, 10, &[frame]);
    fx.add_tracks("tiny", &[(1, 2.0, 2.0, 0), (2, 6.0, 6.0, 0)]);

    // Default thresholds leave no background in a 10x10 frame.
    let report = run_quality(&fx.config()).unwrap();

    let s = &report.videos[0].summary;
    assert!(s.snr_mean.is_nan());
    assert!(s.cr_mean.is_nan());
    assert_relative_eq!(s.den_mean, 32f64.sqrt());
    assert_eq!(s.num_mean, 2.0);
}

#[test]
fn test_unreadable_videos_are_skipped_and_later_ones_processed() {
    let fx = Fixture::new();
    std::fs::write(fx.videos().join("a_broken.ser"), b"definitely not SER").unwrap();
    fx.add_tracks("a_broken", &[(1, 1.0, 1.0, 0)]);

    fx.add_video("b_empty", 4, 4, &[vec![0; 16]]);
    std::fs::write(fx.tracks().join("b_empty.csv"), "id,x,y,t\n").unwrap();

    fx.add_video("c_good", 4, 4, &[vec![0; 16]]);
    fx.add_tracks("c_good", &[(7, 1.0, 1.0, 0)]);

    fx.add_video("d_unpaired", 4, 4, &[vec![0; 16]]);
    fx.add_tracks("e_unpaired", &[(1, 1.0, 1.0, 0)]);

    let config = fx.config();
    let report = run_quality(&config).unwrap();

    let emitted: Vec<&str> = report.summaries().map(|s| s.identifier.as_str()).collect();
    assert_eq!(emitted, ["c_good.ser"]);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].key, "a_broken");
    assert!(matches!(
        report.skipped[0].error,
        QualityError::CannotOpenSource { .. }
    ));
    assert_eq!(report.skipped[1].key, "b_empty");
    assert!(matches!(
        report.skipped[1].error,
        QualityError::EmptyTrackData { .. }
    ));
    assert_eq!(report.unmatched_videos, 1);
    assert_eq!(report.unmatched_tracks, 1);

    let (_, rows) = common::read_summary(&config.output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "c_good.ser");
}

#[test]
fn test_no_pairs_writes_header_only() {
    let fx = Fixture::new();
    let config = fx.config();
    let report = run_quality(&config).unwrap();

    assert!(report.videos.is_empty());
    let (header, rows) = common::read_summary(&config.output);
    assert_eq!(header.len(), SUMMARY_COLUMNS.len() + 1);
    assert!(rows.is_empty());
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let fx = Fixture::new();
    let objects = [(1, 1), (5, 1), (1, 5)];
    let frame = common::spot_frame(10, 10, &objects);
    fx.add_video("x", 10, 10, &[frame.clone(), frame]);
    fx.add_tracks(
        "x",
        &[(1, 1.0, 1.0, 0), (2, 5.0, 1.0, 0), (3, 1.0, 5.0, 1), (4, 5.0, 1.0, 1)],
    );
    fx.add_video("y", 10, 10, &[common::spot_frame(10, 10, &[(4, 4)])]);
    fx.add_tracks("y", &[(1, 4.0, 4.0, 0)]);

    let mut config = fx.config();
    config.quality = small_frame_quality();
    config.report.include_heterogeneity = true;

    let first = fx.dir.path().join("first.csv");
    let second = fx.dir.path().join("second.csv");
    config.output = first.clone();
    run_quality(&config).unwrap();
    config.output = second.clone();
    run_quality(&config).unwrap();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn test_heterogeneity_column_and_frame_series_export() {
    let fx = Fixture::new();
    let objects = [(1, 1), (5, 1), (1, 5)];
    let frame = common::spot_frame(10, 10, &objects);
    fx.add_video("clip", 10, 10, &[frame.clone(), frame]);
    fx.add_tracks(
        "clip",
        &[(1, 1.0, 1.0, 1), (2, 5.0, 1.0, 1), (3, 1.0, 5.0, 1)],
    );

    let frames_dir = fx.dir.path().join("frames");
    let mut config = fx.config();
    config.quality = small_frame_quality();
    config.report.include_heterogeneity = true;
    config.report.frame_series_dir = Some(frames_dir.clone());
    run_quality(&config).unwrap();

    let (header, rows) = common::read_summary(&config.output);
    assert_eq!(header.last().map(String::as_str), Some(HETEROGENEITY_COLUMN));
    assert_eq!(cell(&header, &rows[0].1, HETEROGENEITY_COLUMN), "0");

    let series = std::fs::read_to_string(frames_dir.join("clip.frames.csv")).unwrap();
    let lines: Vec<&str> = series.lines().collect();
    assert_eq!(lines[0], "t,SNR,CR,HET,DEN,NUM");
    assert_eq!(lines[1], "0,,,,,");
    assert!(lines[2].starts_with("1,"));
    assert!(lines[2].ends_with(",0,4,3"));
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_headerless_tracks_via_config() {
    let fx = Fixture::new();
    fx.add_video("raw", 10, 10, &[common::spot_frame(10, 10, &[(2, 2), (5, 6)])]);
    std::fs::write(fx.tracks().join("raw.csv"), "1,2,2,0\n2,5,6,0\n").unwrap();

    let mut config = fx.config();
    config.tracks_format.has_header = false;
    let report = run_quality(&config).unwrap();

    let s = &report.videos[0].summary;
    assert_eq!(s.num_mean, 2.0);
    assert_relative_eq!(s.den_mean, 5.0);
}

#[test]
fn test_textual_ids_and_fractional_times_still_emit_a_row() {
    let fx = Fixture::new();
    fx.add_video("cells", 10, 10, &[common::spot_frame(10, 10, &[(2, 2), (6, 6)])]);
    std::fs::write(
        fx.tracks().join("cells.csv"),
        "TRACK_ID,x,y,t\ncell_1,2,2,0\ncell_2,6,6,0\ncell_3,4,4,0.5\n",
    )
    .unwrap();

    let config = fx.config();
    let report = run_quality(&config).unwrap();

    assert!(report.skipped.is_empty());
    let s = &report.videos[0].summary;
    assert_eq!(s.distinct_objects, 3);
    assert_eq!(s.num_mean, 2.0);
    assert_relative_eq!(s.den_mean, 32f64.sqrt());

    let (header, rows) = common::read_summary(&config.output);
    assert_eq!(rows[0].0, "cells.ser");
    assert_eq!(cell(&header, &rows[0].1, "N.TRACKS"), "3");
}

#[test]
fn test_invalid_config_aborts_run() {
    let fx = Fixture::new();
    let mut config = fx.config();
    config.quality.foreground_distance = 30.0;

    assert!(matches!(
        run_quality(&config),
        Err(QualityError::InvalidConfig(_))
    ));
    assert!(!Path::new(&config.output).exists());
}

/// Records every callback for inspection.
#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_run(&self, total_videos: usize) {
        self.events.lock().unwrap().push(format!("run {total_videos}"));
    }

    fn begin_video(&self, key: &str) {
        self.events.lock().unwrap().push(format!("video {key}"));
    }

    fn stage(&self, stage: VideoStage) {
        self.events.lock().unwrap().push(format!("stage {stage:?}"));
    }

    fn advance_frames(&self, frames_done: usize) {
        self.events.lock().unwrap().push(format!("frames {frames_done}"));
    }

    fn finish_video(&self, outcome: &VideoOutcome) {
        let tag = match outcome {
            VideoOutcome::Emitted(_) => "emitted",
            VideoOutcome::Skipped(_) => "skipped",
        };
        self.events.lock().unwrap().push(tag.to_string());
    }
}

#[test]
fn test_reporter_sees_stages_in_order() {
    let fx = Fixture::new();
    fx.add_video("only", 4, 4, &[vec![0; 16], vec![0; 16]]);
    fx.add_tracks("only", &[(1, 1.0, 1.0, 0)]);

    let reporter = Arc::new(RecordingReporter::default());
    run_quality_reported(&fx.config(), reporter.clone()).unwrap();

    let events = reporter.events.lock().unwrap().clone();
    assert_eq!(
        events,
        [
            "run 1",
            "video only",
            "stage Loading",
            "stage Scanning",
            "frames 1",
            "frames 2",
            "stage Reducing",
            "emitted",
        ]
    );
}
