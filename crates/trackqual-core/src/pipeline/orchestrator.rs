use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::io::discovery::{discover_pairs, VideoPair};
use crate::io::report::{write_frame_series, write_summary_csv};
use crate::io::tracks::TrackFormat;

use super::aggregator::VideoAggregator;
use super::config::RunConfig;
use super::types::{NoOpReporter, ProgressReporter, RunReport, SkippedVideo, VideoOutcome};

/// Process already paired videos in key order.
///
/// Failures local to one video are logged and recorded as skipped; the
/// remaining videos are still processed. Only errors that would affect
/// every video abort the run.
pub fn process_pairs(
    pairs: &[VideoPair],
    aggregator: &VideoAggregator,
    track_format: &TrackFormat,
    reporter: &dyn ProgressReporter,
) -> Result<RunReport> {
    let mut ordered: Vec<&VideoPair> = pairs.iter().collect();
    ordered.sort_by(|a, b| a.key.cmp(&b.key));

    reporter.begin_run(ordered.len());
    let mut report = RunReport::default();

    for pair in ordered {
        reporter.begin_video(&pair.key);
        let outcome = match aggregator.process(pair, track_format, reporter) {
            Ok(video) => VideoOutcome::Emitted(Box::new(video)),
            Err(e) if e.is_video_local() => {
                warn!(key = %pair.key, error = %e, "Skipping video");
                VideoOutcome::Skipped(e)
            }
            Err(e) => return Err(e),
        };
        reporter.finish_video(&outcome);

        match outcome {
            VideoOutcome::Emitted(video) => report.videos.push(*video),
            VideoOutcome::Skipped(error) => report.skipped.push(SkippedVideo {
                key: pair.key.clone(),
                error,
            }),
        }
    }

    Ok(report)
}

/// Run discovery, per-video processing and report writing with a
/// thread-safe progress reporter.
pub fn run_quality_reported(
    config: &RunConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<RunReport> {
    config.validate()?;
    let aggregator = VideoAggregator::new(config.quality.clone())?;

    let pairing = discover_pairs(&config.datasets, &config.tracks, &config.video_extensions)?;
    info!(
        pairs = pairing.pairs.len(),
        unmatched_videos = pairing.unmatched_videos,
        unmatched_tracks = pairing.unmatched_tracks,
        "Found valid video/track pairs"
    );
    if pairing.pairs.is_empty() {
        warn!("No video/track pairs found");
    }

    let mut report = process_pairs(
        &pairing.pairs,
        &aggregator,
        &config.tracks_format,
        reporter.as_ref(),
    )?;
    report.unmatched_videos = pairing.unmatched_videos;
    report.unmatched_tracks = pairing.unmatched_tracks;

    let rows: Vec<_> = report.summaries().cloned().collect();
    write_summary_csv(&config.output, &rows, config.report.include_heterogeneity)?;
    info!(
        rows = rows.len(),
        skipped = report.skipped.len(),
        output = %config.output.display(),
        "Written quality metrics"
    );

    if let Some(ref dir) = config.report.frame_series_dir {
        for video in &report.videos {
            write_frame_series(dir, &video.summary.identifier, &video.series)?;
        }
    }

    Ok(report)
}

/// Run the full quality computation without progress reporting.
pub fn run_quality(config: &RunConfig) -> Result<RunReport> {
    run_quality_reported(config, Arc::new(NoOpReporter))
}

