use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use trackqual_core::pipeline::config::RunConfig;
use trackqual_core::pipeline::{run_quality_reported, ProgressReporter, VideoOutcome, VideoStage};

use crate::summary::{print_run_results, print_run_summary};

#[derive(Args)]
pub struct ComputeArgs {
    /// Dataset directories searched recursively for videos
    #[arg(long, num_args = 1..)]
    pub datasets: Vec<PathBuf>,

    /// Directory containing the track CSVs
    #[arg(long)]
    pub tracks: Option<PathBuf>,

    /// Run config file (TOML); cannot be combined with the other options
    #[arg(
        long,
        conflicts_with_all = [
            "datasets", "tracks", "output", "stride", "no_header", "heterogeneity", "frames_dir",
        ]
    )]
    pub config: Option<PathBuf>,

    /// Output CSV filename
    #[arg(short, long, default_value = "quality_overall.csv")]
    pub output: PathBuf,

    /// Stride of the pixel sample grid
    #[arg(long, default_value = "1")]
    pub stride: usize,

    /// Track CSVs have no header row
    #[arg(long)]
    pub no_header: bool,

    /// Append a mean heterogeneity column
    #[arg(long)]
    pub heterogeneity: bool,

    /// Also write per-frame statistics into this directory
    #[arg(long)]
    pub frames_dir: Option<PathBuf>,
}

/// Drives an indicatif bar from pipeline progress events.
struct BarReporter {
    pb: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_run(&self, total_videos: usize) {
        self.pb.set_length(total_videos as u64);
    }

    fn begin_video(&self, key: &str) {
        self.pb.set_message(key.to_string());
    }

    fn stage(&self, stage: VideoStage) {
        if stage == VideoStage::Loading {
            self.pb.tick();
        }
    }

    fn finish_video(&self, outcome: &VideoOutcome) {
        if let VideoOutcome::Skipped(e) = outcome {
            self.pb.println(format!("  skipped: {e}"));
        }
        self.pb.inc(1);
    }
}

pub fn run(args: &ComputeArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        RunConfig::load(config_path)
            .with_context(|| format!("Invalid run config {}", config_path.display()))?
    } else {
        build_config_from_args(args)?
    };

    print_run_summary(&config);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = Arc::new(BarReporter { pb: pb.clone() });

    let report = run_quality_reported(&config, reporter)?;
    pb.finish_with_message("Done");

    print_run_results(&report, &config);
    Ok(())
}

fn build_config_from_args(args: &ComputeArgs) -> Result<RunConfig> {
    if args.datasets.is_empty() {
        bail!("--datasets is required when no --config is given");
    }
    let Some(ref tracks) = args.tracks else {
        bail!("--tracks is required when no --config is given");
    };

    let mut config = RunConfig::new(args.datasets.clone(), tracks.clone());
    config.output = args.output.clone();
    config.quality.sampling_stride = args.stride;
    config.tracks_format.has_header = !args.no_header;
    config.report.include_heterogeneity = args.heterogeneity;
    config.report.frame_series_dir = args.frames_dir.clone();
    Ok(config)
}
