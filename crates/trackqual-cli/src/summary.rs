use console::Style;
use trackqual_core::pipeline::config::RunConfig;
use trackqual_core::pipeline::RunReport;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    warn: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            warn: Style::new().yellow(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_run_summary(config: &RunConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Quality Metrics"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(15)));
    println!();

    for (i, dir) in config.datasets.iter().enumerate() {
        let label = if i == 0 { "Datasets" } else { "" };
        println!(
            "  {:<14}{}",
            s.label.apply_to(label),
            s.path.apply_to(dir.display())
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Tracks"),
        s.path.apply_to(config.tracks.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Extensions"),
        s.value.apply_to(config.video_extensions.join(", "))
    );
    println!();

    let q = &config.quality;
    println!("  {}", s.header.apply_to("Classification"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Stride"),
        s.value.apply_to(format!("{} px", q.sampling_stride))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Foreground"),
        s.value.apply_to(format!("< {:.2} px", q.foreground_distance))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Background"),
        s.value.apply_to(format!("> {:.2} px", q.background_distance))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Min samples"),
        s.value.apply_to(q.min_samples)
    );
    println!();

    match config.report.frame_series_dir {
        Some(ref dir) => println!(
            "  {:<14}{}",
            s.header.apply_to("Frame series"),
            s.path.apply_to(dir.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.header.apply_to("Frame series"),
            s.disabled.apply_to("disabled")
        ),
    }
    println!();
}

pub fn print_run_results(report: &RunReport, config: &RunConfig) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Rows"),
        s.value.apply_to(report.videos.len())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Skipped"),
        s.value.apply_to(report.skipped.len())
    );
    if report.unmatched_videos + report.unmatched_tracks > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Unpaired"),
            s.warn.apply_to(format!(
                "{} video(s), {} track table(s)",
                report.unmatched_videos, report.unmatched_tracks
            ))
        );
    }
    for skipped in &report.skipped {
        println!(
            "    {} {}",
            s.warn.apply_to(&skipped.key),
            s.label.apply_to(&skipped.error)
        );
    }

    println!(
        "\nWritten quality metrics to: {}",
        s.path.apply_to(config.output.display())
    );
}
