// src/main.rs
use std::fs;
use std::path::PathBuf;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use imu_harmonics::analysis::report;
use imu_harmonics::{
    render_spectrum_png, render_waveform_png, AnalysisConfig, AnalysisPipeline, Channel,
    FileSource, ManualSource, PlotStyle, SeriesSource,
};
/// Harmonic decomposition of a tab-delimited IMU recording.
#[derive(Parser, Debug)]
#[command(name = "imu-harmonics")]
#[command(version)]
struct CliArgs {
    /// Recording to analyze (tab-delimited, header with a `time` column)
    input: Option<PathBuf>,
    /// Analyze the bundled example recording instead of a file
    #[arg(long, conflicts_with = "input")]
    example: bool,
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Channel to decompose, e.g. AccZ or "AsX(°/s)"
    #[arg(long)]
    channel: Option<Channel>,
    /// Ignore spectrum bins below this frequency (Hz)
    #[arg(long)]
    fmin: Option<f64>,
    /// Number of harmonics to keep
    #[arg(long = "harmonics")]
    harmonic_count: Option<usize>,
    /// Print the full report as JSON instead of the text summary
    #[arg(long)]
    json: bool,
    /// Write the JSON report to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Write original and reconstructed values as TSV to this file
    #[arg(long)]
    reconstruction: Option<PathBuf>,
    /// Write waveform.png and spectrum.png into this directory
    #[arg(long)]
    plot_dir: Option<PathBuf>,
    /// List the channels found in the recording and exit
    #[arg(long)]
    list_channels: bool,
}
fn build_config(args: &CliArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(channel) = args.channel {
        config.channel = channel;
    }
    if let Some(fmin) = args.fmin {
        config.min_frequency_hz = fmin;
    }
    if let Some(count) = args.harmonic_count {
        config.harmonic_count = count;
    }
    config.validate()?;
    Ok(config)
}
fn run<S: SeriesSource>(source: S, args: &CliArgs) -> Result<()> {
    let config = build_config(args)?;
    let mut pipeline = AnalysisPipeline::new(source);
    let series = pipeline
        .load_next()
        .context("failed to load recording")?
        .context("source produced no recording")?;
    if args.list_channels {
        for channel in series.channels() {
            println!("{}\t{}", channel.header(), series.finite_values(*channel).len());
        }
        return Ok(());
    }
    if !series.has_channel(config.channel) {
        bail!(
            "channel {} is not in the recording (found: {})",
            config.channel,
            series
                .channels()
                .iter()
                .map(|c| c.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    let analysis = pipeline.analyze(&config)?;
    if args.json {
        println!("{}", report::to_json(&analysis)?);
    } else {
        print!("{}", report::summary(&analysis));
    }
    if let Some(path) = &args.report {
        report::write_json(&analysis, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote report to {}", path.display());
    }
    if let Some(path) = &args.reconstruction {
        match report::reconstruction_tsv(&analysis, &series) {
            Some(tsv) => {
                fs::write(path, tsv).with_context(|| format!("failed to write {}", path.display()))?;
                info!("wrote reconstruction to {}", path.display());
            }
            None => log::warn!("no reconstruction to write"),
        }
    }
    if let Some(dir) = &args.plot_dir {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        let style = PlotStyle::default();
        let wave = render_waveform_png(&series, &analysis, &style)?;
        fs::write(dir.join("waveform.png"), wave)?;
        if let Some(spectrum) = &analysis.spectrum {
            let png = render_spectrum_png(spectrum, &analysis, &style)?;
            fs::write(dir.join("spectrum.png"), png)?;
        }
        info!("wrote charts to {}", dir.display());
    }
    Ok(())
}
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();
    match (&args.input, args.example) {
        (_, true) => run(ManualSource::bundled_example(), &args),
        (Some(path), false) => run(FileSource::new(path), &args),
        (None, false) => bail!("no input given; pass a recording path or --example"),
    }
}
