// Command-line driver: blur one picture with every configured strategy,
// time the passes and compare them with the sequential baseline.
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueHint};

use blur_lab::{Experiment, ExperimentConfig, Picture};

#[derive(Parser, Debug)]
#[command(
    name = "blur_experiment",
    version,
    about = "Compare concurrent 3x3 box blur strategies against a sequential baseline"
)]
struct Cli {
    /// Input image (png, jpg, bmp, tiff)
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Directory for blurred outputs and the report
    #[arg(value_hint = ValueHint::DirPath)]
    output_dir: PathBuf,

    /// Experiment config (yaml or json)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Timed passes per strategy, overrides the config
    #[arg(long)]
    repeats: Option<usize>,

    /// Worker count for pooled strategies, overrides the config
    #[arg(long)]
    pool_size: Option<usize>,

    /// Target sector count, overrides the config
    #[arg(long)]
    sectors: Option<usize>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

fn build_config(cli: &Cli) -> Result<ExperimentConfig> {
    let mut config = match &cli.config {
        Some(path) => ExperimentConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ExperimentConfig::default(),
    };

    if let Some(repeats) = cli.repeats {
        config.repeats = repeats;
    }
    if let Some(pool_size) = cli.pool_size {
        config.pool_size = pool_size;
    }
    if let Some(sectors) = cli.sectors {
        config.sectors = sectors;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if common::is_debug() { "debug" } else { "info" };
    common::log_setup::setup_logging(cli.log_level.as_deref().unwrap_or(default_level));

    let config = build_config(&cli)?;
    if cli.output_dir.is_file() {
        bail!("{} is a file, expected a directory", cli.output_dir.display());
    }
    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("creating {}", cli.output_dir.display()))?;

    let picture = Picture::load(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    tracing::info!(
        input = %cli.input.display(),
        width = picture.width(),
        height = picture.height(),
        ?config,
        "Starting experiment"
    );

    let experiment = Experiment::new(config)?;
    let output_dir = cli.output_dir.clone();
    let report = experiment.run_with(&picture, |run, output| {
        output.save(output_dir.join(format!("{}.png", run.label())))
    })?;

    let report_path = cli.output_dir.join("report.yaml");
    common::file_format::save_file(&report, &report_path)
        .with_context(|| format!("writing {}", report_path.display()))?;

    print!("{report}");

    if report.has_failures() {
        bail!("{} strategy passes failed, see the report", report.failed.len());
    }
    if !report.all_match_baseline() {
        bail!("at least one strategy differs from the sequential baseline");
    }
    Ok(())
}
