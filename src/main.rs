use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use kira_decodeqc::channels::{ChannelError, load_channel_status};
use kira_decodeqc::cohort::{CohortAggregator, CohortError};
use kira_decodeqc::config::{CohortManifest, ConfigError, ReportSettings};
use kira_decodeqc::pipeline::stage1_load::run_stage1;
use kira_decodeqc::pipeline::stage2_aggregate::run_stage2;
use kira_decodeqc::pipeline::stage3_report::{ReportError, write_channel_table, write_reports};
use kira_decodeqc::report::SummaryData;

#[derive(Debug, Parser)]
#[command(name = "kira-decodeqc", version, about)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Aggregate per-subject decoding curves into group mean and SEM.
    Run(RunArgs),
    /// Build a channel status table from a channel list and a bad-channel list.
    Channels(ChannelArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Cohort manifest (JSON).
    #[arg(long)]
    manifest: PathBuf,
    /// Output directory.
    #[arg(long)]
    out: PathBuf,
    /// Chance level for peak margins; overrides the manifest.
    #[arg(long)]
    chance: Option<f64>,
    /// Start of the peak window in seconds.
    #[arg(long, allow_negative_numbers = true)]
    tmin: Option<f64>,
    /// End of the peak window in seconds.
    #[arg(long, allow_negative_numbers = true)]
    tmax: Option<f64>,
}

#[derive(Debug, Clone, Args)]
struct ChannelArgs {
    /// Channel names, one per line.
    #[arg(long)]
    channels: PathBuf,
    /// Bad channel names, one per line.
    #[arg(long)]
    bads: PathBuf,
    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Cohort(#[from] CohortError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

fn main() {
    let cli = Cli::parse();
    kira_decodeqc::logging::init(cli.verbose);
    if let Err(err) = dispatch(cli.command) {
        tracing::error!("{}", error_chain(&err));
        std::process::exit(1);
    }
}

fn dispatch(command: Command) -> Result<(), AppError> {
    match command {
        Command::Run(args) => run(&args),
        Command::Channels(args) => run_channels(&args),
    }
}

fn run(args: &RunArgs) -> Result<(), AppError> {
    let manifest = CohortManifest::load(&args.manifest)?;
    let settings =
        ReportSettings::resolve(args.chance, manifest.chance_level, args.tmin, args.tmax)?;
    tracing::info!(
        manifest = %args.manifest.display(),
        subjects = manifest.cohort.len(),
        contrasts = manifest.contrasts.len(),
        "starting cohort aggregation"
    );

    let repo = run_stage1(&manifest)?;
    let aggregator = CohortAggregator::new(&repo)?;
    let stage2 = run_stage2(&aggregator, &settings)?;

    let summary = SummaryData {
        tool_name: "kira-decodeqc".to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        chance_level: settings.chance_level,
        window: stage2.window,
        cohort: repo.cohort()?.to_vec(),
        times: repo.time_axis()?.clone(),
        reports: stage2.reports,
        aggregate: stage2.aggregate,
    };

    write_reports(&summary, &repo, &args.out)?;
    Ok(())
}

fn run_channels(args: &ChannelArgs) -> Result<(), AppError> {
    let table = load_channel_status(&args.channels, &args.bads)?;
    write_channel_table(&table, &args.out)?;
    Ok(())
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
