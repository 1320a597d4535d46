use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use sweep_gather::{ClassificationSets, ExternalTools, ReportAccumulator, ReportDocument};
use sweep_reconcile::{filter_case_export, OperatorRegistry};

#[derive(Parser)]
#[command(name = "cluster-sweep")]
#[command(about = "Report installed operators for clusters seen in support cases but absent from telemetry", long_about = None)]
#[command(version)]
struct Cli {
    /// Case-tracking CSV export (case number, cluster id, attachment UUID, account number)
    #[arg(long)]
    case_export: PathBuf,

    /// Line-delimited telemetry inventory; repeat to narrow against several sources in sequence
    #[arg(long = "telemetry", required = true)]
    telemetry: Vec<PathBuf>,

    /// Line-delimited certified-operator reference list (repeatable)
    #[arg(long = "certified-list", required = true)]
    certified_lists: Vec<PathBuf>,

    /// Line-delimited Red Hat operator reference list (repeatable)
    #[arg(long = "redhat-list", required = true)]
    redhat_lists: Vec<PathBuf>,

    /// Destination for the filtered case export
    #[arg(long, default_value = "missing_clusters.csv")]
    filtered_output: PathBuf,

    /// Directory holding one working subdirectory per cluster
    #[arg(long, default_value = "attachments")]
    attachments_dir: PathBuf,

    /// Path of the accumulated JSON report
    #[arg(long, default_value = "operators-report.json")]
    report: PathBuf,

    /// Attachment-fetch binary
    #[arg(long, default_value = "/usr/bin/redhat-support-tool")]
    support_tool: PathBuf,

    /// Cluster-inspection binary
    #[arg(long, default_value = "omg")]
    inspect_tool: PathBuf,

    /// Let each reference-list combination keep its full set instead of the
    /// historical first-caller-wins deduplication across the two combinations
    #[arg(long)]
    independent_lists: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut registry = if cli.independent_lists {
        OperatorRegistry::independent()
    } else {
        OperatorRegistry::exclusive()
    };
    let certified = registry
        .combine(&cli.certified_lists)
        .context("Failed to combine certified operator lists")?;
    let redhat = registry
        .combine(&cli.redhat_lists)
        .context("Failed to combine Red Hat operator lists")?;
    log::debug!(
        "Combined {} distinct reference names ({} certified, {} redhat)",
        registry.registered(),
        certified.len(),
        redhat.len()
    );
    let sets = ClassificationSets::from_combined(certified, redhat);

    let mut input = cli.case_export.as_path();
    for telemetry in &cli.telemetry {
        filter_case_export(input, telemetry, &cli.filtered_output).with_context(|| {
            format!(
                "Failed to filter {} against {}",
                input.display(),
                telemetry.display()
            )
        })?;
        input = cli.filtered_output.as_path();
    }
    log::info!(
        "Filtered case export written to {}",
        cli.filtered_output.display()
    );

    fs::create_dir_all(&cli.attachments_dir).with_context(|| {
        format!(
            "Failed to create attachments directory {}",
            cli.attachments_dir.display()
        )
    })?;
    let mut document = ReportDocument::open(&cli.report)
        .with_context(|| format!("Failed to open report {}", cli.report.display()))?;

    let tools = ExternalTools::new(&cli.support_tool, &cli.inspect_tool);
    let accumulator = ReportAccumulator::new(&tools, &cli.attachments_dir);
    let appended = accumulator
        .run(&cli.filtered_output, &sets, &mut document)
        .context("Report accumulation failed")?;

    log::info!(
        "Recorded {appended} clusters into {}",
        cli.report.display()
    );
    Ok(())
}
