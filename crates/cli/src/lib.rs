use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use depscope_analysis::{AnalysisError, AnalysisOutcome, Analyzer};
use depscope_discovery::SnapshotRuntime;
use depscope_protocol::{serialize_json, AnalysisOptions, RuntimeSnapshot};
use std::io;
use std::path::PathBuf;

mod config;

use config::{load_options, OptionOverrides};

/// Exit status when the analysis itself reports a failure
const EXIT_ANALYSIS_FAILED: i32 = 2;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "depscope")]
#[command(about = "Service dependency graph analysis for running applications", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only errors (stdout is reserved for JSON)
    #[arg(long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a captured runtime snapshot and print the JSON report
    Analyze(AnalyzeArgs),

    /// Print a JSON schema for one of the input formats
    Schema(SchemaArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Runtime snapshot JSON file
    #[arg(long, short = 's')]
    snapshot: PathBuf,

    /// TOML file with analysis options
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Maximum number of services kept after discovery
    #[arg(long)]
    max_services: Option<usize>,

    /// Skip distribution and complexity metrics
    #[arg(long)]
    no_detailed: bool,

    /// Skip the provider section
    #[arg(long)]
    no_providers: bool,

    /// Skip the visualization section
    #[arg(long)]
    no_visualization: bool,

    /// Require this framework (case-insensitive)
    #[arg(long)]
    framework: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum SchemaTarget {
    Snapshot,
    Options,
}

#[derive(Args)]
struct SchemaArgs {
    /// Which input format to describe
    #[arg(value_enum, default_value = "snapshot")]
    target: SchemaTarget,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Analyze(args) => run_analyze(args).await,
        Commands::Schema(args) => run_schema(&args),
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let options = resolve_options(&args)?;
    log::debug!("Analysis options: {options:?}");

    let outcome = match SnapshotRuntime::load(&args.snapshot).await {
        Ok(runtime) => Analyzer::new(options).run(&runtime).await,
        Err(err) => {
            log::error!("Failed to load snapshot {}: {err}", args.snapshot.display());
            AnalysisOutcome::failure(AnalysisError::from(err).envelope())
        }
    };
    print_stdout(&serialize_json(&outcome, args.pretty)?)?;

    if !outcome.is_success() {
        std::process::exit(EXIT_ANALYSIS_FAILED);
    }
    Ok(())
}

fn resolve_options(args: &AnalyzeArgs) -> Result<AnalysisOptions> {
    let base = load_options(args.config.as_deref())?;
    let overrides = OptionOverrides {
        max_services: args.max_services,
        no_detailed: args.no_detailed,
        no_providers: args.no_providers,
        no_visualization: args.no_visualization,
        framework: args.framework.clone(),
    };
    Ok(overrides.apply(base))
}

fn run_schema(args: &SchemaArgs) -> Result<()> {
    let schema = match args.target {
        SchemaTarget::Snapshot => schemars::schema_for!(RuntimeSnapshot),
        SchemaTarget::Options => schemars::schema_for!(AnalysisOptions),
    };
    print_stdout(&serialize_json(&schema, true)?)
}
