//! CLI entrypoint for the FrankenCRT conformance harness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use frankencrt_core::NanSignPolicy;
use frankencrt_harness::session::default_run_id;
use frankencrt_harness::{GROUPS, RunOptions, run_session};

/// Conformance checks for the host C runtime.
#[derive(Debug, Parser)]
#[command(name = "harness")]
#[command(about = "Conformance testing harness for the host C runtime")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Arguments for the default `run` command.
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run test groups (default).
    Run(RunArgs),
    /// List registered test groups.
    List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NanPreservation {
    Ignore,
    Enforce,
}

impl From<NanPreservation> for NanSignPolicy {
    fn from(value: NanPreservation) -> Self {
        match value {
            NanPreservation::Ignore => Self::Ignore,
            NanPreservation::Enforce => Self::Enforce,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
struct RunArgs {
    /// Only run the named group (repeatable).
    #[arg(long = "group", value_name = "NAME")]
    groups: Vec<String>,
    /// NaN sign-bit policy; overrides FRANKENCRT_NAN_PRESERVATION.
    #[arg(long, value_enum)]
    nan_preservation: Option<NanPreservation>,
    /// Structured JSONL log path.
    #[arg(long)]
    log: Option<PathBuf>,
    /// JSON report path.
    #[arg(long)]
    report_json: Option<PathBuf>,
    /// Markdown report path.
    #[arg(long)]
    report_md: Option<PathBuf>,
    /// Artifact index path (hashes of the log and reports).
    #[arg(long)]
    artifact_index: Option<PathBuf>,
    /// Run identifier used in trace ids and the artifact index.
    #[arg(long)]
    run_id: Option<String>,
    /// Do not print one line per failed check.
    #[arg(long)]
    quiet: bool,
}

impl From<RunArgs> for RunOptions {
    fn from(args: RunArgs) -> Self {
        Self {
            groups: args.groups,
            nan_preservation: args.nan_preservation.map(NanSignPolicy::from),
            log: args.log,
            report_json: args.report_json,
            report_md: args.report_md,
            artifact_index: args.artifact_index,
            quiet: args.quiet,
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let args = match cli.command {
        Some(Command::List) => {
            let width = GROUPS.iter().map(|g| g.name.len()).max().unwrap_or(0);
            for group in GROUPS {
                println!("{:width$}  {}", group.name, group.description);
            }
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Run(args)) => args,
        None => cli.run,
    };

    let run_id = args.run_id.clone().unwrap_or_else(default_run_id);
    let summary = run_session(&RunOptions::from(args), &run_id)?;
    println!("{}", summary.summary_line());
    if let Some(line) = summary.skip_line() {
        println!("{line}");
    }
    Ok(ExitCode::from(summary.exit_code()))
}
