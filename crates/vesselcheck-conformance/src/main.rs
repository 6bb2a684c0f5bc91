//! CLI entrypoint for the vesselcheck conformance run.

use std::io;
use std::path::PathBuf;

use clap::Parser;

use vesselcheck_conformance::{RunTotals, SubjectSet, run_all, subjects};
use vesselcheck_harness::structured_log::LogEmitter;
use vesselcheck_harness::{ColorMode, HarnessConfig, Reporter};

/// Run the array, unique-pointer and shared-pointer suites.
#[derive(Debug, Parser)]
#[command(name = "vesselcheck")]
#[command(about = "Conformance checks for dynamic arrays and smart pointers")]
struct Cli {
    /// Implementations to test.
    #[arg(long, value_enum, default_value_t = SubjectSet::Reference)]
    subjects: SubjectSet,
    /// Report coloring: always or never.
    #[arg(long, default_value = "always")]
    color: String,
    /// Write a JSONL log of every outcome to this path.
    #[arg(long)]
    log: Option<PathBuf>,
    /// Print per-subject counts to stderr after the run.
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = HarnessConfig::new().with_color(ColorMode::from_str_loose(&cli.color));

    let mut log = match &cli.log {
        Some(path) => {
            let run_id = format!("vesselcheck-{}", std::process::id());
            Some(LogEmitter::to_file(path, &run_id)?)
        }
        None => None,
    };

    let subjects = subjects(cli.subjects);
    let mut reporter = Reporter::new(io::stdout().lock(), config.color);
    let summaries = run_all(&subjects, &config, &mut reporter, log.as_mut())?;

    if cli.summary {
        for summary in &summaries {
            eprintln!("{}", summary.one_line());
        }
        let totals = RunTotals::from_summaries(&summaries);
        eprintln!(
            "{} subjects, {} tests, {} executed, {} with failures",
            totals.subjects,
            totals.tests,
            totals.executed,
            totals.failing.len()
        );
    }
    if let Some(path) = &cli.log {
        eprintln!("log written to {}", path.display());
    }

    Ok(())
}
