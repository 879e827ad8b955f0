//! dupelink - link-based file deduplication for directory trees.
//!
//! dupelink scans a directory tree for files with byte-identical content
//! (filtered by extension), keeps one master copy per content class, and
//! replaces every other copy with a hard or symbolic link to it. The run
//! is stateless and idempotent against the current tree contents.
//!
//! The pipeline is strictly sequential: scan, fingerprint-and-group,
//! select masters and link, report. See [`dedupe::Deduplicator`] for the
//! library entry point.

pub mod cli;
pub mod dedupe;
pub mod duplicates;
pub mod error;
pub mod linker;
pub mod logging;
pub mod progress;
pub mod report;
pub mod scanner;

use std::sync::Arc;

use cli::Cli;
use dedupe::{DedupeConfig, Deduplicator};
use error::ExitCode;
use linker::LinkMode;
use progress::Progress;
use scanner::ExtensionFilter;

/// Run the application logic for parsed CLI arguments.
///
/// # Errors
///
/// Returns an error only for fatal conditions (missing root). Per-file
/// failures are reflected in the exit code instead.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let filter = if cli.extensions.is_empty() {
        ExtensionFilter::default()
    } else {
        ExtensionFilter::new(&cli.extensions)
    };
    let mode = if cli.hard {
        LinkMode::Hardlink
    } else {
        LinkMode::Symlink
    };

    let mut config = DedupeConfig::default()
        .with_mode(mode)
        .with_filter(filter)
        .with_verification(cli.verify);
    if !cli.quiet {
        config = config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let report = Deduplicator::new(config).run(&cli.path)?;

    if !cli.quiet {
        report::print_report(&report, cli.verbose > 0);
    }

    Ok(if report.is_success() {
        ExitCode::Success
    } else {
        ExitCode::PartialFailure
    })
}
