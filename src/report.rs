//! Run summary rendering.
//!
//! The final summary line has a fixed shape that downstream callers parse
//! (`saving <X.XX> MB`), so it is assembled here in one place and covered
//! by tests. Everything else is free-form.

use bytesize::ByteSize;
use yansi::Paint;

use crate::dedupe::DedupeReport;

/// The exact final summary line.
///
/// Callers pattern-match on the `saving <number> MB` tail; do not change
/// the shape without coordinating with them.
#[must_use]
pub fn summary_line(report: &DedupeReport) -> String {
    format!(
        "Deduplication complete: {} files replaced with {}s, saving {:.2} MB.",
        report.files_linked,
        report.mode,
        report.saved_megabytes()
    )
}

/// Print the run report to standard output.
///
/// Verbose mode adds a per-group listing of the master and every link
/// created, plus the per-file failures.
pub fn print_report(report: &DedupeReport, verbose: bool) {
    println!("Eligible files: {}", report.eligible_files);
    println!("Duplicate groups: {}", report.duplicate_groups);

    if verbose {
        for group in &report.groups {
            println!(
                "Master: {} ({})",
                group.master.display().cyan(),
                ByteSize::b(group.size)
            );
            for path in &group.linked {
                println!("  linked {}", path.display());
            }
            for path in &group.failed {
                println!("  {} {}", "FAILED".red(), path.display());
            }
        }
        for (path, err) in &report.hash_errors {
            println!("  {} hash {}: {}", "FAILED".red(), path.display(), err);
        }
    }

    if report.already_linked > 0 {
        println!("Already linked: {}", report.already_linked);
    }
    if !report.is_success() {
        println!(
            "{}",
            format!("Completed with {} error(s).", report.error_count()).red()
        );
    }

    println!("{}", summary_line(report));
}
