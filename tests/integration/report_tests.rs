use dupelink::dedupe::Deduplicator;
use dupelink::report::{print_report, summary_line};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_file(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(&path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_summary_line_after_real_run() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/x.dll", b"1111");
    write_file(dir.path(), "b/x.dll", b"1111");

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();
    let line = summary_line(&report);

    assert_eq!(
        line,
        "Deduplication complete: 1 files replaced with symbolic links, saving 0.00 MB."
    );
}

#[test]
fn test_summary_reports_megabytes_saved() {
    let dir = tempdir().unwrap();
    let payload = vec![0x42u8; 1024 * 1024];
    write_file(dir.path(), "a/big.dll", &payload);
    write_file(dir.path(), "b/big.dll", &payload);

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();

    assert_eq!(report.bytes_saved, 1024 * 1024);
    assert!(summary_line(&report).ends_with("saving 1.00 MB."));
}

#[test]
fn test_saving_tail_is_machine_parseable() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/x.dll", b"abcdefgh");
    write_file(dir.path(), "b/x.dll", b"abcdefgh");

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();
    let line = summary_line(&report);

    // Callers scan for "saving <number> MB".
    let tail = line.split("saving ").nth(1).expect("tail present");
    let number = tail.strip_suffix(" MB.").expect("MB suffix");
    let value: f64 = number.parse().expect("numeric savings");
    assert!(value >= 0.0);
}

#[test]
fn test_print_report_verbose_does_not_panic() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/x.dll", b"1111");
    write_file(dir.path(), "b/x.dll", b"1111");
    write_file(dir.path(), "c/unique.dll", b"2222");

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();

    print_report(&report, true);
    print_report(&report, false);
}
