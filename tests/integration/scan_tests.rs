use dupelink::dedupe::{DedupeConfig, Deduplicator};
use dupelink::scanner::ExtensionFilter;
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
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();

    assert_eq!(report.eligible_files, 0);
    assert_eq!(report.duplicate_groups, 0);
    assert_eq!(report.files_linked, 0);
    assert!(report.is_success());
}

#[test]
fn test_non_matching_extension_never_grouped() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"duplicate");
    write_file(dir.path(), "b.txt", b"duplicate");

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();

    assert_eq!(report.eligible_files, 0);
    assert_eq!(report.duplicate_groups, 0);
    // The files are untouched regular files.
    assert!(!fs::symlink_metadata(dir.path().join("a.txt"))
        .unwrap()
        .file_type()
        .is_symlink());
    assert_eq!(fs::read(dir.path().join("b.txt")).unwrap(), b"duplicate");
}

#[test]
fn test_extension_match_is_case_insensitive() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/LIB.DLL", b"payload");
    write_file(dir.path(), "b/lib.dll", b"payload");

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();

    assert_eq!(report.eligible_files, 2);
    assert_eq!(report.duplicate_groups, 1);
    assert_eq!(report.files_linked, 1);
}

#[test]
fn test_custom_extension_filter() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.pdb", b"symbols");
    write_file(dir.path(), "b.pdb", b"symbols");
    write_file(dir.path(), "c.dll", b"symbols");

    let config = DedupeConfig::default().with_filter(ExtensionFilter::new(["pdb"]));
    let report = Deduplicator::new(config).run(dir.path()).unwrap();

    // Only the .pdb pair is eligible; the .dll with identical content is
    // outside the filter and never enters a class.
    assert_eq!(report.eligible_files, 2);
    assert_eq!(report.duplicate_groups, 1);
    assert!(!fs::symlink_metadata(dir.path().join("c.dll"))
        .unwrap()
        .file_type()
        .is_symlink());
}

#[test]
fn test_scan_counts_nested_files() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "top.dll", b"a");
    write_file(dir.path(), "one/mid.dll", b"b");
    write_file(dir.path(), "one/two/leaf.dll", b"c");
    write_file(dir.path(), "one/two/notes.txt", b"d");

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();

    assert_eq!(report.eligible_files, 3);
    assert_eq!(report.duplicate_groups, 0);
}
