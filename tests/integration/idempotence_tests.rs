use dupelink::dedupe::{DedupeConfig, Deduplicator};
use dupelink::linker::LinkMode;
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
#[cfg(unix)]
fn test_symlink_mode_second_run_finds_nothing() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/x.dll", b"1111");
    write_file(dir.path(), "b/x.dll", b"1111");
    write_file(dir.path(), "c/x.dll", b"1111");

    let first = Deduplicator::with_defaults().run(dir.path()).unwrap();
    assert_eq!(first.files_linked, 2);
    assert!(first.is_success());

    // Replaced duplicates are symlinks now and are no longer eligible,
    // so the second run has nothing to do.
    let second = Deduplicator::with_defaults().run(dir.path()).unwrap();
    assert_eq!(second.eligible_files, 1);
    assert_eq!(second.duplicate_groups, 0);
    assert_eq!(second.files_linked, 0);
    assert_eq!(second.bytes_saved, 0);
    assert!(second.is_success());

    // The tree still resolves everywhere.
    for sub in ["a", "b", "c"] {
        assert_eq!(fs::read(dir.path().join(sub).join("x.dll")).unwrap(), b"1111");
    }
}

#[test]
#[cfg(unix)]
fn test_hardlink_mode_second_run_skips_linked_files() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/x.dll", b"1111");
    write_file(dir.path(), "b/x.dll", b"1111");

    let config = DedupeConfig::default().with_mode(LinkMode::Hardlink);

    let first = Deduplicator::new(config.clone()).run(dir.path()).unwrap();
    if !first.is_success() {
        eprintln!("Skipping hardlink idempotence test: {:?}", first.link_failures);
        return;
    }
    assert_eq!(first.files_linked, 1);

    // Hard links are still regular files with identical content, so the
    // group reappears, but every duplicate already shares the master's
    // identity and nothing is recreated.
    let second = Deduplicator::new(config).run(dir.path()).unwrap();
    assert_eq!(second.eligible_files, 2);
    assert_eq!(second.duplicate_groups, 1);
    assert_eq!(second.files_linked, 0);
    assert_eq!(second.already_linked, 1);
    assert_eq!(second.bytes_saved, 0);
    assert!(second.is_success());
}

#[test]
#[cfg(unix)]
fn test_repeated_runs_keep_the_same_master() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "b/x.dll", b"1111");
    write_file(dir.path(), "a/x.dll", b"1111");
    write_file(dir.path(), "unique.dll", b"2222");

    let first = Deduplicator::with_defaults().run(dir.path()).unwrap();
    assert!(first.groups[0].master.ends_with("a/x.dll"));

    // The master kept its independent content across the run.
    assert!(!fs::symlink_metadata(dir.path().join("a/x.dll"))
        .unwrap()
        .file_type()
        .is_symlink());
    assert!(fs::symlink_metadata(dir.path().join("b/x.dll"))
        .unwrap()
        .file_type()
        .is_symlink());
}
