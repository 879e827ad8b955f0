use dupelink::dedupe::{DedupeConfig, Deduplicator};
use dupelink::linker::LinkMode;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_file(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(&path).unwrap().write_all(content).unwrap();
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).unwrap().file_type().is_symlink()
}

#[test]
fn test_two_duplicates_one_unique() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "A/x.dll", b"1111");
    write_file(dir.path(), "B/x.dll", b"1111");
    write_file(dir.path(), "C/y.dll", b"2222");

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();

    assert_eq!(report.eligible_files, 3);
    assert_eq!(report.duplicate_groups, 1);
    assert_eq!(report.files_linked, 1);
    assert_eq!(report.bytes_saved, 4);
    assert!(report.is_success());

    // Equal depth, so the lexicographically smaller path is the master.
    assert_eq!(report.groups.len(), 1);
    assert!(report.groups[0].master.ends_with("A/x.dll"));

    if cfg!(unix) {
        assert!(is_symlink(&dir.path().join("B/x.dll")));
        assert_eq!(
            fs::read_link(dir.path().join("B/x.dll")).unwrap(),
            PathBuf::from("../A/x.dll")
        );
    }
    // The untouched unique file and the replaced duplicate both still
    // read back their original bytes.
    assert_eq!(fs::read(dir.path().join("C/y.dll")).unwrap(), b"2222");
    assert_eq!(fs::read(dir.path().join("B/x.dll")).unwrap(), b"1111");
    assert!(!is_symlink(&dir.path().join("C/y.dll")));
}

#[test]
fn test_master_prefers_shallower_depth() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "sub/copy.dll", b"payload");
    write_file(dir.path(), "top.dll", b"payload");

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();

    assert_eq!(report.files_linked, 1);
    assert!(report.groups[0].master.ends_with("top.dll"));
    assert!(is_symlink(&dir.path().join("sub/copy.dll")));
    assert_eq!(
        fs::read_link(dir.path().join("sub/copy.dll")).unwrap(),
        PathBuf::from("../top.dll")
    );
}

#[test]
fn test_round_trip_content_through_links() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/lib.dll", b"shared payload");
    write_file(dir.path(), "b/lib.dll", b"shared payload");
    write_file(dir.path(), "c/lib.dll", b"shared payload");

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();

    assert_eq!(report.files_linked, 2);
    for sub in ["a", "b", "c"] {
        assert_eq!(
            fs::read(dir.path().join(sub).join("lib.dll")).unwrap(),
            b"shared payload"
        );
    }
}

#[test]
fn test_hard_link_mode() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/x.dll", b"hard payload");
    write_file(dir.path(), "b/x.dll", b"hard payload");

    let config = DedupeConfig::default().with_mode(LinkMode::Hardlink);
    let report = Deduplicator::new(config).run(dir.path()).unwrap();

    if !report.is_success() {
        eprintln!("Skipping hard link test: {:?}", report.link_failures);
        return;
    }

    assert_eq!(report.files_linked, 1);
    assert_eq!(report.bytes_saved, 12);
    // Hard links are regular files, not symlinks.
    assert!(!is_symlink(&dir.path().join("b/x.dll")));
    assert_eq!(fs::read(dir.path().join("b/x.dll")).unwrap(), b"hard payload");

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let a = fs::metadata(dir.path().join("a/x.dll")).unwrap();
        let b = fs::metadata(dir.path().join("b/x.dll")).unwrap();
        assert_eq!(a.ino(), b.ino());
    }
}

#[test]
#[cfg(unix)]
fn test_symlink_survives_tree_relocation() {
    let parent = tempdir().unwrap();
    let original_root = parent.path().join("tree");
    write_file(&original_root, "a/x.dll", b"movable");
    write_file(&original_root, "b/x.dll", b"movable");

    let report = Deduplicator::with_defaults().run(&original_root).unwrap();
    assert_eq!(report.files_linked, 1);

    // Relocate the whole tree, master and link together.
    let moved_root = parent.path().join("archived");
    fs::rename(&original_root, &moved_root).unwrap();

    // The stored target is relative, so it still resolves.
    assert_eq!(fs::read(moved_root.join("b/x.dll")).unwrap(), b"movable");
}

#[test]
fn test_space_accounting_sums_non_masters() {
    let dir = tempdir().unwrap();
    // Three copies of ten bytes and two copies of four bytes.
    write_file(dir.path(), "a/big.dll", b"0123456789");
    write_file(dir.path(), "b/big.dll", b"0123456789");
    write_file(dir.path(), "c/big.dll", b"0123456789");
    write_file(dir.path(), "a/small.dll", b"1111");
    write_file(dir.path(), "b/small.dll", b"1111");

    let report = Deduplicator::with_defaults().run(dir.path()).unwrap();

    assert_eq!(report.duplicate_groups, 2);
    assert_eq!(report.files_linked, 3);
    assert_eq!(report.bytes_saved, 2 * 10 + 4);
}

#[test]
fn test_verification_enabled_still_links_real_duplicates() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/x.dll", b"verified payload");
    write_file(dir.path(), "b/x.dll", b"verified payload");

    let config = DedupeConfig::default().with_verification(true);
    let report = Deduplicator::new(config).run(dir.path()).unwrap();

    assert_eq!(report.files_linked, 1);
    assert!(report.is_success());
    assert_eq!(
        fs::read(dir.path().join("b/x.dll")).unwrap(),
        b"verified payload"
    );
}
