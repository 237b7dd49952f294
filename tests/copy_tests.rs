//! Tests for metadata-preserving file and tree copies

use snag::executor::{copy_file_atomic, copy_into, copy_tree};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn create_test_file(path: &Path, content: &[u8]) {
    let mut file = fs::File::create(path).expect("Failed to create test file");
    file.write_all(content)
        .expect("Failed to write test content");
    file.flush().expect("Failed to flush");
}

fn set_file_mtime(path: &Path, mtime: SystemTime) {
    let filetime_mtime = filetime::FileTime::from_system_time(mtime);
    filetime::set_file_mtime(path, filetime_mtime).expect("Failed to set mtime");
}

fn mtime_of(path: &Path) -> SystemTime {
    fs::metadata(path)
        .expect("Failed to read metadata")
        .modified()
        .expect("Failed to get mtime")
}

fn mtime_diff(a: SystemTime, b: SystemTime) -> Duration {
    a.duration_since(b)
        .or_else(|_| b.duration_since(a))
        .expect("durations are ordered")
}

#[test]
fn test_copy_basic_content() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    let content = b"Hello, snag! This is a test file.";
    create_test_file(&src_path, content);

    let dest_path = root.join("dest.txt");
    let bytes_copied =
        copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

    assert_eq!(bytes_copied, content.len() as u64);
    assert_eq!(fs::read(&dest_path).expect("Failed to read dest file"), content);
}

#[test]
fn test_copy_overwrites_existing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    create_test_file(&root.join("source.txt"), b"new");
    create_test_file(&root.join("dest.txt"), b"old and longer");

    copy_file_atomic(&root.join("source.txt"), &root.join("dest.txt"))
        .expect("copy_file_atomic should replace the destination");

    assert_eq!(fs::read(root.join("dest.txt")).expect("read dest"), b"new");
}

#[test]
fn test_copy_preserves_mtime() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"test content");
    set_file_mtime(&src_path, SystemTime::now() - Duration::from_secs(3600));

    let dest_dir = root.join("out");
    copy_into(&src_path, &dest_dir).expect("copy_into should create the directory");

    let diff = mtime_diff(mtime_of(&src_path), mtime_of(&dest_dir.join("source.txt")));
    assert!(
        diff < Duration::from_secs(2),
        "mtime should be preserved (diff: {:?})",
        diff
    );
}

#[test]
fn test_copy_preserves_permissions() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"test content");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&src_path)
            .expect("Failed to get metadata")
            .permissions();
        perms.set_mode(0o640);
        fs::set_permissions(&src_path, perms).expect("Failed to set permissions");
    }

    let dest_path = root.join("dest.txt");
    copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let src_mode = fs::metadata(&src_path).expect("src metadata").permissions().mode();
        let dest_mode = fs::metadata(&dest_path).expect("dest metadata").permissions().mode();
        assert_eq!(src_mode & 0o777, dest_mode & 0o777, "Permissions should be preserved");
    }
}

#[test]
fn test_copy_large_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("large.bin");
    let size = 1024 * 1024 + 17;
    let content: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    create_test_file(&src_path, &content);

    let dest_path = root.join("large_copy.bin");
    let bytes_copied =
        copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should handle large files");

    assert_eq!(bytes_copied, size as u64);
    assert_eq!(fs::read(&dest_path).expect("Failed to read dest file"), content);
}

#[test]
fn test_copy_tree_preserves_structure() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src = root.join("tree");
    fs::create_dir_all(src.join("a/b")).expect("create nested dirs");
    fs::create_dir_all(src.join("empty")).expect("create empty dir");
    create_test_file(&src.join("top.txt"), b"top");
    create_test_file(&src.join("a/mid.txt"), b"mid");
    create_test_file(&src.join("a/b/.hidden"), b"hidden");

    let files = copy_tree(&src, &root.join("copy")).expect("copy_tree should succeed");

    assert_eq!(files, 3);
    assert_eq!(fs::read(root.join("copy/top.txt")).expect("read"), b"top");
    assert_eq!(fs::read(root.join("copy/a/mid.txt")).expect("read"), b"mid");
    assert_eq!(fs::read(root.join("copy/a/b/.hidden")).expect("read"), b"hidden");
    assert!(root.join("copy/empty").is_dir());
}

#[test]
fn test_copy_tree_merges_into_existing_destination() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src = root.join("tree");
    fs::create_dir_all(&src).expect("create src");
    create_test_file(&src.join("shared.txt"), b"fresh");
    create_test_file(&src.join("added.txt"), b"added");

    let dest = root.join("copy");
    fs::create_dir_all(&dest).expect("create dest");
    create_test_file(&dest.join("shared.txt"), b"stale");
    create_test_file(&dest.join("kept.txt"), b"kept");

    copy_tree(&src, &dest).expect("copy_tree should merge");

    assert_eq!(fs::read(dest.join("shared.txt")).expect("read"), b"fresh");
    assert_eq!(fs::read(dest.join("added.txt")).expect("read"), b"added");
    assert_eq!(fs::read(dest.join("kept.txt")).expect("read"), b"kept");
}
