use confkit_fs::{NormalizedPath, RobustnessConfig, io};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("project.yaml"));

    io::write_atomic(&path, b"version: 1\n", RobustnessConfig::default()).unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "version: 1\n");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("project.yaml");
    fs::write(&file_path, "version: 0\n").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"version: 1\n", RobustnessConfig::default()).unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "version: 1\n");
}

#[test]
fn test_write_atomic_without_fsync() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("fast.yaml"));
    let config = RobustnessConfig {
        lock_timeout: Duration::from_millis(100),
        enable_fsync: false,
    };

    io::write_atomic(&path, b"a: 1\n", config).unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "a: 1\n");
}

#[test]
fn test_write_atomic_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join(".schemas").join("nested").join("x.json"));

    io::write_atomic(&path, b"{}\n", RobustnessConfig::default()).unwrap();

    assert!(path.is_file());
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("target.yaml"));

    io::write_atomic(&path, b"content", RobustnessConfig::default()).unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "found temp files: {leftovers:?}");
}

#[test]
fn test_read_text_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.yaml"));

    let err = io::read_text(&path).unwrap_err();
    assert!(err.is_not_found());
}
