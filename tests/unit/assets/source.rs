use super::*;

#[test]
fn normalize_locator_strips_site_root_and_dots() {
    assert_eq!(
        normalize_locator("/images/canvases/orange.jpg").unwrap(),
        "images/canvases/orange.jpg"
    );
    assert_eq!(
        normalize_locator("./images//./thumbnails\\gnome.jpg").unwrap(),
        "images/thumbnails/gnome.jpg"
    );
}

#[test]
fn normalize_locator_rejects_traversal_and_empty() {
    assert!(normalize_locator("/images/../secrets.txt").is_err());
    assert!(normalize_locator("").is_err());
    assert!(normalize_locator("/").is_err());
}

#[test]
fn fs_source_reads_under_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("images")).unwrap();
    std::fs::write(dir.path().join("images/a.bin"), b"abc").unwrap();

    let src = FsImageSource::new(dir.path());
    assert_eq!(src.root(), dir.path());
    assert_eq!(src.resolve("/images/a.bin").unwrap(), dir.path().join("images/a.bin"));
    assert_eq!(src.fetch("/images/a.bin").unwrap(), b"abc");
    let err = src.fetch("/images/missing.bin").unwrap_err();
    assert!(format!("{err:#}").contains("missing.bin"));
}

#[test]
fn memory_source_reports_missing_locator() {
    let src = MemoryImageSource::new().with("/a.png", vec![1, 2, 3]);
    assert_eq!(src.fetch("/a.png").unwrap(), vec![1, 2, 3]);
    assert!(src.fetch("/b.png").unwrap_err().to_string().contains("/b.png"));
}
