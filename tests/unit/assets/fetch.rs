use super::*;

#[test]
fn locate_classifies_sources() {
    let root = Path::new("/srv/site");
    assert_eq!(
        locate("https://cdn.example/bag.png", root).unwrap(),
        AssetLocation::Remote("https://cdn.example/bag.png".to_owned())
    );
    assert_eq!(
        locate("/assets/chipspreview.png", root).unwrap(),
        AssetLocation::Local(PathBuf::from("/srv/site/assets/chipspreview.png"))
    );
    assert_eq!(
        locate("invalid-url", root).unwrap(),
        AssetLocation::Local(PathBuf::from("/srv/site/invalid-url"))
    );
}

#[test]
fn locate_rejects_escapes_and_empty() {
    let root = Path::new("/srv/site");
    assert!(matches!(
        locate("/../etc/passwd", root),
        Err(FlavorError::Validation(_))
    ));
    assert!(matches!(locate("  ", root), Err(FlavorError::Validation(_))));
}

#[test]
fn data_urls_decode() {
    let url = encode_data_url("image/png", b"\x89PNG bytes");
    assert!(url.starts_with("data:image/png;base64,"));
    assert_eq!(
        locate(&url, Path::new(".")).unwrap(),
        AssetLocation::Inline(b"\x89PNG bytes".to_vec())
    );
    assert_eq!(
        locate("data:text/plain,hello", Path::new(".")).unwrap(),
        AssetLocation::Inline(b"hello".to_vec())
    );
    assert!(locate("data:image/png;base64", Path::new(".")).is_err());
    assert!(locate("data:image/png;base64,@@@", Path::new(".")).is_err());
}

#[test]
fn plain_data_urls_are_percent_decoded() {
    assert_eq!(
        locate(
            "data:image/svg+xml,%3Csvg%20width='2'%2F%3E",
            Path::new(".")
        )
        .unwrap(),
        AssetLocation::Inline(b"<svg width='2'/>".to_vec())
    );
    assert_eq!(
        locate("data:application/octet-stream,%89PNG%0D%0A", Path::new(".")).unwrap(),
        AssetLocation::Inline(b"\x89PNG\r\n".to_vec())
    );
}

#[tokio::test]
async fn local_files_are_read_and_missing_ones_fail() {
    let root = std::env::temp_dir().join(format!("flavorbag_fetch_{}", std::process::id()));
    std::fs::create_dir_all(root.join("assets")).unwrap();
    std::fs::write(root.join("assets/a.bin"), b"abc").unwrap();

    let fetcher = HttpAssetFetcher::new(&root).unwrap();
    assert_eq!(fetcher.fetch("/assets/a.bin").await.unwrap(), b"abc");
    let err = fetcher.fetch("/assets/missing.bin").await.unwrap_err();
    assert!(err.to_string().contains("missing.bin"), "{err}");

    std::fs::remove_dir_all(&root).unwrap();
}
