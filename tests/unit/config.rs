use super::*;

#[test]
fn defaults() {
    let c = ClientConfig::default();
    assert_eq!(c.api_base, "https://laysflavorapi.onrender.com");
    assert_eq!(c.model_source, "/assets/chips.json");
    assert_eq!(c.placeholder_image, "/assets/chipspreview.png");
    assert_eq!(c.page_size, 8);
    assert_eq!(c.slot_names, SlotNames::default());
    assert!(c.user_store_path().ends_with("user.json"));
}

#[test]
fn partial_file_keeps_defaults() {
    let path = std::env::temp_dir().join(format!("flavorbag_config_{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"api_base":"http://localhost:3000","slot_names":{"body":"Bag_Body"},"user_store":"/tmp/u.json"}"#,
    )
    .unwrap();

    let c = ClientConfig::load(&path).unwrap();
    assert_eq!(c.api_base, "http://localhost:3000");
    assert_eq!(c.slot_names.body, "Bag_Body");
    assert_eq!(c.slot_names.image, "image");
    assert_eq!(c.page_size, 8);
    assert_eq!(c.user_store_path(), PathBuf::from("/tmp/u.json"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn bad_files_are_errors() {
    assert!(ClientConfig::load(Path::new("/definitely/not/here.json")).is_err());

    let path = std::env::temp_dir().join(format!("flavorbag_badconfig_{}.json", std::process::id()));
    std::fs::write(&path, "{ nope").unwrap();
    assert!(matches!(ClientConfig::load(&path), Err(FlavorError::Serde(_))));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn font_dirs_include_web_root_fonts() {
    let c = ClientConfig {
        web_root: PathBuf::from("/srv/site"),
        font_dirs: vec![PathBuf::from("/opt/fonts")],
        ..ClientConfig::default()
    };
    assert_eq!(
        c.font_search_dirs(),
        vec![PathBuf::from("/opt/fonts"), PathBuf::from("/srv/site/fonts")]
    );
}
