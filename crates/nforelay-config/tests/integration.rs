use nforelay_config::{
    Category, ConfigError, HashPolicy, is_category_excluded, load_or_create, map_category,
};
use nforelay_test_support::fixtures::ReleaseTree;

#[test]
fn edited_document_drives_policies_and_categories() -> anyhow::Result<()> {
    let dir = ReleaseTree::new("conf")?;
    let path = dir.root().join("nforelay.json");
    assert!(matches!(
        load_or_create(&path),
        Err(ConfigError::DefaultCreated { .. })
    ));

    dir.write(
        "nforelay.json",
        br#"{
            "api_key": "k-123",
            "max_hash_file_size": "800MB",
            "verify_ssl": false,
            "category_mappings": { "TV": ["series"] },
            "excluded_categories": ["private"]
        }"#,
    )?;

    let config = load_or_create(&path)?;
    assert!(!config.verify_ssl);
    assert_eq!(config.hash_policy(), HashPolicy::MaxBytes(800 * 1024 * 1024));
    assert_eq!(
        map_category(&config, "Series", "anything"),
        Some(Category::Tv)
    );
    assert!(is_category_excluded(&config, "Private"));
    Ok(())
}
