use khata_config::{Config, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_sane_values() {
    let cfg = Config::default();

    assert_eq!(cfg.collection, "transactions");
    assert!(!cfg.currency.is_empty());
    assert!(cfg.reconnect_debounce_ms > 0);
    assert!(cfg.cache_root.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.currency = "NPR".to_string();
    cfg.reconnect_debounce_ms = 500;

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.currency, "NPR");
    assert_eq!(loaded.reconnect_debounce_ms, 500);
    assert_eq!(
        loaded.reconnect_debounce(),
        std::time::Duration::from_millis(500)
    );
}

#[test]
fn loading_a_missing_file_yields_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded.collection, Config::default_collection());
}

#[test]
fn partial_config_files_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "currency": "INR" }"#).expect("write");

    let loaded = ConfigManager::new(path).load().expect("load config");
    assert_eq!(loaded.currency, "INR");
    assert_eq!(loaded.collection, Config::default_collection());
    assert_eq!(
        loaded.reconnect_debounce_ms,
        Config::default_reconnect_debounce_ms()
    );
}

#[test]
fn explicit_cache_root_wins_over_platform_resolution() {
    let mut cfg = Config::default();
    let resolved_default = cfg.resolve_cache_root();
    assert!(resolved_default.ends_with("cache"));

    cfg.cache_root = Some("/tmp/khata-cache".into());
    assert_eq!(
        cfg.resolve_cache_root(),
        std::path::PathBuf::from("/tmp/khata-cache")
    );
}
