use khata_config::Config;
use khata_core::{cache_keys, LocalCache};
use khata_domain::{Category, NewTransaction, Transaction, TransactionKind};
use khata_storage_json::JsonCache;
use tempfile::tempdir;

#[test]
fn values_round_trip_through_the_filesystem() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonCache::new(dir.path().join("cache")).expect("create cache");

    assert_eq!(cache.get("missing").expect("get"), None);

    cache.set("greeting", "\"namaste\"").expect("set");
    assert_eq!(
        cache.get("greeting").expect("get"),
        Some("\"namaste\"".to_string())
    );

    cache.set("greeting", "\"hello\"").expect("overwrite");
    assert_eq!(
        cache.get("greeting").expect("get"),
        Some("\"hello\"".to_string())
    );

    cache.remove("greeting").expect("remove");
    assert_eq!(cache.get("greeting").expect("get"), None);
    // Removing an absent key is fine.
    cache.remove("greeting").expect("remove again");
}

#[test]
fn blob_files_live_under_the_cache_root() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonCache::new(dir.path().join("cache")).expect("create cache");

    cache.set(cache_keys::PENDING_TRANSACTIONS, "[]").expect("set");

    let path = cache.value_path(cache_keys::PENDING_TRANSACTIONS);
    assert!(path.exists());
    assert!(path.starts_with(cache.root()));
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    // No stray tmp file is left behind after the rename.
    let entries = std::fs::read_dir(cache.root()).expect("read_dir").count();
    assert_eq!(entries, 1);
}

#[test]
fn keys_are_sanitized_to_portable_file_stems() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonCache::new(dir.path().join("cache")).expect("create cache");

    cache.set("../escape/attempt", "\"pinned\"").expect("set");

    let path = cache.value_path("../escape/attempt");
    assert!(path.starts_with(cache.root()));
    assert_eq!(
        cache.get("../escape/attempt").expect("get"),
        Some("\"pinned\"".to_string())
    );
}

#[test]
fn cache_root_comes_from_the_configuration() {
    let dir = tempdir().expect("tempdir");
    let mut cfg = Config::default();
    cfg.cache_root = Some(dir.path().join("configured"));

    let cache = JsonCache::from_config(&cfg).expect("create cache");
    cache.set("probe", "1").expect("set");

    assert_eq!(cache.root(), dir.path().join("configured"));
    assert!(dir.path().join("configured").join("probe.json").exists());
}

#[test]
fn serialized_transaction_list_reloads_identically() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonCache::new(dir.path().join("cache")).expect("create cache");

    let transactions = vec![
        NewTransaction::new(
            "Lunch",
            12.5,
            Category::with_id("1", "Food"),
            TransactionKind::Expense,
        )
        .with_description("dal and rice")
        .with_person("Asha")
        .build(),
        NewTransaction::new(
            "Salary",
            1_500.0,
            Category::with_id("5", "Salary"),
            TransactionKind::Income,
        )
        .build(),
        NewTransaction::new(
            "Loan to Ravi",
            200.0,
            Category::with_id("4", "Bills"),
            TransactionKind::Lend,
        )
        .with_person("Ravi")
        .build(),
    ];

    let json = serde_json::to_string(&transactions).expect("serialize");
    cache.set(cache_keys::TRANSACTIONS, &json).expect("set");

    let raw = cache
        .get(cache_keys::TRANSACTIONS)
        .expect("get")
        .expect("present");
    let reloaded: Vec<Transaction> = serde_json::from_str(&raw).expect("deserialize");

    assert_eq!(reloaded, transactions);
}
