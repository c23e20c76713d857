use audiencelab_config::{StorageBackend, StorageConfig};
use audiencelab_storage::{FileStore, KeyValueStore, StoreFactory};

#[tokio::test]
async fn values_survive_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let store = FileStore::new(&path);
    store.set("creativeToken", "tok-123").await.unwrap();
    store.set("firstLogin", "01/01/2024").await.unwrap();
    drop(store);

    let reopened = FileStore::new(&path);
    assert_eq!(
        reopened.get("creativeToken").await.unwrap().as_deref(),
        Some("tok-123")
    );
    assert_eq!(
        reopened.get("firstLogin").await.unwrap().as_deref(),
        Some("01/01/2024")
    );
}

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("nested/dir/storage.json"));
    assert_eq!(store.get("anything").await.unwrap(), None);

    // First write creates the parent directories.
    store.set("k", "v").await.unwrap();
    assert!(store.path().exists());
}

#[tokio::test]
async fn remove_and_clear_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let store = FileStore::new(&path);
    store.set("a", "1").await.unwrap();
    store.set("b", "2").await.unwrap();
    store.remove("a").await.unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get("a").await.unwrap(), None);
    assert_eq!(reopened.get("b").await.unwrap().as_deref(), Some("2"));

    reopened.clear().await.unwrap();
    let again = FileStore::new(&path);
    assert_eq!(again.get("b").await.unwrap(), None);
}

#[tokio::test]
async fn corrupt_file_is_set_aside_and_store_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "not json").unwrap();

    let store = FileStore::new(&path);
    assert_eq!(store.get("creativeToken").await.unwrap(), None);
    store.set("creativeToken", "tok-1").await.unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(
        reopened.get("creativeToken").await.unwrap().as_deref(),
        Some("tok-1")
    );
    let aside = dir.path().join("storage.json.corrupt");
    assert_eq!(std::fs::read_to_string(aside).unwrap(), "not json");
}

#[tokio::test]
async fn factory_honours_backend() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        backend: StorageBackend::File,
        path: dir.path().join("s.json").to_string_lossy().into_owned(),
    };
    let store = StoreFactory::new().from_storage_config(&config);
    store.set("x", "y").await.unwrap();
    assert!(dir.path().join("s.json").exists());

    let memory = StoreFactory::new().from_storage_config(&StorageConfig {
        backend: StorageBackend::Memory,
        path: String::new(),
    });
    memory.set("x", "y").await.unwrap();
    assert_eq!(memory.get("x").await.unwrap().as_deref(), Some("y"));
}
