use std::time::Duration;

use rolodex::adapters::cache::MemoryCacheStore;
use rolodex::domain::ports::CacheStore;

#[tokio::test]
async fn test_set_get_roundtrip() {
    let cache = MemoryCacheStore::new(100);

    cache
        .set_with_ttl("k1", "v1".to_string(), Duration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(cache.get("k1").await.unwrap(), Some("v1".to_string()));
    assert_eq!(cache.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_set_overwrites_unconditionally() {
    let cache = MemoryCacheStore::new(100);

    cache
        .set_with_ttl("k1", "old".to_string(), Duration::from_secs(60))
        .await
        .unwrap();
    cache
        .set_with_ttl("k1", "new".to_string(), Duration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(cache.get("k1").await.unwrap(), Some("new".to_string()));
}

#[tokio::test]
async fn test_delete_single_key() {
    let cache = MemoryCacheStore::new(100);

    cache
        .set_with_ttl("k1", "v1".to_string(), Duration::from_secs(60))
        .await
        .unwrap();
    cache.delete("k1").await.unwrap();
    assert_eq!(cache.get("k1").await.unwrap(), None);

    // Deleting an absent key is not an error
    cache.delete("missing").await.unwrap();
}

#[tokio::test]
async fn test_delete_prefix_removes_all_matching_keys() {
    let cache = MemoryCacheStore::new(100);
    let ttl = Duration::from_secs(60);

    cache
        .set_with_ttl("customers:list:tenant-a:-:50:0", "p1".to_string(), ttl)
        .await
        .unwrap();
    cache
        .set_with_ttl("customers:list:tenant-a:alice:10:0", "p2".to_string(), ttl)
        .await
        .unwrap();
    cache
        .set_with_ttl("customers:list:tenant-b:-:50:0", "p3".to_string(), ttl)
        .await
        .unwrap();
    cache
        .set_with_ttl("customers:one:tenant-a:some-id", "c1".to_string(), ttl)
        .await
        .unwrap();

    cache.delete_prefix("customers:list:tenant-a:").await.unwrap();

    // Every page under the prefix is gone, everything else survives
    assert_eq!(
        cache.get("customers:list:tenant-a:-:50:0").await.unwrap(),
        None
    );
    assert_eq!(
        cache
            .get("customers:list:tenant-a:alice:10:0")
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        cache.get("customers:list:tenant-b:-:50:0").await.unwrap(),
        Some("p3".to_string())
    );
    assert_eq!(
        cache.get("customers:one:tenant-a:some-id").await.unwrap(),
        Some("c1".to_string())
    );
}

#[tokio::test]
async fn test_entries_expire_independently() {
    let cache = MemoryCacheStore::new(100);

    cache
        .set_with_ttl("short", "v".to_string(), Duration::from_millis(100))
        .await
        .unwrap();
    cache
        .set_with_ttl("long", "v".to_string(), Duration::from_secs(60))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;

    assert_eq!(cache.get("short").await.unwrap(), None);
    assert_eq!(cache.get("long").await.unwrap(), Some("v".to_string()));
}
