/// Topology cache tests
///
/// Fill-on-miss, frozen-on-hit and invalidation behavior of context builds
/// Run with: cargo test --test topology_cache_tests

use async_trait::async_trait;
use slotkeeper::{
    Group, MemoryClient, Proxy, SlotActionState, SlotMapping, StoreClient, TopologyConfig,
    TopologyError, TopologyManager, TopologyWrite,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_test::{assert_err, assert_ok};

fn new_manager(client: &MemoryClient) -> TopologyManager {
    TopologyManager::new(
        TopologyConfig::new("cache-test").max_slot_num(64),
        Arc::new(client.clone()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_slot_cache() {
    let client = MemoryClient::new();
    let manager = new_manager(&client);

    let ctx = manager.new_context().await.unwrap();
    assert_eq!(ctx.slot_mapping(7).unwrap(), &SlotMapping::new(7));

    let mapping = SlotMapping::new(7)
        .owned_by(3)
        .migrating_to(4, SlotActionState::Pending);
    manager.store_update_slot_mapping(&mapping).await.unwrap();

    // frozen until dirtied
    let ctx = manager.new_context().await.unwrap();
    assert_eq!(ctx.slot_mapping(7).unwrap(), &SlotMapping::new(7));

    manager.dirty_slots_cache(7).unwrap();
    let ctx = manager.new_context().await.unwrap();
    assert_eq!(ctx.slot_mapping(7).unwrap(), &mapping);
    assert_eq!(ctx.slot_mapping(8).unwrap(), &SlotMapping::new(8));
}

#[tokio::test]
async fn test_group_cache() {
    let client = MemoryClient::new();
    let manager = new_manager(&client);

    let ctx = manager.new_context().await.unwrap();
    assert!(matches!(ctx.group(1), Err(TopologyError::GroupNotFound(1))));

    let group = Group::new(1).with_server("127.0.0.1:6379").with_server("127.0.0.1:6380");
    manager.store_create_group(&group).await.unwrap();
    assert!(manager.new_context().await.unwrap().group(1).is_err());

    manager.dirty_group_cache(1).unwrap();
    let ctx = manager.new_context().await.unwrap();
    assert_eq!(ctx.group(1).unwrap(), &group);

    let mut changed = group.clone();
    changed.out_of_sync = true;
    manager.store_update_group(&changed).await.unwrap();
    assert_eq!(manager.new_context().await.unwrap().group(1).unwrap(), &group);

    manager.dirty_group_cache(1).unwrap();
    assert_eq!(manager.new_context().await.unwrap().group(1).unwrap(), &changed);

    manager.store_remove_group(&changed).await.unwrap();
    manager.dirty_group_cache(1).unwrap();
    let ctx = manager.new_context().await.unwrap();
    assert!(ctx.group(1).unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_proxy_cache() {
    let client = MemoryClient::new();
    let manager = new_manager(&client);

    let ctx = manager.new_context().await.unwrap();
    assert!(matches!(ctx.proxy("abc"), Err(TopologyError::ProxyNotFound(_))));

    let mut proxy = Proxy::new("abc");
    proxy.id = 1;
    proxy.proxy_addr = "127.0.0.1:19000".to_string();
    manager.store_create_proxy(&proxy).await.unwrap();
    manager.dirty_proxy_cache("abc").unwrap();
    assert_eq!(manager.new_context().await.unwrap().proxy("abc").unwrap(), &proxy);

    manager.store_remove_proxy(&proxy).await.unwrap();
    let ctx = manager.new_context().await.unwrap();
    assert_ok!(ctx.proxy("abc"));

    manager.dirty_proxy_cache("abc").unwrap();
    let ctx = manager.new_context().await.unwrap();
    assert_err!(ctx.proxy("abc"));
}

#[tokio::test]
async fn test_dirty_cache_all() {
    let client = MemoryClient::new();
    let manager = new_manager(&client);
    manager.new_context().await.unwrap();

    manager.store_create_group(&Group::new(2).with_server("s2:1")).await.unwrap();
    manager.store_create_proxy(&Proxy::new("p")).await.unwrap();
    manager
        .store_update_slot_mapping(&SlotMapping::new(0).owned_by(2))
        .await
        .unwrap();

    let ctx = manager.new_context().await.unwrap();
    assert!(ctx.group(2).is_err());
    assert!(ctx.proxy("p").is_err());
    assert_eq!(ctx.slot_mapping(0).unwrap().group_id, 0);

    manager.dirty_cache_all().unwrap();
    let ctx = manager.new_context().await.unwrap();
    assert_ok!(ctx.group(2));
    assert_ok!(ctx.proxy("p"));
    assert_eq!(ctx.slot_mapping(0).unwrap().group_id, 2);
}

#[tokio::test]
async fn test_global_and_point_invalidation_reject_misplaced_group() {
    let client = MemoryClient::new();
    let manager = new_manager(&client);
    manager.new_context().await.unwrap();

    let misplaced = serde_json::to_vec(&Group::new(2).with_server("s2:1")).unwrap();
    client
        .update(&manager.store().paths().group_path(1), misplaced)
        .await
        .unwrap();

    manager.dirty_group_cache(1).unwrap();
    assert!(matches!(
        manager.new_context().await,
        Err(TopologyError::CodecError(_))
    ));

    manager.dirty_cache_all().unwrap();
    assert!(matches!(
        manager.new_context().await,
        Err(TopologyError::CodecError(_))
    ));
}

#[tokio::test]
async fn test_global_and_point_invalidation_agree_on_proxies() {
    let client = MemoryClient::new();
    let manager = new_manager(&client);
    manager.new_context().await.unwrap();

    assert!(matches!(
        manager.store_create_proxy(&Proxy::new("a/b")).await,
        Err(TopologyError::InvalidProxy(_))
    ));
    manager.store_create_proxy(&Proxy::new("a-b")).await.unwrap();

    manager.dirty_proxy_cache("a-b").unwrap();
    let point = manager.new_context().await.unwrap();
    manager.dirty_cache_all().unwrap();
    let global = manager.new_context().await.unwrap();

    assert_eq!(point.proxy("a-b").unwrap(), global.proxy("a-b").unwrap());
    assert_eq!(point.proxies().count(), global.proxies().count());
    assert_eq!(client.paths().await.len(), 1);
}

#[tokio::test]
async fn test_cold_manager_sees_committed_writes() {
    let client = MemoryClient::new();
    let first = new_manager(&client);
    let second = new_manager(&client);
    first.new_context().await.unwrap();

    first
        .commit(vec![TopologyWrite::CreateGroup(Group::new(5).with_server("s5:1"))])
        .await
        .unwrap();

    let ctx = first.new_context().await.unwrap();
    assert_ok!(ctx.group(5));
    let ctx = second.new_context().await.unwrap();
    assert_ok!(ctx.group(5));
}

/// Store client that fails every read once `failing` is set.
struct FlakyClient {
    inner: MemoryClient,
    failing: AtomicBool,
}

#[async_trait]
impl StoreClient for FlakyClient {
    async fn create(&self, path: &str, data: Vec<u8>) -> slotkeeper::Result<()> {
        self.inner.create(path, data).await
    }

    async fn update(&self, path: &str, data: Vec<u8>) -> slotkeeper::Result<()> {
        self.inner.update(path, data).await
    }

    async fn delete(&self, path: &str) -> slotkeeper::Result<()> {
        self.inner.delete(path).await
    }

    async fn read(&self, path: &str) -> slotkeeper::Result<Option<Vec<u8>>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TopologyError::StoreError(format!("read {} refused", path)));
        }
        self.inner.read(path).await
    }

    async fn list(&self, path: &str) -> slotkeeper::Result<Vec<String>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TopologyError::StoreError(format!("list {} refused", path)));
        }
        self.inner.list(path).await
    }

    async fn close(&self) -> slotkeeper::Result<()> {
        self.inner.close().await
    }
}

#[tokio::test]
async fn test_store_failure_aborts_build() {
    let client = Arc::new(FlakyClient {
        inner: MemoryClient::new(),
        failing: AtomicBool::new(false),
    });
    let manager = TopologyManager::new(
        TopologyConfig::new("flaky").max_slot_num(8),
        client.clone(),
    )
    .unwrap();
    manager.store_create_group(&Group::new(1).with_server("s1:1")).await.unwrap();
    manager.new_context().await.unwrap();

    client.failing.store(true, Ordering::SeqCst);
    // fully cached: no store reads needed
    assert_ok!(manager.new_context().await);

    manager.dirty_group_cache(1).unwrap();
    let err = manager.new_context().await.unwrap_err();
    assert!(matches!(err, TopologyError::StoreError(_)));

    client.failing.store(false, Ordering::SeqCst);
    let ctx = manager.new_context().await.unwrap();
    assert_eq!(ctx.group_master(1).unwrap(), "s1:1");
}

#[tokio::test]
async fn test_corrupt_entry_aborts_build() {
    let client = MemoryClient::new();
    let manager = new_manager(&client);
    client
        .update(&manager.store().paths().group_path(3), b"{not json".to_vec())
        .await
        .unwrap();

    assert!(matches!(
        manager.new_context().await,
        Err(TopologyError::CodecError(_))
    ));
}

#[tokio::test]
async fn test_closed_client_fails() {
    let client = MemoryClient::new();
    let manager = new_manager(&client);
    manager.close().await.unwrap();
    assert!(matches!(
        manager.new_context().await,
        Err(TopologyError::ClientClosed)
    ));
}
