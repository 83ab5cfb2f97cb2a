use super::TopologyManager;
use crate::cache::{CacheEntry, EntityCache};
use crate::context::Context;
use crate::core::{Result, TopologyError};
use crate::models::{Group, Proxy, SlotMapping};
use futures::{StreamExt, TryStreamExt, stream};
use std::collections::BTreeMap;
use std::future::Future;
use std::hash::Hash;
use tracing::{Instrument, Level, event, info_span};

impl TopologyManager {
    /// Builds a consistent snapshot of the topology.
    ///
    /// Cached entries are reused as they are; unknown keys are read from the
    /// store. A kind that is not loaded is enumerated from its directory and
    /// then read key by key, through the same checked reads as a single dirty
    /// key. Any store or decode failure aborts the whole build.
    pub async fn new_context(&self) -> Result<Context> {
        let span = info_span!(
            "topology.context.build",
            product = %self.config.product_name,
            max_slot_num = self.config.max_slot_num
        );

        async {
            let (slots, groups, proxies) = tokio::try_join!(
                self.refill_slots(),
                self.refill_groups(),
                self.refill_proxies()
            )?;
            event!(
                Level::DEBUG,
                groups = groups.len(),
                proxies = proxies.len(),
                "context built"
            );
            Context::new(slots, groups, proxies)
        }
        .instrument(span)
        .await
    }

    async fn refill_slots(&self) -> Result<Vec<SlotMapping>> {
        let cache = self.cache.slots();
        let plan = cache.plan()?;
        let keys: Vec<u32> = if plan.is_full() {
            (0..self.config.max_slot_num).collect()
        } else {
            plan.misses().to_vec()
        };
        log_plan(cache, plan.is_full(), plan.hits().len(), keys.len());

        let fetched = self
            .fetch_entries(keys, |sid| self.store.load_slot_mapping(sid))
            .await?;
        let mut merged = cache.complete(plan, fetched)?;

        // slots that were never written are unassigned
        Ok((0..self.config.max_slot_num)
            .map(|sid| merged.remove(&sid).unwrap_or_else(|| SlotMapping::new(sid)))
            .collect())
    }

    async fn refill_groups(&self) -> Result<BTreeMap<u32, Group>> {
        let cache = self.cache.groups();
        let plan = cache.plan()?;
        let keys = if plan.is_full() {
            self.store.group_ids().await?
        } else {
            plan.misses().to_vec()
        };
        log_plan(cache, plan.is_full(), plan.hits().len(), keys.len());

        let fetched = self
            .fetch_entries(keys, |gid| self.store.load_group(gid))
            .await?;
        cache.complete(plan, fetched)
    }

    async fn refill_proxies(&self) -> Result<BTreeMap<String, Proxy>> {
        let cache = self.cache.proxies();
        let plan = cache.plan()?;
        let keys = if plan.is_full() {
            self.store.proxy_tokens().await?
        } else {
            plan.misses().to_vec()
        };
        log_plan(cache, plan.is_full(), plan.hits().len(), keys.len());

        let store = &self.store;
        let fetched = self
            .fetch_entries(keys, |token: String| async move {
                store.load_proxy(&token).await
            })
            .await?;
        cache.complete(plan, fetched)
    }

    /// Reads `keys` with at most `fetch_concurrency` reads in flight.
    async fn fetch_entries<K, V, F, Fut>(
        &self,
        keys: Vec<K>,
        load: F,
    ) -> Result<Vec<(K, CacheEntry<V>)>>
    where
        K: Clone,
        F: Fn(K) -> Fut,
        Fut: Future<Output = Result<Option<V>>>,
    {
        stream::iter(keys)
            .map(|key| {
                let read = load(key.clone());
                async move { Ok::<_, TopologyError>((key, CacheEntry::from(read.await?))) }
            })
            .buffer_unordered(self.config.fetch_concurrency)
            .try_collect()
            .await
    }
}

fn log_plan<K, V>(cache: &EntityCache<K, V>, full: bool, hits: usize, misses: usize)
where
    K: Clone + Eq + Hash + Ord + std::fmt::Debug,
    V: Clone,
{
    event!(
        Level::DEBUG,
        kind = cache.kind(),
        full,
        hits,
        misses,
        "refilling cache"
    );
}
