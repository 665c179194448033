//! In-memory bounded history cache layered over the durable entry store.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use sb_core::clipboard::{ClipboardEntry, NewClipboardEntry};
use sb_core::ports::{EntryStoreError, EntryStorePort};
use tokio::sync::Mutex;

/// Caching decorator around an [`EntryStorePort`].
///
/// Holds the most recent `capacity` entries newest first plus a latest-entry
/// index keyed by content type. Reads consult the cache when warm and fall
/// through to the inner store otherwise, populating lazily. A pure
/// performance layer: removing it changes latency, never results.
pub struct CachedEntryStore {
    inner: Arc<dyn EntryStorePort>,
    capacity: usize,
    cache: Mutex<CacheState>,
}

struct CacheState {
    /// Newest-first bounded view of recent entries. Valid only when `warm`.
    recent: VecDeque<ClipboardEntry>,
    /// Most recent entry per content type. Misses fall through to the store.
    latest_by_type: HashMap<String, ClipboardEntry>,
    /// True once `recent` holds the newest `min(capacity, total)` entries.
    warm: bool,
}

impl CachedEntryStore {
    pub fn new(inner: Arc<dyn EntryStorePort>, capacity: usize) -> Self {
        Self {
            inner,
            capacity,
            cache: Mutex::new(CacheState {
                recent: VecDeque::new(),
                latest_by_type: HashMap::new(),
                warm: false,
            }),
        }
    }
}

#[async_trait::async_trait]
impl EntryStorePort for CachedEntryStore {
    async fn insert(&self, new: NewClipboardEntry) -> Result<ClipboardEntry, EntryStoreError> {
        // The lock spans the inner insert so cache updates apply in the same
        // order the store assigned ids.
        let mut cache = self.cache.lock().await;
        let entry = self.inner.insert(new).await?;

        cache.recent.push_front(entry.clone());
        cache.recent.truncate(self.capacity);
        // Once the deque filled up from inserts alone it is exactly the
        // newest-`capacity` view, whatever was in the store before startup.
        if cache.recent.len() == self.capacity {
            cache.warm = true;
        }
        cache
            .latest_by_type
            .insert(entry.content_type.clone(), entry.clone());

        Ok(entry)
    }

    async fn recent_history(&self, limit: usize) -> Result<Vec<ClipboardEntry>, EntryStoreError> {
        let mut cache = self.cache.lock().await;

        if cache.warm && limit <= self.capacity {
            return Ok(cache.recent.iter().take(limit).cloned().collect());
        }

        let fetch = limit.max(self.capacity);
        let entries = self.inner.recent_history(fetch).await?;

        if limit <= self.capacity {
            cache.recent = entries.iter().take(self.capacity).cloned().collect();
            cache.warm = true;
        }

        Ok(entries.into_iter().take(limit).collect())
    }

    async fn latest_by_type(
        &self,
        content_type: &str,
    ) -> Result<Option<ClipboardEntry>, EntryStoreError> {
        let mut cache = self.cache.lock().await;

        if let Some(entry) = cache.latest_by_type.get(content_type) {
            return Ok(Some(entry.clone()));
        }

        let found = self.inner.latest_by_type(content_type).await?;
        if let Some(entry) = &found {
            cache
                .latest_by_type
                .insert(entry.content_type.clone(), entry.clone());
        }
        // A miss is not cached: the next insert of this type warms the index.

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::ids::DeviceId;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    /// Store stub that counts reads so tests can prove cache hits.
    struct CountingStore {
        entries: Mutex<Vec<ClipboardEntry>>,
        next_id: AtomicI64,
        history_reads: AtomicUsize,
        latest_reads: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                entries: Mutex::new(Vec::new()),
                next_id: AtomicI64::new(1),
                history_reads: AtomicUsize::new(0),
                latest_reads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl EntryStorePort for CountingStore {
        async fn insert(&self, new: NewClipboardEntry) -> Result<ClipboardEntry, EntryStoreError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let entry = ClipboardEntry {
                id,
                device_id: new.device_id,
                content_type: new.content_type,
                content: new.content,
                created_at_ms: id,
            };
            self.entries.lock().await.push(entry.clone());
            Ok(entry)
        }

        async fn recent_history(
            &self,
            limit: usize,
        ) -> Result<Vec<ClipboardEntry>, EntryStoreError> {
            self.history_reads.fetch_add(1, Ordering::SeqCst);
            let entries = self.entries.lock().await;
            Ok(entries.iter().rev().take(limit).cloned().collect())
        }

        async fn latest_by_type(
            &self,
            content_type: &str,
        ) -> Result<Option<ClipboardEntry>, EntryStoreError> {
            self.latest_reads.fetch_add(1, Ordering::SeqCst);
            let entries = self.entries.lock().await;
            Ok(entries
                .iter()
                .rev()
                .find(|e| e.content_type == content_type)
                .cloned())
        }
    }

    fn new_entry(content_type: &str, content: &str) -> NewClipboardEntry {
        NewClipboardEntry::new(DeviceId::from("d1"), content_type, content)
    }

    #[tokio::test]
    async fn test_history_served_from_cache_once_warm() {
        let store = Arc::new(CountingStore::new());
        let cached = CachedEntryStore::new(store.clone(), 3);

        for i in 0..3 {
            cached
                .insert(new_entry("text/plain", &format!("c{}", i)))
                .await
                .unwrap();
        }

        let history = cached.recent_history(3).await.unwrap();
        assert_eq!(
            history.iter().map(|e| e.content.as_str()).collect::<Vec<_>>(),
            vec!["c2", "c1", "c0"]
        );
        assert_eq!(
            store.history_reads.load(Ordering::SeqCst),
            0,
            "warm cache must not hit the store"
        );
    }

    #[tokio::test]
    async fn test_cold_read_falls_through_and_populates() {
        let store = Arc::new(CountingStore::new());
        // seed the store before the cache exists (reconnect-after-restart path)
        for i in 0..5 {
            store
                .insert(new_entry("text/plain", &format!("c{}", i)))
                .await
                .unwrap();
        }

        let cached = CachedEntryStore::new(store.clone(), 3);

        let first = cached.recent_history(3).await.unwrap();
        assert_eq!(first[0].content, "c4");
        assert_eq!(store.history_reads.load(Ordering::SeqCst), 1);

        // second read is a cache hit
        let second = cached.recent_history(3).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(store.history_reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_eviction_keeps_newest() {
        let store = Arc::new(CountingStore::new());
        let cached = CachedEntryStore::new(store.clone(), 2);

        for i in 0..4 {
            cached
                .insert(new_entry("text/plain", &format!("c{}", i)))
                .await
                .unwrap();
        }

        let history = cached.recent_history(2).await.unwrap();
        assert_eq!(
            history.iter().map(|e| e.content.as_str()).collect::<Vec<_>>(),
            vec!["c3", "c2"]
        );
        // evicted from the cache, not from the store
        let all = cached.recent_history(10).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_latest_by_type_overwrite_and_lazy_population() {
        let store = Arc::new(CountingStore::new());
        store.insert(new_entry("text/plain", "a")).await.unwrap();

        let cached = CachedEntryStore::new(store.clone(), 20);

        // cold miss falls through and caches the hit
        let latest = cached.latest_by_type("text/plain").await.unwrap().unwrap();
        assert_eq!(latest.content, "a");
        assert_eq!(store.latest_reads.load(Ordering::SeqCst), 1);
        let again = cached.latest_by_type("text/plain").await.unwrap().unwrap();
        assert_eq!(again.content, "a");
        assert_eq!(store.latest_reads.load(Ordering::SeqCst), 1);

        // newer insert overwrites the cached entry
        cached.insert(new_entry("text/plain", "b")).await.unwrap();
        let latest = cached.latest_by_type("text/plain").await.unwrap().unwrap();
        assert_eq!(latest.content, "b");
        assert_eq!(store.latest_reads.load(Ordering::SeqCst), 1);

        // never-submitted type is a clean not-found, not an error
        assert!(cached.latest_by_type("text/html").await.unwrap().is_none());
    }
}
