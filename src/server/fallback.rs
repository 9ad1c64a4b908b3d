//! On-demand resolution of post pages
//!
//! Each uid moves through `Resolving → Loaded` or `Resolving → NotFound`.
//! Both end states are terminal. A fetch that fails records `Failed`, which
//! is reported once and then dropped so a later request can try again.
//!
//! The cache holds at most `capacity` uids. When full, a `NotFound` or
//! `Failed` entry is evicted first, then a `Loaded` one; `Resolving` entries
//! are never evicted.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::content::PostDetail;
use crate::Blog;

#[derive(Debug, Clone)]
pub enum DetailState {
    Resolving,
    Loaded(Arc<PostDetail>),
    NotFound,
    /// The last fetch failed with this message
    Failed(String),
}

/// Shared per-uid detail states
#[derive(Debug, Clone)]
pub struct DetailCache {
    entries: Arc<RwLock<HashMap<String, DetailState>>>,
    capacity: usize,
}

impl DetailCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::default(),
            capacity: capacity.max(1),
        }
    }

    pub async fn get(&self, uid: &str) -> Option<DetailState> {
        self.entries.read().await.get(uid).cloned()
    }

    /// Mark `uid` as resolving
    ///
    /// Returns `true` only for the caller that created the entry; that caller
    /// is responsible for fetching.
    pub async fn claim(&self, uid: &str) -> bool {
        let mut entries = self.entries.write().await;
        if entries.contains_key(uid) {
            return false;
        }
        if entries.len() >= self.capacity {
            evict(&mut entries);
        }
        entries.insert(uid.to_string(), DetailState::Resolving);
        true
    }

    /// Record the fetched document, or its absence
    pub async fn finish(&self, uid: &str, detail: Option<PostDetail>) -> DetailState {
        let mut entries = self.entries.write().await;
        let state = match detail {
            Some(post) => DetailState::Loaded(Arc::new(post)),
            None => DetailState::NotFound,
        };

        match entries.get(uid) {
            Some(DetailState::Resolving) | None => {
                entries.insert(uid.to_string(), state.clone());
                state
            }
            // End states never change
            Some(existing) => existing.clone(),
        }
    }

    /// Record a failed fetch of a resolving uid
    pub async fn fail(&self, uid: &str, message: String) {
        let mut entries = self.entries.write().await;
        if matches!(entries.get(uid), Some(DetailState::Resolving)) {
            entries.insert(uid.to_string(), DetailState::Failed(message));
        }
    }

    /// Forget a resolution that is in progress or failed
    pub async fn abandon(&self, uid: &str) {
        let mut entries = self.entries.write().await;
        if matches!(
            entries.get(uid),
            Some(DetailState::Resolving | DetailState::Failed(_))
        ) {
            entries.remove(uid);
        }
    }
}

fn evict(entries: &mut HashMap<String, DetailState>) {
    let victim = entries
        .iter()
        .find(|(_, state)| matches!(state, DetailState::NotFound | DetailState::Failed(_)))
        .or_else(|| {
            entries
                .iter()
                .find(|(_, state)| matches!(state, DetailState::Loaded(_)))
        })
        .map(|(uid, _)| uid.clone());

    if let Some(uid) = victim {
        tracing::debug!("Evicting cached post {:?}", uid);
        entries.remove(&uid);
    }
}

/// Fetch `uid` and record the outcome
pub async fn resolve(blog: &Blog, cache: &DetailCache, uid: &str) -> Result<DetailState> {
    match blog.post(uid).await {
        Ok(detail) => {
            if detail.is_none() {
                tracing::info!("Post {:?} not found", uid);
            }
            Ok(cache.finish(uid, detail).await)
        }
        Err(e) => {
            cache.fail(uid, e.to_string()).await;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::testing::{raw_post, MemoryContentApi};
    use crate::config::SiteConfig;

    fn blog(api: MemoryContentApi) -> Blog {
        Blog::with_api(SiteConfig::default(), std::env::temp_dir(), Arc::new(api))
    }

    #[tokio::test]
    async fn test_only_first_claim_wins() {
        let cache = DetailCache::new(16);
        assert!(cache.claim("a").await);
        assert!(!cache.claim("a").await);
        assert!(matches!(cache.get("a").await, Some(DetailState::Resolving)));
    }

    #[tokio::test]
    async fn test_resolve_loaded_and_not_found() {
        let blog = blog(MemoryContentApi::with_pages(vec![vec![raw_post("a", "A")]]));
        let cache = DetailCache::new(16);

        cache.claim("a").await;
        let state = resolve(&blog, &cache, "a").await.unwrap();
        assert!(matches!(state, DetailState::Loaded(ref post) if post.title == "A"));

        cache.claim("missing").await;
        resolve(&blog, &cache, "missing").await.unwrap();
        assert!(matches!(cache.get("missing").await, Some(DetailState::NotFound)));
    }

    #[tokio::test]
    async fn test_end_states_are_terminal() {
        let cache = DetailCache::new(16);
        cache.claim("a").await;
        cache.finish("a", None).await;

        assert!(!cache.claim("a").await);
        cache.abandon("a").await;
        let state = cache.finish("a", None).await;
        assert!(matches!(state, DetailState::NotFound));
        assert!(matches!(cache.get("a").await, Some(DetailState::NotFound)));
    }

    #[tokio::test]
    async fn test_failed_lookup_is_recorded_then_abandoned() {
        let api = MemoryContentApi::with_pages(vec![vec![raw_post("a", "A")]]);
        api.fail_lookups();
        let blog = blog(api);
        let cache = DetailCache::new(16);

        cache.claim("a").await;
        assert!(resolve(&blog, &cache, "a").await.is_err());
        assert!(matches!(cache.get("a").await, Some(DetailState::Failed(_))));
        assert!(!cache.claim("a").await);

        cache.abandon("a").await;
        assert!(cache.get("a").await.is_none());
        assert!(cache.claim("a").await);
    }

    #[tokio::test]
    async fn test_cache_is_bounded() {
        let blog = blog(MemoryContentApi::with_pages(vec![vec![raw_post("a", "A")]]));
        let cache = DetailCache::new(3);

        cache.claim("a").await;
        resolve(&blog, &cache, "a").await.unwrap();

        for n in 0..100 {
            let uid = format!("junk-{}", n);
            assert!(cache.claim(&uid).await);
            resolve(&blog, &cache, &uid).await.unwrap();
        }

        let mut junk = 0;
        for n in 0..100 {
            if cache.get(&format!("junk-{}", n)).await.is_some() {
                junk += 1;
            }
        }
        assert_eq!(junk, 2);
        assert!(matches!(cache.get("a").await, Some(DetailState::Loaded(_))));
    }
}
