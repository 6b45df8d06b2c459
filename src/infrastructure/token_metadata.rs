//! Process-wide token metadata cache with wholesale TTL refresh

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use crate::domain::token::TokenSnapshot;
use crate::infrastructure::jupiter::TokenSource;
use crate::shared::errors::TokenError;

struct CacheState {
    snapshot: Arc<TokenSnapshot>,
    refreshed_at: Option<Instant>,
}

/// Token metadata cache.
///
/// Readers take an `Arc` to the current snapshot and keep using it while a
/// refresh runs. A refresh builds the complete new snapshot first and then
/// swaps the pointer, so readers never observe a partial list.
pub struct TokenMetadataCache {
    source: Arc<dyn TokenSource>,
    ttl: Duration,
    state: RwLock<CacheState>,
}

impl TokenMetadataCache {
    /// Create an empty cache; the first `ensure_fresh` populates it
    pub fn new(source: Arc<dyn TokenSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            state: RwLock::new(CacheState {
                snapshot: Arc::new(TokenSnapshot::empty()),
                refreshed_at: None,
            }),
        }
    }

    /// Current snapshot, possibly empty or stale
    pub fn snapshot(&self) -> Arc<TokenSnapshot> {
        Arc::clone(&self.state.read().snapshot)
    }

    pub fn is_stale(&self) -> bool {
        match self.state.read().refreshed_at {
            Some(at) => at.elapsed() >= self.ttl,
            None => true,
        }
    }

    /// Fetch the token list and replace the snapshot. On failure the previous
    /// snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<TokenSnapshot>, TokenError> {
        let tokens = self.source.fetch_tokens().await?;
        let snapshot = Arc::new(TokenSnapshot::from_tokens(tokens));

        {
            let mut state = self.state.write();
            state.snapshot = Arc::clone(&snapshot);
            state.refreshed_at = Some(Instant::now());
        }

        info!("Token metadata cache refreshed: {} tokens", snapshot.len());
        Ok(snapshot)
    }

    /// Snapshot, refreshed first if the TTL has expired
    pub async fn ensure_fresh(&self) -> Result<Arc<TokenSnapshot>, TokenError> {
        if self.is_stale() {
            self.refresh().await
        } else {
            Ok(self.snapshot())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::{TokenLookup, TokenMeta};
    use crate::test_support::{sol, usdc};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeTokenSource {
        calls: AtomicUsize,
        // Calls from this index on fail
        fail_from: usize,
    }

    impl FakeTokenSource {
        fn healthy() -> Self {
            Self::failing_after(usize::MAX)
        }

        fn failing_after(fail_from: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_from,
            }
        }
    }

    #[async_trait]
    impl TokenSource for FakeTokenSource {
        async fn fetch_tokens(&self) -> Result<Vec<TokenMeta>, TokenError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call >= self.fail_from {
                return Err(TokenError::Network("offline".to_string()));
            }
            // Each refresh lists one more token so snapshots are distinguishable
            let mut tokens = vec![TokenMeta::new(usdc(), "USDC", 6)];
            if call > 0 {
                tokens.push(TokenMeta::new(sol(), "SOL", 9));
            }
            Ok(tokens)
        }
    }

    #[tokio::test]
    async fn test_first_use_populates_cache() {
        let source = Arc::new(FakeTokenSource::healthy());
        let cache = TokenMetadataCache::new(source.clone(), Duration::from_secs(3600));

        assert!(cache.is_stale());
        assert!(cache.snapshot().is_empty());

        let snapshot = cache.ensure_fresh().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(!cache.is_stale());

        cache.ensure_fresh().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_ttl_refreshes_wholesale() {
        let source = Arc::new(FakeTokenSource::healthy());
        let cache = TokenMetadataCache::new(source.clone(), Duration::ZERO);

        let old = cache.ensure_fresh().await.unwrap();
        let new = cache.ensure_fresh().await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        // A reader holding the old snapshot is unaffected by the swap
        assert_eq!(old.len(), 1);
        assert!(old.token(&sol()).is_none());
        assert_eq!(new.len(), 2);
        assert_eq!(cache.snapshot().display_label(&sol()), "SOL");
    }

    #[tokio::test]
    async fn test_failed_first_fetch_leaves_cache_empty() {
        let source = Arc::new(FakeTokenSource::failing_after(0));
        let cache = TokenMetadataCache::new(source, Duration::from_secs(3600));

        let err = cache.ensure_fresh().await.unwrap_err();
        assert_eq!(err, TokenError::Network("offline".to_string()));
        assert!(cache.snapshot().is_empty());
        assert!(cache.is_stale());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let source = Arc::new(FakeTokenSource::failing_after(1));
        let cache = TokenMetadataCache::new(source.clone(), Duration::ZERO);

        let populated = cache.ensure_fresh().await.unwrap();
        assert_eq!(populated.len(), 1);

        let err = cache.ensure_fresh().await.unwrap_err();
        assert_eq!(err, TokenError::Network("offline".to_string()));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        let current = cache.snapshot();
        assert!(Arc::ptr_eq(&current, &populated));
        assert_eq!(current.display_label(&usdc()), "USDC");
    }
}
