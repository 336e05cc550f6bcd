//! Decision memoization
//!
//! `can_perform` backs every state-mutating request, so resolved
//! permission sets are memoized per (user, tenant context). The
//! primary invalidation mechanism is event-driven: mutation paths call
//! [`DecisionCache::invalidate_user`] synchronously, so a revocation
//! is visible on the very next decision. The TTL is only a safety
//! upper bound against missed invalidations, never the thing
//! correctness leans on. The source platform's pure-TTL client cache
//! is the defect this replaces.
//!
//! Inserts are guarded by a per-user generation: a resolution that
//! overlapped an invalidation carries a stale generation and is
//! discarded rather than written back over the invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::aggregator::EffectivePermissionSet;

/// Cache key: the user and the tenant context the set was resolved
/// for. `None` is the system-wide context.
type Key = (Uuid, Option<Uuid>);

#[derive(Clone)]
struct Entry {
    resolved: Arc<EffectivePermissionSet>,
    tenant_visible: bool,
    inserted_at: Instant,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<Key, Entry>,
    generations: HashMap<Uuid, u64>,
}

/// Memoized decision state, bounded by a TTL.
pub struct DecisionCache {
    inner: RwLock<CacheInner>,
    ttl: Duration,
}

impl std::fmt::Debug for DecisionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionCache").field("ttl", &self.ttl).finish()
    }
}

impl DecisionCache {
    /// Create a cache with the given TTL upper bound.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(CacheInner::default()),
            ttl,
        }
    }

    /// The user's current invalidation generation.
    ///
    /// Capture this before resolving: [`DecisionCache::insert`] rejects
    /// the write when the generation has moved since, so a resolution
    /// racing a revocation can never re-cache the revoked state.
    pub async fn generation(&self, user_id: Uuid) -> u64 {
        self.inner
            .read()
            .await
            .generations
            .get(&user_id)
            .copied()
            .unwrap_or(0)
    }

    /// Fetch a cached resolution, if fresh.
    ///
    /// # Returns
    ///
    /// The resolved set and the tenant-visibility verdict, or `None`
    /// on miss or expiry
    pub async fn get(
        &self,
        user_id: Uuid,
        tenant_ctx: Option<Uuid>,
    ) -> Option<(Arc<EffectivePermissionSet>, bool)> {
        let inner = self.inner.read().await;
        let entry = inner.entries.get(&(user_id, tenant_ctx))?;
        if entry.inserted_at.elapsed() > self.ttl {
            return None;
        }
        Some((entry.resolved.clone(), entry.tenant_visible))
    }

    /// Store a resolution captured at `generation`.
    ///
    /// The write is discarded when the user was invalidated after the
    /// generation was captured. Expired entries are swept here, so the
    /// map is bounded by the keys touched within one TTL window.
    pub async fn insert(
        &self,
        user_id: Uuid,
        tenant_ctx: Option<Uuid>,
        resolved: Arc<EffectivePermissionSet>,
        tenant_visible: bool,
        generation: u64,
    ) {
        let mut inner = self.inner.write().await;
        let current = inner.generations.get(&user_id).copied().unwrap_or(0);
        if current != generation {
            tracing::debug!(user_id = %user_id,
                "discarding resolution captured before an invalidation");
            return;
        }
        let ttl = self.ttl;
        inner.entries.retain(|_, entry| entry.inserted_at.elapsed() <= ttl);
        inner.entries.insert(
            (user_id, tenant_ctx),
            Entry {
                resolved,
                tenant_visible,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every cached resolution for a user, across all tenant
    /// contexts, and advance the user's generation so overlapping
    /// resolutions cannot write back.
    ///
    /// Called synchronously by the mutation gate whenever a role
    /// assignment or membership affecting the user changes.
    ///
    /// # Returns
    ///
    /// The number of entries dropped
    pub async fn invalidate_user(&self, user_id: Uuid) -> usize {
        let mut inner = self.inner.write().await;
        *inner.generations.entry(user_id).or_insert(0) += 1;
        let before = inner.entries.len();
        inner
            .entries
            .retain(|(cached_user, _), _| *cached_user != user_id);
        let dropped = before - inner.entries.len();
        if dropped > 0 {
            tracing::debug!(user_id = %user_id, dropped, "invalidated cached decisions");
        }
        dropped
    }

    /// Drop everything.
    pub async fn clear(&self) {
        self.inner.write().await.entries.clear();
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use dealer_org::User;

    fn resolved_for(user: &User) -> Arc<EffectivePermissionSet> {
        Arc::new(aggregate(user, &[], Some(Uuid::now_v7())))
    }

    #[tokio::test]
    async fn test_hit_and_miss() {
        let cache = DecisionCache::new(Duration::from_secs(30));
        let user = User::new("Dana", "dana@example.com");
        let tenant = Uuid::now_v7();

        assert!(cache.get(user.id, Some(tenant)).await.is_none());

        let generation = cache.generation(user.id).await;
        cache
            .insert(user.id, Some(tenant), resolved_for(&user), true, generation)
            .await;
        let (_, visible) = cache.get(user.id, Some(tenant)).await.unwrap();
        assert!(visible);

        // Different tenant context is a distinct key
        assert!(cache.get(user.id, Some(Uuid::now_v7())).await.is_none());
        assert!(cache.get(user.id, None).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_user_drops_all_contexts() {
        let cache = DecisionCache::new(Duration::from_secs(30));
        let user = User::new("Dana", "dana@example.com");
        let other = User::new("Riley", "riley@example.com");

        cache
            .insert(user.id, Some(Uuid::now_v7()), resolved_for(&user), true, 0)
            .await;
        cache.insert(user.id, None, resolved_for(&user), false, 0).await;
        cache
            .insert(other.id, Some(Uuid::now_v7()), resolved_for(&other), true, 0)
            .await;

        let dropped = cache.invalidate_user(user.id).await;
        assert_eq!(dropped, 2);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get(user.id, None).await.is_none());
    }

    #[tokio::test]
    async fn test_stale_generation_insert_is_discarded() {
        let cache = DecisionCache::new(Duration::from_secs(30));
        let user = User::new("Dana", "dana@example.com");

        // A resolution begins, capturing the current generation...
        let generation = cache.generation(user.id).await;

        // ...a revocation invalidates mid-flight...
        cache.invalidate_user(user.id).await;

        // ...so the stale snapshot must not be written back.
        cache
            .insert(user.id, None, resolved_for(&user), true, generation)
            .await;
        assert!(cache.get(user.id, None).await.is_none());

        // A resolution started after the invalidation stores normally.
        let generation = cache.generation(user.id).await;
        cache
            .insert(user.id, None, resolved_for(&user), true, generation)
            .await;
        assert!(cache.get(user.id, None).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_is_an_upper_bound() {
        let cache = DecisionCache::new(Duration::from_millis(50));
        let user = User::new("Dana", "dana@example.com");

        cache.insert(user.id, None, resolved_for(&user), true, 0).await;
        assert!(cache.get(user.id, None).await.is_some());

        tokio::time::advance(Duration::from_millis(60)).await;
        assert!(cache.get(user.id, None).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_sweeps_expired_entries() {
        let cache = DecisionCache::new(Duration::from_millis(50));
        let user = User::new("Dana", "dana@example.com");
        let other = User::new("Riley", "riley@example.com");

        cache.insert(user.id, Some(Uuid::now_v7()), resolved_for(&user), true, 0).await;
        cache.insert(other.id, None, resolved_for(&other), true, 0).await;
        assert_eq!(cache.len().await, 2);

        tokio::time::advance(Duration::from_millis(60)).await;

        // The next insert evicts the expired entries; the map does not
        // grow with every key ever touched.
        cache.insert(user.id, None, resolved_for(&user), true, 0).await;
        assert_eq!(cache.len().await, 1);
    }
}
