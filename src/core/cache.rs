use async_trait::async_trait;
use std::time::Duration;

/// Async key-value cache with optional per-entry expiry.
#[async_trait]
pub trait Cache<K, V>: Send + Sync {
    async fn get(&self, key: &K) -> Option<V>;

    /// Stores `value`; it is dropped from reads once `ttl` has elapsed.
    async fn put(&self, key: K, value: V, ttl: Option<Duration>);
}
