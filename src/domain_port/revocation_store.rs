use std::time::Duration;

/// External key-value service holding session records and blacklist entries.
///
/// It is the only source of truth for both; implementations must not cache
/// reads in process, and must be safe to share across tasks.
#[async_trait::async_trait]
pub trait RevocationStore: Send + Sync {
    /// Set `key` to `value`, replacing any previous value, expiring after `ttl`.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;
    /// Current value of `key`, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store error: {0}")]
    Internal(String),
}
