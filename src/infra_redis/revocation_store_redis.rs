use crate::domain_port::*;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};
use std::time::Duration;

/// Revocation store backed by Redis. Keys are written as given, with `PX` expiry.
#[derive(Clone)]
pub struct RedisRevocationStore {
    conn: ConnectionManager,
}

impl RedisRevocationStore {
    pub fn new(conn: ConnectionManager) -> Self {
        RedisRevocationStore { conn }
    }

    pub async fn connect(dsn: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(dsn).map_err(store_error)?;
        let conn = client.get_connection_manager().await.map_err(store_error)?;
        Ok(Self::new(conn))
    }
}

fn store_error(e: RedisError) -> StoreError {
    if e.is_io_error()
        || e.is_connection_refusal()
        || e.is_connection_dropped()
        || e.is_timeout()
    {
        StoreError::Unavailable(e.to_string())
    } else {
        StoreError::Internal(e.to_string())
    }
}

#[async_trait::async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        if millis == 0 {
            return Err(StoreError::Internal(format!("non-positive ttl for {key}")));
        }
        let mut conn = self.conn.clone();
        let _: () = conn.pset_ex(key, value, millis).await.map_err(store_error)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let val: Option<String> = conn.get(key).await.map_err(store_error)?;
        Ok(val)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await.map_err(store_error)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let found: bool = conn.exists(key).await.map_err(store_error)?;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // cargo test -- --ignored, with TOKENKEEPER_TEST_REDIS=redis://127.0.0.1:6379
    #[tokio::test]
    #[ignore]
    async fn round_trip_against_live_redis() {
        let dsn = std::env::var("TOKENKEEPER_TEST_REDIS")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let store = RedisRevocationStore::connect(&dsn).await.unwrap();
        let key = keys::blacklist(&format!("test-{}", uuid::Uuid::new_v4()));

        store
            .put(&key, keys::BLACKLIST_MARKER, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(store.exists(&key).await.unwrap());
        assert_eq!(
            store.get(&key).await.unwrap().as_deref(),
            Some(keys::BLACKLIST_MARKER)
        );

        store.delete(&key).await.unwrap();
        assert!(!store.exists(&key).await.unwrap());
        assert_eq!(store.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore]
    async fn entries_expire_on_the_server() {
        let dsn = std::env::var("TOKENKEEPER_TEST_REDIS")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let store = RedisRevocationStore::connect(&dsn).await.unwrap();
        let key = keys::blacklist(&format!("ttl-{}", uuid::Uuid::new_v4()));

        store
            .put(&key, keys::BLACKLIST_MARKER, Duration::from_millis(100))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!store.exists(&key).await.unwrap());
    }
}
