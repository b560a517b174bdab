use crate::domain_port::{RevocationStore, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Store double whose every call fails as unreachable. Counts the calls it saw.
#[derive(Default)]
pub(crate) struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

#[async_trait::async_trait]
impl RevocationStore for FailingStore {
    async fn put(&self, _: &str, _: &str, _: Duration) -> Result<(), StoreError> {
        self.fail()
    }

    async fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
        self.fail()
    }

    async fn delete(&self, _: &str) -> Result<(), StoreError> {
        self.fail()
    }

    async fn exists(&self, _: &str) -> Result<bool, StoreError> {
        self.fail()
    }
}
