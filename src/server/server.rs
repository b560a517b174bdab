use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::Arc;
use std::time::Duration;

/// Composition root: wires the store and codec chosen by settings into the
/// session service.
pub struct Server {
    pub session_service: Arc<dyn SessionService>,
    pub store: Arc<dyn RevocationStore>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let jwt_config = settings.auth.jwt_config()?;
        debug!(?jwt_config);

        let store: Arc<dyn RevocationStore> = match settings.store.backend.as_str() {
            "redis" => {
                let store = RedisRevocationStore::connect(&settings.store.redis_dsn).await?;
                Arc::new(store)
            }
            "memory" => {
                warn!("memory store holds sessions for this process only");
                let store = Arc::new(MemoryRevocationStore::new());
                store.spawn_purger(Duration::from_secs(settings.store.purge_interval_secs));
                store
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        Ok(Self::with_store(&jwt_config, store))
    }

    pub fn with_store(jwt_config: &JwtConfig, store: Arc<dyn RevocationStore>) -> Self {
        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtCodec::new(jwt_config));
        let session_service: Arc<dyn SessionService> = Arc::new(RealSessionService::new(
            token_codec,
            store.clone(),
            jwt_config,
        ));
        Self {
            session_service,
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::Principal;

    #[tokio::test]
    async fn wires_a_working_service() {
        let cfg = JwtConfig::try_new(b"server-secret".to_vec()).unwrap();
        let server = Server::with_store(&cfg, Arc::new(MemoryRevocationStore::new()));

        let tokens = server
            .session_service
            .issue_pair(&Principal::new(5, "carol", "user"))
            .await
            .unwrap();
        assert!(server.store.exists("refresh_token:5").await.unwrap());
        assert!(server
            .session_service
            .validate_access(tokens.access_token.as_str())
            .await
            .is_ok());
    }
}
