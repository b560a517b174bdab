//! Walks through the session lifecycle against the in-memory store:
//! issue, validate, revoke, re-issue, refresh and logout.
//!
//! $ cargo run --bin session_demo
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokenkeeper::application_impl::*;
use tokenkeeper::application_port::*;
use tokenkeeper::domain_model::*;
use tokenkeeper::infra_memory::MemoryRevocationStore;
use tokenkeeper::logger::*;

fn report<T: std::fmt::Debug>(step: &str, result: &Result<T, AuthError>) {
    match result {
        Ok(v) => info!("{step}: ok {v:?}"),
        Err(e) => info!("{step}: {e} (http {})", e.http_status()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap()?;
    logger.reload_from_config(&LogConfig {
        filter: "session_demo=info,tokenkeeper=debug".to_string(),
    })?;

    let cfg = JwtConfig::try_new(b"demo-secret-do-not-deploy".to_vec())?;
    let codec = Arc::new(JwtCodec::new(&cfg));
    let store = Arc::new(MemoryRevocationStore::new());
    let service = RealSessionService::new(codec.clone(), store.clone(), &cfg);

    let alice = Principal::new(42, "alice", "user");

    // A: issue and validate
    let first = service.issue_pair(&alice).await?;
    let claims = service.validate_access(first.access_token.as_str()).await;
    report("A validate access", &claims.map(|c| c.subject));

    // B: revoke the access token
    service.revoke(first.access_token.as_str()).await?;
    report(
        "B validate revoked access",
        &service.validate_access(first.access_token.as_str()).await,
    );

    // C: a second login supersedes the first refresh token
    let second = service.issue_pair(&alice).await?;
    report(
        "C refresh with superseded token",
        &service.refresh(first.refresh_token.as_str()).await,
    );
    report(
        "C refresh with current token",
        &service
            .refresh(second.refresh_token.as_str())
            .await
            .map(|r| r.access_token_expires_at),
    );

    // D: a token that expired before it was ever presented
    let stale = Claims::new(
        &alice,
        TokenType::Access,
        &cfg.issuer,
        &cfg.audience,
        Utc::now() - Duration::hours(1),
        Duration::minutes(15),
    );
    let stale = codec.encode(&stale)?;
    report("D validate expired", &service.validate_access(&stale).await);

    // E: logout ends refresh but not the outstanding access token
    service.logout(second.access_token.as_str()).await?;
    report(
        "E refresh after logout",
        &service.refresh(second.refresh_token.as_str()).await,
    );
    report(
        "E access after logout",
        &service
            .validate_access(second.access_token.as_str())
            .await
            .map(|c| c.subject),
    );

    info!("store holds {} entries", store.len());
    Ok(())
}
