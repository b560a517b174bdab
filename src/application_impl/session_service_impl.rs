use crate::application_impl::{JwtConfig, TokenIssuer, TokenValidator};
use crate::application_port::*;
use crate::domain_model::{Claims, Principal, PrincipalId};
use crate::domain_port::{RevocationStore, keys};
use crate::logger::*;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Session lifecycle over a shared revocation store.
///
/// A principal has an active session while `refresh_token:<id>` exists. Issuing
/// overwrites that record, so an older refresh token stops working while its
/// access token stays valid until it expires. Refresh does not rotate the
/// stored token.
pub struct RealSessionService {
    validator: TokenValidator,
    issuer: TokenIssuer,
    store: Arc<dyn RevocationStore>,
}

impl RealSessionService {
    pub fn new(
        codec: Arc<dyn TokenCodec>,
        store: Arc<dyn RevocationStore>,
        cfg: &JwtConfig,
    ) -> Self {
        Self {
            validator: TokenValidator::new(codec.clone(), store.clone()),
            issuer: TokenIssuer::new(codec, store.clone(), cfg),
            store,
        }
    }
}

/// How long a blacklist entry for `claims` must live, measured from `now`.
/// Nothing is left to revoke once the remaining lifetime reaches zero.
fn blacklist_ttl(claims: &Claims, now: DateTime<Utc>) -> Result<Duration, AuthError> {
    claims
        .remaining_ttl(now)
        .to_std()
        .ok()
        .filter(|ttl| !ttl.is_zero())
        .ok_or(AuthError::AlreadyExpired)
}

#[async_trait::async_trait]
impl SessionService for RealSessionService {
    async fn issue_pair(&self, principal: &Principal) -> Result<AuthTokens, AuthError> {
        let tokens = self.issuer.generate_token_pair(principal).await?;
        info!(principal_id = %principal.id, role = %principal.role, "session issued");
        Ok(tokens)
    }

    async fn validate_access(&self, token: &str) -> Result<Claims, AuthError> {
        self.validator.validate_access(token).await
    }

    async fn validate_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        self.validator.validate_refresh(token).await
    }

    async fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validator.validate_token(token).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedAccess, AuthError> {
        let claims = self.validator.validate_refresh(refresh_token).await?;
        let principal_id = claims.subject;

        let stored = self
            .store
            .get(&keys::refresh_token(principal_id))
            .await
            .map_err(AuthError::StoreUnavailable)?;

        match stored {
            None => {
                debug!(%principal_id, "refresh without session");
                return Err(AuthError::SessionNotFound);
            }
            Some(current) if current != refresh_token => {
                debug!(%principal_id, jti = %claims.token_id, "refresh token superseded");
                return Err(AuthError::SessionMismatch);
            }
            Some(_) => {}
        }

        // The stored refresh token is kept as is. Rotating it here would need an
        // atomic compare-and-swap against the stored value.
        let (access_token, access_token_expires_at) =
            self.issuer.generate_access_token(&claims.principal())?;
        debug!(%principal_id, "access token refreshed");

        Ok(RefreshedAccess {
            access_token,
            access_token_expires_at,
        })
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.validator.validate_token(token).await?;

        let ttl = blacklist_ttl(&claims, Utc::now())?;

        self.store
            .put(&keys::blacklist(token), keys::BLACKLIST_MARKER, ttl)
            .await
            .map_err(AuthError::StoreUnavailable)?;

        info!(
            principal_id = %claims.subject,
            jti = %claims.token_id,
            token_type = %claims.token_type,
            ttl_ms = ttl.as_millis() as u64,
            "token revoked"
        );
        Ok(())
    }

    async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        let claims = self.validator.validate_access(access_token).await?;

        self.store
            .delete(&keys::refresh_token(claims.subject))
            .await
            .map_err(AuthError::StoreUnavailable)?;

        info!(principal_id = %claims.subject, "session closed");
        Ok(())
    }

    async fn remove_from_blacklist(&self, token: &str) -> Result<(), AuthError> {
        if token.is_empty() {
            return Err(AuthError::MalformedToken);
        }
        self.store
            .delete(&keys::blacklist(token))
            .await
            .map_err(AuthError::StoreUnavailable)?;
        info!("token removed from blacklist");
        Ok(())
    }

    async fn has_session(&self, principal_id: PrincipalId) -> Result<bool, AuthError> {
        self.store
            .exists(&keys::refresh_token(principal_id))
            .await
            .map_err(AuthError::StoreUnavailable)
    }
}
