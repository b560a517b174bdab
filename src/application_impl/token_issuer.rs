use crate::application_impl::JwtConfig;
use crate::application_port::{AccessToken, AuthError, AuthTokens, RefreshToken, TokenCodec};
use crate::domain_model::{Claims, Principal, TokenType};
use crate::domain_port::{RevocationStore, keys};
use crate::logger::*;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

pub struct TokenIssuer {
    codec: Arc<dyn TokenCodec>,
    store: Arc<dyn RevocationStore>,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        codec: Arc<dyn TokenCodec>,
        store: Arc<dyn RevocationStore>,
        cfg: &JwtConfig,
    ) -> Self {
        Self {
            codec,
            store,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: cfg.access_ttl,
            refresh_ttl: cfg.refresh_ttl,
        }
    }

    pub fn generate_access_token(
        &self,
        principal: &Principal,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError> {
        let (token, exp) = self.mint(principal, TokenType::Access, self.access_ttl)?;
        Ok((AccessToken(token), exp))
    }

    pub fn generate_refresh_token(
        &self,
        principal: &Principal,
    ) -> Result<(RefreshToken, DateTime<Utc>), AuthError> {
        let (token, exp) = self.mint(principal, TokenType::Refresh, self.refresh_ttl)?;
        Ok((RefreshToken(token), exp))
    }

    /// Both tokens are handed out only once the refresh record is stored.
    pub async fn generate_token_pair(
        &self,
        principal: &Principal,
    ) -> Result<AuthTokens, AuthError> {
        let (access_token, access_exp) = self.generate_access_token(principal)?;
        let (refresh_token, refresh_exp) = self.generate_refresh_token(principal)?;

        self.store
            .put(
                &keys::refresh_token(principal.id),
                refresh_token.as_str(),
                self.refresh_ttl,
            )
            .await
            .map_err(|e| {
                warn!(
                    principal_id = %principal.id,
                    error = %e,
                    "failed to persist refresh record"
                );
                AuthError::Issuance(e)
            })?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            access_token_expires_at: access_exp,
            refresh_token_expires_at: refresh_exp,
        })
    }

    fn mint(
        &self,
        principal: &Principal,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::Encoding(format!("token lifetime out of range: {e}")))?;
        let claims = Claims::new(
            principal,
            token_type,
            &self.issuer,
            &self.audience,
            Utc::now(),
            ttl,
        );
        let token = self.codec.encode(&claims)?;
        let exp = claims
            .expires_at_utc()
            .ok_or_else(|| AuthError::Encoding("expiry out of range".to_string()))?;
        debug!(
            principal_id = %principal.id,
            jti = %claims.token_id,
            %token_type,
            "token minted"
        );
        Ok((token, exp))
    }
}
