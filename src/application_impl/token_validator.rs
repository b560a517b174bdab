use crate::application_port::{AuthError, TokenCodec};
use crate::domain_model::{Claims, TokenType};
use crate::domain_port::{RevocationStore, keys};
use crate::logger::*;
use std::sync::Arc;

/// Acceptance pipeline: blacklist, then signature and claims, then token type.
pub struct TokenValidator {
    codec: Arc<dyn TokenCodec>,
    store: Arc<dyn RevocationStore>,
}

impl TokenValidator {
    pub fn new(codec: Arc<dyn TokenCodec>, store: Arc<dyn RevocationStore>) -> Self {
        Self { codec, store }
    }

    pub async fn validate_access(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate(token, Some(TokenType::Access)).await
    }

    pub async fn validate_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate(token, Some(TokenType::Refresh)).await
    }

    pub async fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate(token, None).await
    }

    async fn validate(
        &self,
        token: &str,
        expected: Option<TokenType>,
    ) -> Result<Claims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MalformedToken);
        }

        self.ensure_not_revoked(token).await?;

        let claims = self.codec.decode(token)?;

        match (expected, claims.token_type) {
            (None, _)
            | (Some(TokenType::Access), TokenType::Access)
            | (Some(TokenType::Refresh), TokenType::Refresh) => Ok(claims),
            (Some(expected), found) => {
                debug!(
                    principal_id = %claims.subject,
                    jti = %claims.token_id,
                    %expected,
                    %found,
                    "token type rejected"
                );
                Err(AuthError::WrongTokenType { expected, found })
            }
        }
    }

    /// A store error counts as revoked. A token is honored only once it is
    /// proven absent from the blacklist.
    async fn ensure_not_revoked(&self, token: &str) -> Result<(), AuthError> {
        match self.store.exists(&keys::blacklist(token)).await {
            Ok(false) => Ok(()),
            Ok(true) => Err(AuthError::Revoked),
            Err(e) => {
                warn!(error = %e, "revocation check failed, rejecting token");
                Err(AuthError::Revoked)
            }
        }
    }
}
