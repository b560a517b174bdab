use crate::domain_model::{Claims, Principal, PrincipalId, TokenType};
use crate::domain_port::StoreError;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("malformed token")]
    MalformedToken,
    #[error("token signature invalid")]
    SignatureInvalid,
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("token {claim} does not match")]
    ClaimMismatch { claim: &'static str },
    #[error("wrong token type: expected {expected}, found {found}")]
    WrongTokenType {
        expected: TokenType,
        found: TokenType,
    },
    #[error("token revoked")]
    Revoked,
    #[error("refresh token does not match the current session")]
    SessionMismatch,
    #[error("no active session")]
    SessionNotFound,
    #[error("token already expired")]
    AlreadyExpired,
    #[error("issuance error: {0}")]
    Issuance(#[source] StoreError),
    #[error("{0}")]
    StoreUnavailable(#[source] StoreError),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    /// True for rejections of the presented token, as opposed to server-side failures.
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken
                | AuthError::SignatureInvalid
                | AuthError::Expired
                | AuthError::NotYetValid
                | AuthError::ClaimMismatch { .. }
                | AuthError::WrongTokenType { .. }
                | AuthError::Revoked
                | AuthError::SessionMismatch
                | AuthError::SessionNotFound
        )
    }

    /// Conventional HTTP status for this error at a request boundary.
    pub fn http_status(&self) -> u16 {
        match self {
            AuthError::AlreadyExpired => 400,
            e if e.is_validation_failure() => 401,
            _ => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshToken(pub String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RefreshToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshedAccess {
    pub access_token: AccessToken,
    pub access_token_expires_at: DateTime<Utc>,
}

/// Signs claims into compact tokens and verifies them back.
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claims: &Claims) -> Result<String, AuthError>;
    /// Verifies algorithm, signature, time window, issuer and audience.
    fn decode(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Token lifecycle operations offered to the request boundary.
#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Mint an access/refresh pair and make the refresh token the principal's
    /// current session.
    async fn issue_pair(&self, principal: &Principal) -> Result<AuthTokens, AuthError>;
    async fn validate_access(&self, token: &str) -> Result<Claims, AuthError>;
    async fn validate_refresh(&self, token: &str) -> Result<Claims, AuthError>;
    /// Blacklist and signature checks only, either token type accepted.
    async fn validate_token(&self, token: &str) -> Result<Claims, AuthError>;
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedAccess, AuthError>;
    async fn revoke(&self, token: &str) -> Result<(), AuthError>;
    async fn logout(&self, access_token: &str) -> Result<(), AuthError>;
    async fn remove_from_blacklist(&self, token: &str) -> Result<(), AuthError>;
    async fn has_session(&self, principal_id: PrincipalId) -> Result<bool, AuthError>;
}
