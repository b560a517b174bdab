use crate::domain_model::{Principal, PrincipalId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => f.write_str("access"),
            TokenType::Refresh => f.write_str("refresh"),
        }
    }
}

/// Signed payload of a token.
///
/// Timestamps are unix seconds, as they appear on the wire. `expires_at` is
/// strictly after `issued_at` for every token the codec will sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub subject: PrincipalId,
    #[serde(rename = "name")]
    pub display_name: String,
    pub role: String,
    #[serde(rename = "typ")]
    pub token_type: TokenType,
    #[serde(rename = "iss")]
    pub issuer: String,
    #[serde(rename = "aud")]
    pub audience: String,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "nbf")]
    pub not_before: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(rename = "jti")]
    pub token_id: String,
}

impl Claims {
    /// Claims for `principal` valid from `issued_at` for `ttl`, with a fresh token id.
    pub fn new(
        principal: &Principal,
        token_type: TokenType,
        issuer: &str,
        audience: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            subject: principal.id,
            display_name: principal.display_name.clone(),
            role: principal.role.clone(),
            token_type,
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            issued_at: iat,
            not_before: iat,
            expires_at: (issued_at + ttl).timestamp(),
            token_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.subject,
            display_name: self.display_name.clone(),
            role: self.role.clone(),
        }
    }

    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }

    /// Time left until `exp` as seen from `now`; negative once expired.
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> Duration {
        let exp_ms = self.expires_at.saturating_mul(1000);
        Duration::milliseconds(exp_ms.saturating_sub(now.timestamp_millis()))
    }

    pub fn is_well_formed(&self) -> bool {
        self.expires_at > self.issued_at && self.not_before <= self.expires_at
    }
}
