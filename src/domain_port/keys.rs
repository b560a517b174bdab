//! Store key builders. The layout is shared with other services reading the
//! same store, so the formats here must not change.

use crate::domain_model::PrincipalId;

pub const REFRESH_TOKEN_PREFIX: &str = "refresh_token";
pub const BLACKLIST_PREFIX: &str = "blacklist";

/// Value stored under every blacklist key.
pub const BLACKLIST_MARKER: &str = "revoked";

/// Key of the current refresh token for a principal.
pub fn refresh_token(principal_id: PrincipalId) -> String {
    format!("{REFRESH_TOKEN_PREFIX}:{principal_id}")
}

/// Key of the blacklist entry for a raw token string.
pub fn blacklist(token: &str) -> String {
    format!("{BLACKLIST_PREFIX}:{token}")
}
