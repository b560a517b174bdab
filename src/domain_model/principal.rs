use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an authenticated principal.
///
/// Carried in the `sub` claim as a decimal string, so it serializes through `String`.
#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct PrincipalId(pub i64);

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PrincipalId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(PrincipalId)
    }
}

impl From<PrincipalId> for String {
    fn from(id: PrincipalId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for PrincipalId {
    type Error = std::num::ParseIntError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Identity handed over by the credential directory after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub display_name: String,
    pub role: String,
}

impl Principal {
    pub fn new(id: i64, display_name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: PrincipalId(id),
            display_name: display_name.into(),
            role: role.into(),
        }
    }
}
