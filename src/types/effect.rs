//! Grant effects.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AuthorizerError;

/// Whether a grant allows or denies the matched method.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub enum Effect {
    Allow,
    Deny,
}

impl AsRef<str> for Effect {
    fn as_ref(&self) -> &str {
        match self {
            Self::Allow => "Allow",
            Self::Deny => "Deny",
        }
    }
}

impl Display for Effect {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_ref())
    }
}

impl FromStr for Effect {
    type Err = AuthorizerError;

    /// Case-insensitive: `allow`, `Allow` and `ALLOW` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("allow") {
            Ok(Self::Allow)
        } else if s.eq_ignore_ascii_case("deny") {
            Ok(Self::Deny)
        } else {
            Err(AuthorizerError::InvalidEffect(format!(
                "'{s}' (expected 'allow' or 'deny')"
            )))
        }
    }
}
