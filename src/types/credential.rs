//! HTTP Basic-Authentication credentials.
//!
//! Accepted header forms:
//! - `Basic <base64(username:password)>` (scheme keyword is case-insensitive)
//! - `<base64(username:password)>`
//!
//! Both halves are percent-decoded after the base64 step, so `%40` in the
//! encoded pair yields a literal `@`.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::percent_decode;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::AuthorizerError;

const BASIC_SCHEME: &str = "basic";

/// A decoded username/password pair. Never partially populated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    password: String,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Decode the raw value of an `Authorization` header.
    ///
    /// The value is UTF-8 decoded, trimmed and split on single spaces. One
    /// token is taken as the bare base64 pair; two tokens require the first
    /// to be `basic` (any case). Every other shape is a
    /// [`AuthorizerError::Decode`].
    pub fn decode(raw: &[u8]) -> Result<Self, AuthorizerError> {
        let header = std::str::from_utf8(raw)?;
        let components: Vec<&str> = header.trim().split(' ').collect();

        let encoded = match components.as_slice() {
            [encoded] => *encoded,
            [scheme, encoded] => {
                if !scheme.trim().eq_ignore_ascii_case(BASIC_SCHEME) {
                    return Err(AuthorizerError::Decode(
                        "unsupported authorization scheme".to_string(),
                    ));
                }
                encoded.trim()
            }
            other => {
                return Err(AuthorizerError::Decode(format!(
                    "expected 1 or 2 space-separated components, found {}",
                    other.len()
                )));
            }
        };

        debug!(
            event = "Credential",
            phase = "Decode",
            components = components.len()
        );

        let pair = STANDARD.decode(encoded)?;
        let Some(split_at) = pair.iter().position(|b| *b == b':') else {
            return Err(AuthorizerError::Decode(
                "missing ':' between username and password".to_string(),
            ));
        };

        let username = unquote(&pair[..split_at])?;
        let password = unquote(&pair[split_at + 1..])?;
        Ok(Credential { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Compare against the expected credential without short-circuiting on
    /// the first differing byte.
    pub fn matches(&self, expected: &Credential) -> bool {
        let username = self.username.as_bytes().ct_eq(expected.username.as_bytes());
        let password = self.password.as_bytes().ct_eq(expected.password.as_bytes());
        (username & password).into()
    }
}

fn unquote(bytes: &[u8]) -> Result<String, AuthorizerError> {
    Ok(percent_decode(bytes).decode_utf8()?.into_owned())
}
