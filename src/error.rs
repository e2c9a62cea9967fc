use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthorizerError {
    #[error("failed to decode authorization header: {0}")]
    Decode(String),

    #[error("malformed resource reference: {0}")]
    MalformedReference(String),

    #[error("invalid HTTP verb: {0}")]
    InvalidVerb(String),

    #[error("invalid resource path: {0}")]
    InvalidPath(String),

    #[error("invalid effect: {0}")]
    InvalidEffect(String),

    #[error("invalid context value: {0}")]
    InvalidContext(String),

    #[error("no statements defined for the policy")]
    EmptyPolicy,

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<base64::DecodeError> for AuthorizerError {
    fn from(err: base64::DecodeError) -> Self {
        AuthorizerError::Decode(err.to_string())
    }
}

impl From<std::str::Utf8Error> for AuthorizerError {
    fn from(err: std::str::Utf8Error) -> Self {
        AuthorizerError::Decode(err.to_string())
    }
}
