// src/lib.rs
pub use authorizer::{AuthorizationDecision, Authorizer, PRINCIPAL_ID};
pub use builder::PolicyBuilder;
pub use config::{AuthorizerConfig, LogLevel};
pub use error::AuthorizerError;
pub use types::{
    AUTHORIZATION_HEADER, AuthorizerRequest, Conditions, ContextValue, Credential, Effect,
    HttpVerb, INVOKE_ACTION, MethodGrant, POLICY_VERSION, PolicyBody, PolicyDocument,
    ResourceReference, Statement,
};

mod authorizer;
mod builder;
pub mod config;
mod error;
mod types;

#[cfg(test)]
mod tests;
