//! Data model types for credentials, resource references and policies.
//!
//! Canonical string forms:
//! - Authorization header: `Basic <base64(username:password)>`
//! - Resource reference: `arn:partition:service:region:account-id:resource-elements`
//! - Method ARN: `arn:aws:execute-api:region:account-id:api-id/stage/VERB/path`

mod credential;
mod effect;
mod http_verb;
mod policy;
mod request;
mod resource_reference;

pub use credential::Credential;
pub use effect::Effect;
pub use http_verb::HttpVerb;
pub use policy::{
    Conditions, ContextValue, INVOKE_ACTION, MethodGrant, POLICY_VERSION, PolicyBody,
    PolicyDocument, Statement,
};
pub use request::{AUTHORIZATION_HEADER, AuthorizerRequest};
pub use resource_reference::ResourceReference;
