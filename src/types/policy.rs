//! Method grants and the policy document returned to the gateway.
//!
//! The serialized shape is consumed by the gateway's policy evaluator and
//! must stay exactly:
//!
//! ```json
//! {
//!   "principalId": "*",
//!   "policyDocument": {
//!     "Version": "2012-10-17",
//!     "Statement": [
//!       { "Action": "execute-api:Invoke", "Effect": "Allow", "Resource": ["arn:..."] }
//!     ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use utoipa::ToSchema;

use super::effect::Effect;
use super::http_verb::HttpVerb;
use crate::error::AuthorizerError;

/// Policy language version understood by the gateway.
pub const POLICY_VERSION: &str = "2012-10-17";

/// The only action an execute-api policy grants.
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// An IAM condition block, e.g. `{"IpAddress": {"aws:SourceIp": ["10.0.0.0/8"]}}`.
pub type Conditions = Map<String, Value>;

/// One allow or deny rule for a verb on a synthesized method ARN.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MethodGrant {
    pub effect: Effect,
    pub verb: HttpVerb,
    pub resource_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub conditions: Option<Conditions>,
}

impl MethodGrant {
    /// Empty conditions are treated the same as no conditions.
    pub fn is_conditional(&self) -> bool {
        self.conditions.as_ref().is_some_and(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Statement {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Resource")]
    pub resources: Vec<String>,
    #[serde(
        rename = "Condition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<Object>)]
    pub condition: Option<Conditions>,
}

impl Statement {
    pub(crate) fn new(effect: Effect) -> Self {
        Self {
            action: INVOKE_ACTION.to_string(),
            effect,
            resources: Vec::new(),
            condition: None,
        }
    }

    pub(crate) fn conditional(grant: &MethodGrant) -> Self {
        Self {
            resources: vec![grant.resource_arn.clone()],
            condition: grant.conditions.clone(),
            ..Self::new(grant.effect)
        }
    }
}

/// The versioned statement list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PolicyBody {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statements: Vec<Statement>,
}

/// A response context value. The gateway only accepts strings, numbers
/// and booleans here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ContextValue {
    String(String),
    Number(Number),
    Bool(bool),
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::String(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::String(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

macro_rules! context_value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for ContextValue {
            fn from(value: $t) -> Self {
                ContextValue::Number(Number::from(value))
            }
        })*
    };
}

context_value_from_int!(i32, i64, u32, u64);

impl TryFrom<Value> for ContextValue {
    type Error = AuthorizerError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(ContextValue::String(s)),
            Value::Number(n) => Ok(ContextValue::Number(n)),
            Value::Bool(b) => Ok(ContextValue::Bool(b)),
            other => Err(AuthorizerError::InvalidContext(format!(
                "'{other}' (expected a string, number or boolean)"
            ))),
        }
    }
}

impl From<ContextValue> for Value {
    fn from(value: ContextValue) -> Self {
        match value {
            ContextValue::String(s) => Value::String(s),
            ContextValue::Number(n) => Value::Number(n),
            ContextValue::Bool(b) => Value::Bool(b),
        }
    }
}

/// The authorizer response: principal, policy and optional context.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PolicyDocument {
    #[serde(rename = "principalId")]
    pub principal_id: String,
    #[serde(rename = "policyDocument")]
    pub policy: PolicyBody,
    /// Surfaced by the gateway as `$context.authorizer.<key>`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub context: BTreeMap<String, ContextValue>,
}

impl PolicyDocument {
    pub fn statements(&self) -> &[Statement] {
        &self.policy.statements
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
