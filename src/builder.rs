//! Accumulates method grants and compiles them into a [`PolicyDocument`].

use std::collections::BTreeMap;
use std::str::FromStr;

use itertools::{Either, Itertools};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::AuthorizerError;
use crate::types::{
    Conditions, ContextValue, Effect, HttpVerb, MethodGrant, POLICY_VERSION, PolicyBody,
    PolicyDocument, Statement,
};

const PATH_PATTERN: &str = r"^[/.a-zA-Z0-9\-*]+$";
const WILDCARD: &str = "*";

static PATH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(PATH_PATTERN).expect("path pattern is a valid regex"));

/// Builder for a single authorizer response.
///
/// Each decision should use its own builder; grant lists are owned by the
/// instance and start empty.
///
/// ```rust
/// use basicauth_authorizer::{HttpVerb, PolicyBuilder};
///
/// let mut builder = PolicyBuilder::new("*", "123456789012")
///     .with_api_id("abcde")
///     .with_stage("prod");
/// builder.allow_method(HttpVerb::Get, "items").unwrap();
/// let document = builder.build().unwrap();
/// assert_eq!(
///     document.statements()[0].resources,
///     ["arn:aws:execute-api:*:123456789012:abcde/prod/GET/items"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    principal_id: String,
    account_id: String,
    api_id: String,
    region: String,
    stage: String,
    allow_methods: Vec<MethodGrant>,
    deny_methods: Vec<MethodGrant>,
    context: BTreeMap<String, ContextValue>,
}

impl PolicyBuilder {
    /// Create a builder; api id, region and stage default to `*`.
    pub fn new(principal_id: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
            account_id: account_id.into(),
            api_id: WILDCARD.to_string(),
            region: WILDCARD.to_string(),
            stage: WILDCARD.to_string(),
            allow_methods: Vec::new(),
            deny_methods: Vec::new(),
            context: BTreeMap::new(),
        }
    }

    pub fn with_api_id(mut self, api_id: impl Into<String>) -> Self {
        self.api_id = api_id.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = stage.into();
        self
    }

    /// Attach a context value to the response (`$context.authorizer.<key>`).
    pub fn with_context(
        mut self,
        key: impl Into<String>,
        value: impl Into<ContextValue>,
    ) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Like [`PolicyBuilder::with_context`] for an arbitrary JSON value;
    /// arrays, objects and `null` fail with [`AuthorizerError::InvalidContext`].
    pub fn try_with_context(
        self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<Self, AuthorizerError> {
        let value = ContextValue::try_from(value)?;
        Ok(self.with_context(key, value))
    }

    pub fn allow_methods(&self) -> &[MethodGrant] {
        &self.allow_methods
    }

    pub fn deny_methods(&self) -> &[MethodGrant] {
        &self.deny_methods
    }

    /// Add a grant for `verb` on `path`.
    ///
    /// `verb` must be one of the [`HttpVerb`] literals (`GET`, ..., `*`) and
    /// `path` must consist only of `[/.a-zA-Z0-9-*]`.
    pub fn add_method(
        &mut self,
        effect: Effect,
        verb: &str,
        path: &str,
        conditions: Option<Conditions>,
    ) -> Result<(), AuthorizerError> {
        let verb = HttpVerb::from_str(verb).map_err(|_| {
            AuthorizerError::InvalidVerb(format!(
                "'{verb}' (expected one of GET, POST, PUT, PATCH, HEAD, DELETE, OPTIONS, *)"
            ))
        })?;
        self.push_grant(effect, verb, path, conditions)
    }

    /// Like [`PolicyBuilder::add_method`], with the effect given as text.
    pub fn add_method_str(
        &mut self,
        effect: &str,
        verb: &str,
        path: &str,
        conditions: Option<Conditions>,
    ) -> Result<(), AuthorizerError> {
        let effect = Effect::from_str(effect)?;
        self.add_method(effect, verb, path, conditions)
    }

    pub fn allow_method(&mut self, verb: HttpVerb, path: &str) -> Result<(), AuthorizerError> {
        self.push_grant(Effect::Allow, verb, path, None)
    }

    pub fn deny_method(&mut self, verb: HttpVerb, path: &str) -> Result<(), AuthorizerError> {
        self.push_grant(Effect::Deny, verb, path, None)
    }

    pub fn allow_method_with_conditions(
        &mut self,
        verb: HttpVerb,
        path: &str,
        conditions: Conditions,
    ) -> Result<(), AuthorizerError> {
        self.push_grant(Effect::Allow, verb, path, Some(conditions))
    }

    pub fn deny_method_with_conditions(
        &mut self,
        verb: HttpVerb,
        path: &str,
        conditions: Conditions,
    ) -> Result<(), AuthorizerError> {
        self.push_grant(Effect::Deny, verb, path, Some(conditions))
    }

    /// Allow every verb on every path of the API.
    pub fn allow_all(&mut self) -> Result<(), AuthorizerError> {
        self.add_method(Effect::Allow, WILDCARD, WILDCARD, None)
    }

    /// Deny every verb on every path of the API.
    pub fn deny_all(&mut self) -> Result<(), AuthorizerError> {
        self.add_method(Effect::Deny, WILDCARD, WILDCARD, None)
    }

    fn push_grant(
        &mut self,
        effect: Effect,
        verb: HttpVerb,
        path: &str,
        conditions: Option<Conditions>,
    ) -> Result<(), AuthorizerError> {
        if !PATH_REGEX.is_match(path) {
            return Err(AuthorizerError::InvalidPath(format!(
                "'{path}' (path should match {PATH_PATTERN})"
            )));
        }

        // A trailing '/' drops the leading character, not the trailing one.
        let path = if path.ends_with('/') { &path[1..] } else { path };

        let resource_arn = format!(
            "arn:aws:execute-api:{}:{}:{}/{}/{}/{}",
            self.region, self.account_id, self.api_id, self.stage, verb, path
        );

        info!(
            event = "Grant",
            phase = "Added",
            effect = effect.to_string(),
            resource_arn = resource_arn
        );

        let grant = MethodGrant {
            effect,
            verb,
            resource_arn,
            conditions,
        };
        match effect {
            Effect::Allow => self.allow_methods.push(grant),
            Effect::Deny => self.deny_methods.push(grant),
        }
        Ok(())
    }

    /// Conditioned grants each get a statement of their own; the remaining
    /// grants of the effect are merged into one trailing statement.
    fn statements_for_effect(effect: Effect, grants: &[MethodGrant]) -> Vec<Statement> {
        let (mut statements, merged): (Vec<Statement>, Vec<String>) =
            grants.iter().partition_map(|grant| {
                if grant.is_conditional() {
                    Either::Left(Statement::conditional(grant))
                } else {
                    Either::Right(grant.resource_arn.clone())
                }
            });

        if !merged.is_empty() {
            let mut statement = Statement::new(effect);
            statement.resources = merged;
            statements.push(statement);
        }
        statements
    }

    /// Compile the grants into a document.
    ///
    /// Statement order: conditioned allows, merged allow, conditioned denies,
    /// merged deny. Fails with [`AuthorizerError::EmptyPolicy`] when no grant
    /// has been added.
    pub fn build(&self) -> Result<PolicyDocument, AuthorizerError> {
        if self.allow_methods.is_empty() && self.deny_methods.is_empty() {
            return Err(AuthorizerError::EmptyPolicy);
        }

        let mut statements = Self::statements_for_effect(Effect::Allow, &self.allow_methods);
        statements.extend(Self::statements_for_effect(Effect::Deny, &self.deny_methods));

        debug!(
            event = "Policy",
            phase = "Built",
            principal = self.principal_id,
            statements = statements.len()
        );

        Ok(PolicyDocument {
            principal_id: self.principal_id.clone(),
            policy: PolicyBody {
                version: POLICY_VERSION.to_string(),
                statements,
            },
            context: self.context.clone(),
        })
    }
}
