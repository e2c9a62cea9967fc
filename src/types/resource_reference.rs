//! Resource references (ARNs).
//!
//! Supported shapes of the trailing resource elements:
//! - `arn:partition:service:region:account-id:resource`
//! - `arn:partition:service:region:account-id:resourcetype/resource`
//! - `arn:partition:service:region:account-id:resourcetype/resource/qualifier`
//! - `arn:partition:service:region:account-id:resourcetype/resource:qualifier`
//! - `arn:partition:service:region:account-id:resourcetype:resource`
//! - `arn:partition:service:region:account-id:resourcetype:resource:qualifier`

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::error::AuthorizerError;

const FIELD_COUNT: usize = 6;

/// A parsed resource reference. Partition and prefix are not retained.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct ResourceReference {
    service: String,
    region: String,
    account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    qualifiers: Option<Vec<String>>,
}

/// Resource elements split into their typed parts.
struct ResourceElements {
    resource_type: Option<String>,
    resource: Option<String>,
    qualifiers: Option<Vec<String>>,
}

impl ResourceElements {
    fn bare(resource: &str) -> Self {
        Self {
            resource_type: None,
            resource: Some(resource.to_string()),
            qualifiers: None,
        }
    }

    /// Split on a single delimiter kind: the first piece is the type, the
    /// second the resource, any remainder the qualifiers.
    fn split_on(elements: &str, delimiter: char) -> Self {
        let mut pieces = elements.split(delimiter).map(str::to_string);
        let resource_type = pieces.next();
        let resource = pieces.next();
        let qualifiers: Vec<String> = pieces.collect();

        Self {
            resource_type,
            resource,
            qualifiers: (!qualifiers.is_empty()).then_some(qualifiers),
        }
    }

    /// `resourcetype/resource:qualifier`
    fn split_mixed(elements: &str) -> Result<Self, AuthorizerError> {
        let (resource_type, remaining) = elements.split_once('/').ok_or_else(|| {
            AuthorizerError::MalformedReference(format!("missing '/' in '{elements}'"))
        })?;
        let (resource, qualifier) = remaining.split_once(':').ok_or_else(|| {
            AuthorizerError::MalformedReference(format!(
                "expected resourcetype/resource:qualifier, found '{elements}'"
            ))
        })?;

        Ok(Self {
            resource_type: Some(resource_type.to_string()),
            resource: Some(resource.to_string()),
            qualifiers: Some(vec![qualifier.to_string()]),
        })
    }

    fn parse(elements: &str) -> Result<Self, AuthorizerError> {
        match (elements.contains(':'), elements.contains('/')) {
            (false, false) => Ok(Self::bare(elements)),
            (true, false) => Ok(Self::split_on(elements, ':')),
            (false, true) => Ok(Self::split_on(elements, '/')),
            (true, true) => Self::split_mixed(elements),
        }
    }
}

impl FromStr for ResourceReference {
    type Err = AuthorizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.splitn(FIELD_COUNT, ':').collect();
        let [_prefix, _partition, service, region, account_id, elements] = fields.as_slice()
        else {
            return Err(AuthorizerError::MalformedReference(format!(
                "expected {FIELD_COUNT} colon-separated fields, found {} in '{s}'",
                fields.len()
            )));
        };

        let parsed = ResourceElements::parse(elements)?;
        let reference = ResourceReference {
            service: service.to_string(),
            region: region.to_string(),
            account_id: account_id.to_string(),
            resource_type: parsed.resource_type,
            resource: parsed.resource,
            qualifiers: parsed.qualifiers,
        };

        debug!(
            event = "ResourceReference",
            phase = "Parsed",
            reference = reference.to_string()
        );

        Ok(reference)
    }
}

impl Display for ResourceReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}:{}", self.service, self.region, self.account_id)?;
        if let Some(resource_type) = &self.resource_type {
            write!(f, ":{resource_type}")?;
        }
        if let Some(resource) = &self.resource {
            write!(f, ":{resource}")?;
        }
        for qualifier in self.qualifiers() {
            write!(f, ":{qualifier}")?;
        }
        Ok(())
    }
}

impl ResourceReference {
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// All qualifiers in their original order; empty when none were present.
    pub fn qualifiers(&self) -> &[String] {
        self.qualifiers.as_deref().unwrap_or_default()
    }

    pub fn has_qualifiers(&self) -> bool {
        self.qualifiers.is_some()
    }
}
