//! HTTP verbs accepted in method grants.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// An HTTP verb, or `*` for every verb. Parsing is case-sensitive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
pub enum HttpVerb {
    #[serde(rename = "GET")]
    #[strum(serialize = "GET")]
    Get,
    #[serde(rename = "POST")]
    #[strum(serialize = "POST")]
    Post,
    #[serde(rename = "PUT")]
    #[strum(serialize = "PUT")]
    Put,
    #[serde(rename = "PATCH")]
    #[strum(serialize = "PATCH")]
    Patch,
    #[serde(rename = "HEAD")]
    #[strum(serialize = "HEAD")]
    Head,
    #[serde(rename = "DELETE")]
    #[strum(serialize = "DELETE")]
    Delete,
    #[serde(rename = "OPTIONS")]
    #[strum(serialize = "OPTIONS")]
    Options,
    #[serde(rename = "*")]
    #[strum(serialize = "*")]
    All,
}
