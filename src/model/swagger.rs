// ==============================================================================
// Swagger 2.0 Document Model
// ==============================================================================
//
// Only the subset of Swagger 2.0 the translator emits is modelled. Keyed
// collections are `BTreeMap`s so serialization is deterministic: two runs over
// the same input produce byte-identical JSON. Struct field order is the JSON
// key order.

use std::collections::BTreeMap;

use serde::Serialize;

/// Schema reference prefix for entries of [`Document::definitions`].
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// A complete Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub schemes: Vec<String>,
    pub swagger: String,
    pub info: Info,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    pub paths: BTreeMap<String, PathItem>,
    pub definitions: BTreeMap<String, Schema>,
    #[serde(rename = "securityDefinitions")]
    pub security_definitions: BTreeMap<String, SecurityScheme>,
    pub security: Vec<BTreeMap<String, Vec<String>>>,
    pub tags: Vec<Tag>,
}

impl Document {
    /// Render as two-space indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render as a `serde_json::Value`, mostly useful for assertions.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub title: String,
    pub version: String,
    #[serde(rename = "x-logo")]
    pub logo: Logo,
}

/// The `x-logo` vendor extension understood by ReDoc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub background_color: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alt_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityScheme {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub flow: String,
    #[serde(rename = "tokenUrl")]
    pub token_url: String,
    pub scopes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub name: String,
}

/// A path entry. Twirp only speaks POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathItem {
    pub post: Operation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(rename = "operationId")]
    pub operation_id: String,
    pub parameters: Vec<Parameter>,
    pub responses: BTreeMap<String, Response>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub description: String,
    pub schema: Schema,
}

/// Example value attached to a schema, parsed from a doc comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Example {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// A JSON schema object, as far as Swagger 2.0 definitions and properties
/// need it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Example>,
    #[serde(rename = "x-order", skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
}

impl Schema {
    /// A `$ref` schema pointing at `#/definitions/<qualified_name>`.
    pub fn reference(qualified_name: &str) -> Self {
        Schema {
            reference: Some(format!("{DEFINITIONS_PREFIX}{qualified_name}")),
            ..Schema::default()
        }
    }

    /// A bare `{"type": kind}` schema.
    pub fn of_type(kind: &str) -> Self {
        Schema {
            kind: Some(kind.to_string()),
            ..Schema::default()
        }
    }
}
