//! Core data types for the scraped schema graph.
//!
//! Everything here is plain data: the scraper produces it, the classifier
//! fills in [`TypeDescriptor`]s, and the emitter consumes it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Leaf value kinds. `Integer` and `Number` in source text both become `Number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    Json,
}

impl ScalarKind {
    /// TypeScript spelling of the literal form of this kind.
    pub fn to_ts_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Json => "any",
        }
    }
}

/// The closed set of shapes a property type can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    List(Box<TypeDescriptor>),
    /// String-keyed mapping; only the value type is known.
    Record(Box<TypeDescriptor>),
    /// Named pointer to a nested [`MapSchema`] resolved in the same session.
    Ref(String),
    Map(MapSchema),
}

impl TypeDescriptor {
    pub fn list(inner: TypeDescriptor) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn record(inner: TypeDescriptor) -> Self {
        Self::Record(Box::new(inner))
    }

    /// Short tag name, used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Ref(_) => "ref",
            Self::Map(_) => "map",
        }
    }

    /// The nested type name this descriptor points at, looking through
    /// `List` and `Record` wrappers.
    pub fn referenced_name(&self) -> Option<&str> {
        match self {
            Self::Ref(name) => Some(name),
            Self::List(inner) | Self::Record(inner) => inner.referenced_name(),
            Self::Scalar(_) | Self::Map(_) => None,
        }
    }
}

/// A single field of a schema, in documentation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Field name as written in the documentation.
    pub key: String,
    /// Markdown prose, ending with an `@see` line pointing at `link`.
    pub description: String,
    /// Page URL plus the property's in-page anchor.
    pub link: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

/// A structured type mirroring one documentation page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSchema {
    pub name: String,
    /// Markdown prose, ending with an `@see` line pointing at `link`.
    pub description: String,
    pub link: String,
    pub properties: Vec<Property>,
}

/// Output of one scrape session: the entry page plus every nested type it
/// pulled in, in first-discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub schema: MapSchema,
    pub types: Vec<MapSchema>,
}

impl Resource {
    /// Look up a nested type by name.
    pub fn nested(&self, name: &str) -> Option<&MapSchema> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Names referenced by some property whose schema never made it into
    /// `types` (and is not the root itself).
    pub fn dangling_refs(&self) -> Vec<String> {
        let known: HashSet<&str> = self
            .types
            .iter()
            .map(|t| t.name.as_str())
            .chain(std::iter::once(self.schema.name.as_str()))
            .collect();

        let mut seen = HashSet::new();
        let mut dangling = Vec::new();
        for schema in self.types.iter().chain(std::iter::once(&self.schema)) {
            for prop in &schema.properties {
                if let Some(name) = prop.ty.referenced_name() {
                    if !known.contains(name) && seen.insert(name.to_string()) {
                        dangling.push(name.to_string());
                    }
                }
            }
        }
        dangling
    }
}
