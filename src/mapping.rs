use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;

/// Named table of mapping specifications, loaded once and read-only after.
pub type MappingTable = IndexMap<String, MappingSpec>;

/// Free-form configuration handed to a transformer alongside the raw value.
pub type TransformerConfig = HashMap<String, serde_json::Value>;

/// Declarative description of how to project document nodes into records.
///
/// `root` selects the node(s) this mapping applies to, relative to the
/// current context (the document root at the top level). `fields` maps
/// destination field names to their sources in declaration order. When
/// `target` names a registered record type the results are typed records;
/// otherwise they are generic ordered field maps.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingSpec {
    pub root: String,
    pub fields: IndexMap<String, FieldSource>,
    #[serde(default)]
    pub target: Option<String>,
}

/// Source of a single destination field.
///
/// Deserializes untagged: a bare string is a leaf path query, a table with
/// `root`/`fields` is a nested sub-mapping, a table with `query` is a leaf
/// descriptor that may name a transformer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldSource {
    Query(String),
    Nested(Box<MappingSpec>),
    Leaf(LeafSource),
}

/// Leaf descriptor: a path query plus an optional named transformer and its
/// configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LeafSource {
    pub query: String,
    #[serde(default)]
    pub transformer: Option<String>,
    #[serde(default)]
    pub config: TransformerConfig,
}
