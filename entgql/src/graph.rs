//! The ent graph as seen by the generator
//!
//! A read-only description of entity types and their fields, produced by
//! the ent schema loader and handed to the generator fully resolved.

use std::fmt;

use serde::Deserialize;

use crate::annotation::{self, Annotation};

/// Package root used when the graph does not name one
pub const DEFAULT_PACKAGE: &str = "crate::ent";

/// A loaded ent graph
#[derive(Debug, Clone, Deserialize)]
pub struct Graph {
    /// Package the generated ent code lives in
    #[serde(default = "default_package")]
    pub package: String,

    /// Graph-level annotation (scalar mappings)
    #[serde(default, rename = "annotations", deserialize_with = "annotation::deserialize")]
    pub annotation: Option<Annotation>,

    /// Entity types
    #[serde(default)]
    pub nodes: Vec<Type>,
}

fn default_package() -> String {
    DEFAULT_PACKAGE.to_string()
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new(DEFAULT_PACKAGE)
    }
}

impl Graph {
    /// An empty graph rooted at `package`
    pub fn new(package: impl Into<String>) -> Self {
        Graph {
            package: package.into(),
            annotation: None,
            nodes: Vec::new(),
        }
    }

    /// Add a type
    pub fn node(mut self, node: Type) -> Self {
        self.nodes.push(node);
        self
    }

    /// Apply a graph-level annotation
    pub fn annotate(mut self, ann: Annotation) -> Self {
        self.annotation = Some(merge(self.annotation.take(), ann));
        self
    }
}

/// An entity type
#[derive(Debug, Clone, Deserialize)]
pub struct Type {
    /// Type name, e.g. `Todo`
    pub name: String,

    /// Identifier field
    #[serde(default)]
    pub id: Option<Field>,

    /// Declared fields in order
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Type-level annotation
    #[serde(default, rename = "annotations", deserialize_with = "annotation::deserialize")]
    pub annotation: Option<Annotation>,
}

impl Type {
    /// A type with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Type {
            name: name.into(),
            id: None,
            fields: Vec::new(),
            annotation: None,
        }
    }

    /// Set the identifier field
    pub fn with_id(mut self, id: Field) -> Self {
        self.id = Some(id);
        self
    }

    /// Append a field
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Apply a type-level annotation
    pub fn annotate(mut self, ann: Annotation) -> Self {
        self.annotation = Some(merge(self.annotation.take(), ann));
        self
    }

    /// Whether the type is excluded from generation
    pub fn is_skipped(&self) -> bool {
        self.annotation.as_ref().is_some_and(|a| a.skip)
    }

    /// Whether the type gets Connection/Edge wrappers
    pub fn relay_connection(&self) -> bool {
        self.annotation.as_ref().is_some_and(|a| a.relay_connection)
    }

    /// Interfaces declared beyond `Node`
    pub fn implements(&self) -> &[String] {
        self.annotation
            .as_ref()
            .map(|a| a.gql_implements.as_slice())
            .unwrap_or_default()
    }

    /// Order-field names in field declaration order
    pub fn order_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(Field::order_field)
    }

    /// Whether any field carries an order-field annotation
    pub fn has_order_by(&self) -> bool {
        self.order_fields().next().is_some()
    }
}

/// A field of an entity type
#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    /// Field name as declared in the ent schema
    pub name: String,

    /// Storage kind
    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// Whether the field may be null
    #[serde(default)]
    pub nillable: bool,

    /// Values of an enum field
    #[serde(default, rename = "enums")]
    pub enum_values: Vec<String>,

    /// Field-level annotation
    #[serde(default, rename = "annotations", deserialize_with = "annotation::deserialize")]
    pub annotation: Option<Annotation>,
}

impl Field {
    /// A non-nillable field of the given kind
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Field {
            name: name.into(),
            kind,
            nillable: false,
            enum_values: Vec::new(),
            annotation: None,
        }
    }

    /// An enum field with the given values
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Field {
            enum_values: values.into_iter().map(Into::into).collect(),
            ..Field::new(name, FieldKind::Enum)
        }
    }

    /// Mark the field nillable
    pub fn nillable(mut self) -> Self {
        self.nillable = true;
        self
    }

    /// Apply a field-level annotation
    pub fn annotate(mut self, ann: Annotation) -> Self {
        self.annotation = Some(merge(self.annotation.take(), ann));
        self
    }

    /// Whether this is an enum field
    pub fn is_enum(&self) -> bool {
        self.kind == FieldKind::Enum
    }

    /// Whether the field is left out of its object
    pub fn is_skipped(&self) -> bool {
        self.annotation.as_ref().is_some_and(|a| a.skip)
    }

    /// Non-empty order-field name
    pub fn order_field(&self) -> Option<&str> {
        self.annotation
            .as_ref()
            .map(|a| a.order_field.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Non-empty GraphQL type override
    pub fn gql_type(&self) -> Option<&str> {
        self.annotation
            .as_ref()
            .map(|a| a.gql_type.as_str())
            .filter(|name| !name.is_empty())
    }
}

fn merge(existing: Option<Annotation>, ann: Annotation) -> Annotation {
    match existing {
        Some(existing) => existing.merge(&ann),
        None => ann,
    }
}

/// Field storage kinds, named as ent names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[allow(missing_docs)]
pub enum FieldKind {
    Invalid,
    Bool,
    Time,
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "UUID")]
    Uuid,
    Bytes,
    Enum,
    String,
    Other,
    Int8,
    Int16,
    Int32,
    Int,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint,
    Uint64,
    Float32,
    Float64,
}

impl FieldKind {
    /// Kind name used as the scalar-mapping key
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Invalid => "Invalid",
            FieldKind::Bool => "Bool",
            FieldKind::Time => "Time",
            FieldKind::Json => "JSON",
            FieldKind::Uuid => "UUID",
            FieldKind::Bytes => "Bytes",
            FieldKind::Enum => "Enum",
            FieldKind::String => "String",
            FieldKind::Other => "Other",
            FieldKind::Int8 => "Int8",
            FieldKind::Int16 => "Int16",
            FieldKind::Int32 => "Int32",
            FieldKind::Int => "Int",
            FieldKind::Int64 => "Int64",
            FieldKind::Uint8 => "Uint8",
            FieldKind::Uint16 => "Uint16",
            FieldKind::Uint32 => "Uint32",
            FieldKind::Uint => "Uint",
            FieldKind::Uint64 => "Uint64",
            FieldKind::Float32 => "Float32",
            FieldKind::Float64 => "Float64",
        }
    }

    /// Signed or unsigned integer
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldKind::Int8
                | FieldKind::Int16
                | FieldKind::Int32
                | FieldKind::Int
                | FieldKind::Int64
                | FieldKind::Uint8
                | FieldKind::Uint16
                | FieldKind::Uint32
                | FieldKind::Uint
                | FieldKind::Uint64
        )
    }

    /// Floating point
    pub fn is_float(&self) -> bool {
        matches!(self, FieldKind::Float32 | FieldKind::Float64)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_type() {
        let node: Type = serde_json::from_value(json!({
            "name": "Todo",
            "id": {"name": "id", "type": "Int"},
            "fields": [
                {"name": "text", "type": "String", "annotations": {"EntGQL": {"OrderField": "TEXT"}}},
                {"name": "status", "type": "Enum", "enums": ["IN_PROGRESS", "COMPLETED"]},
                {"name": "blob", "type": "JSON", "nillable": true},
            ],
            "annotations": {"EntGQL": {"RelayConnection": true}, "Other": {"x": 1}},
        }))
        .unwrap();

        assert_eq!(node.name, "Todo");
        assert_eq!(node.id.as_ref().map(|f| f.kind), Some(FieldKind::Int));
        assert_eq!(node.fields[0].order_field(), Some("TEXT"));
        assert_eq!(node.fields[1].enum_values, vec!["IN_PROGRESS", "COMPLETED"]);
        assert!(node.fields[2].nillable);
        assert_eq!(node.fields[2].kind, FieldKind::Json);
        assert!(node.relay_connection());
        assert!(!node.is_skipped());
        assert!(node.has_order_by());
    }

    #[test]
    fn test_deserialize_rejects_bad_annotation() {
        let result: Result<Field, _> = serde_json::from_value(json!({
            "name": "text",
            "type": "String",
            "annotations": {"EntGQL": {"OrderField": 3}},
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_graph_defaults() {
        let graph: Graph = serde_json::from_value(json!({})).unwrap();
        assert_eq!(graph.package, DEFAULT_PACKAGE);
        assert!(graph.annotation.is_none());
        assert!(graph.nodes.is_empty());
    }

    #[test]
    fn test_order_fields_in_declaration_order() {
        let node = Type::new("User")
            .field(Field::new("name", FieldKind::String).annotate(Annotation::order_field("NAME")))
            .field(Field::new("age", FieldKind::Int))
            .field(Field::new("created_at", FieldKind::Time).annotate(Annotation::order_field("CREATED_AT")));

        assert_eq!(node.order_fields().collect::<Vec<_>>(), vec!["NAME", "CREATED_AT"]);
        assert!(!Type::new("Empty").has_order_by());
    }

    #[test]
    fn test_empty_annotation_values_are_no_opinion() {
        let field = Field::new("text", FieldKind::String)
            .annotate(Annotation::gql_type(""))
            .annotate(Annotation::order_field(""));
        assert_eq!(field.gql_type(), None);
        assert_eq!(field.order_field(), None);
    }

    #[test]
    fn test_kind_classes() {
        assert!(FieldKind::Uint16.is_integer());
        assert!(!FieldKind::Float32.is_integer());
        assert!(FieldKind::Float64.is_float());
        assert_eq!(FieldKind::Json.to_string(), "JSON");
    }
}
