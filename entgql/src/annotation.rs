//! The `EntGQL` annotation
//!
//! Annotations arrive as untyped JSON maps keyed by annotation name. The
//! `EntGQL` entry is decoded field by field into [`Annotation`]: an absent
//! or `null` key means "no opinion" and never resets a value to its zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::GeneratorError;

/// Name the annotation is registered under in annotation maps
pub const ANNOTATION_NAME: &str = "EntGQL";

/// GraphQL generation directives attached to a graph, type, field or edge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Ordering field name as exposed in the `<Type>OrderField` enum
    pub order_field: String,
    /// The GraphQL edge name equals the ent edge name
    ///
    /// Read by ent's edge resolvers; schema generation ignores it.
    pub bind: bool,
    /// GraphQL field names an edge maps to
    ///
    /// Read by ent's edge resolvers; schema generation ignores it.
    pub mapping: Vec<String>,
    /// Expose the type as a relay connection
    pub relay_connection: bool,
    /// Leave the type or field out of the generated schema
    pub skip: bool,
    /// Alternative GraphQL name, applied by gqlgen through its inline
    /// config directives. Schema generation keeps the ent name.
    pub gql_name: String,
    /// GraphQL type override
    pub gql_type: String,
    /// Interfaces implemented in addition to `Node`
    pub gql_implements: Vec<String>,
    /// Field kind name -> GraphQL scalar name
    pub gql_scalar_mappings: BTreeMap<String, String>,
}

impl Annotation {
    /// Order by this field under the given enum value name
    pub fn order_field(name: impl Into<String>) -> Self {
        Annotation {
            order_field: name.into(),
            ..Default::default()
        }
    }

    /// Bind the edge to the GraphQL field of the same name
    pub fn bind() -> Self {
        Annotation {
            bind: true,
            ..Default::default()
        }
    }

    /// Map the edge to the given GraphQL field names
    pub fn maps_to<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Annotation {
            mapping: names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Generate `<Type>Connection` and `<Type>Edge`
    pub fn relay_connection() -> Self {
        Annotation {
            relay_connection: true,
            ..Default::default()
        }
    }

    /// Exclude from generation
    pub fn skip() -> Self {
        Annotation {
            skip: true,
            ..Default::default()
        }
    }

    /// Override the GraphQL type of a field
    pub fn gql_type(name: impl Into<String>) -> Self {
        Annotation {
            gql_type: name.into(),
            ..Default::default()
        }
    }

    /// Implement extra interfaces
    pub fn implements<I, S>(interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Annotation {
            gql_implements: interfaces.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Custom scalar mappings, usually set on the graph
    pub fn scalar_mappings<I, K, V>(mappings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Annotation {
            gql_scalar_mappings: mappings
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Default::default()
        }
    }

    /// Shallow merge: non-empty values in `other` win, booleans only turn on.
    pub fn merge(mut self, other: &Annotation) -> Annotation {
        if !other.order_field.is_empty() {
            self.order_field = other.order_field.clone();
        }
        if other.bind {
            self.bind = true;
        }
        if !other.mapping.is_empty() {
            self.mapping = other.mapping.clone();
        }
        if other.relay_connection {
            self.relay_connection = true;
        }
        if other.skip {
            self.skip = true;
        }
        if !other.gql_name.is_empty() {
            self.gql_name = other.gql_name.clone();
        }
        if !other.gql_type.is_empty() {
            self.gql_type = other.gql_type.clone();
        }
        if !other.gql_implements.is_empty() {
            self.gql_implements = other.gql_implements.clone();
        }
        for (kind, scalar) in &other.gql_scalar_mappings {
            self.gql_scalar_mappings.insert(kind.clone(), scalar.clone());
        }
        self
    }

    /// Decode the `EntGQL` entry of an annotation map
    ///
    /// The entry is either one object or a list of objects applied in order.
    pub fn decode(annotations: &Map<String, Value>) -> Result<Option<Annotation>, GeneratorError> {
        match annotations.get(ANNOTATION_NAME) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => {
                let mut merged = Annotation::default();
                for item in items {
                    merged = merged.merge(&Annotation::from_value(item)?);
                }
                Ok(Some(merged))
            }
            Some(value) => Annotation::from_value(value).map(Some),
        }
    }

    fn from_value(value: &Value) -> Result<Annotation, GeneratorError> {
        let Value::Object(map) = value else {
            return Err(invalid(ANNOTATION_NAME, "object"));
        };

        let mut ann = Annotation::default();
        if let Some(v) = string(map, "OrderField")? {
            ann.order_field = v;
        }
        if let Some(v) = boolean(map, "Bind")? {
            ann.bind = v;
        }
        if let Some(v) = strings(map, "Mapping")? {
            ann.mapping = v;
        }
        if let Some(v) = boolean(map, "RelayConnection")? {
            ann.relay_connection = v;
        }
        if let Some(v) = boolean(map, "Skip")? {
            ann.skip = v;
        }
        if let Some(v) = string(map, "GqlName")? {
            ann.gql_name = v;
        }
        if let Some(v) = string(map, "GqlType")? {
            ann.gql_type = v;
        }
        if let Some(v) = strings(map, "GqlImplements")? {
            ann.gql_implements = v;
        }
        if let Some(v) = string_map(map, "GqlScalarMappings")? {
            ann.gql_scalar_mappings = v;
        }
        Ok(ann)
    }
}

/// Serde adapter for an `annotations` map, keeping only the decoded `EntGQL` entry
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Annotation>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Annotation::decode(&map).map_err(serde::de::Error::custom)
}

fn invalid(key: &str, expected: &'static str) -> GeneratorError {
    GeneratorError::InvalidAnnotation {
        key: key.to_string(),
        expected,
    }
}

fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn string(map: &Map<String, Value>, key: &str) -> Result<Option<String>, GeneratorError> {
    present(map, key)
        .map(|v| v.as_str().map(str::to_string).ok_or_else(|| invalid(key, "string")))
        .transpose()
}

fn boolean(map: &Map<String, Value>, key: &str) -> Result<Option<bool>, GeneratorError> {
    present(map, key)
        .map(|v| v.as_bool().ok_or_else(|| invalid(key, "boolean")))
        .transpose()
}

fn strings(map: &Map<String, Value>, key: &str) -> Result<Option<Vec<String>>, GeneratorError> {
    let Some(value) = present(map, key) else {
        return Ok(None);
    };
    let items = value.as_array().ok_or_else(|| invalid(key, "list of strings"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(key, "list of strings"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn string_map(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<BTreeMap<String, String>>, GeneratorError> {
    let Some(value) = present(map, key) else {
        return Ok(None);
    };
    let entries = value.as_object().ok_or_else(|| invalid(key, "map of strings"))?;
    entries
        .iter()
        .map(|(k, v)| {
            v.as_str()
                .map(|s| (k.clone(), s.to_string()))
                .ok_or_else(|| invalid(key, "map of strings"))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map(Some)
}
