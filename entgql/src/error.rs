//! Error types for schema generation
//!
//! Every failure aborts the whole generation run; there is no partial output.

use std::path::PathBuf;

use crate::graph::FieldKind;

/// Error type for schema generation
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The field kind has no GraphQL mapping yet (bytes, JSON)
    #[error("{kind} type not implemented")]
    UnsupportedTypeKind {
        /// The unsupported kind
        kind: FieldKind,
    },

    /// An `Other` field without a `GqlType` override or scalar mapping
    #[error("other type must have type defined")]
    UntypedOtherKind,

    /// A kind none of the mapping rules handle
    #[error("unexpected type: {kind}")]
    UnexpectedTypeKind {
        /// The unhandled kind
        kind: FieldKind,
    },

    /// The same enum name was derived with two different value sets
    #[error("enum {name} defined with conflicting values: {existing:?} vs {conflicting:?}")]
    EnumConflict {
        /// Enum type name
        name: String,
        /// Values recorded first
        existing: Vec<String>,
        /// Values that disagree with them
        conflicting: Vec<String>,
    },

    /// A field of a type could not be mapped
    #[error("type({type_name}): field({field}): {source}")]
    FieldMapping {
        /// Owning type
        type_name: String,
        /// Failing field
        field: String,
        /// Underlying mapping error
        #[source]
        source: Box<GeneratorError>,
    },

    /// An annotation key carried a value of the wrong shape
    #[error("invalid annotation {key}: expected {expected}")]
    InvalidAnnotation {
        /// Annotation key, e.g. `OrderField`
        key: String,
        /// Expected JSON shape
        expected: &'static str,
    },

    /// The package root used for model bindings is not a valid path
    #[error("invalid package path: {path}")]
    InvalidPackagePath {
        /// The rejected path
        path: String,
    },
}

impl GeneratorError {
    /// Attach the owning type and field to a mapping error
    pub fn in_field(self, type_name: &str, field: &str) -> Self {
        GeneratorError::FieldMapping {
            type_name: type_name.to_string(),
            field: field.to_string(),
            source: Box::new(self),
        }
    }
}

/// Error type for reading and writing graph and config files
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Filesystem failure
    #[error("{}: {source}", .path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed graph JSON
    #[error("parsing {}: {source}", .path.display())]
    Json {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Malformed or unserializable config YAML
    #[error("parsing {}: {source}", .path.display())]
    Yaml {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_yaml::Error,
    },

    /// No config file in the default locations
    #[error("unable to find a gqlgen config file in {} or any parent", .dir.display())]
    ConfigNotFound {
        /// Directory the search started from
        dir: PathBuf,
    },
}
