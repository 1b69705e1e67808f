//! gqlgen configuration bridge
//!
//! Registers model bindings for every generated GraphQL type so gqlgen
//! resolves them to the ent package instead of generating its own models.
//! Existing entries are never replaced.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GeneratorError, LoadError};
use crate::graph::Graph;
use crate::order::{ORDER_DIRECTION, order_field_name, order_name};
use crate::relay::{RELAY_CURSOR, RELAY_NODE, RELAY_PAGE_INFO, connection_name, edge_name};

/// Config file names searched, in order, in each directory
pub const CONFIG_FILENAMES: [&str; 3] = [".gqlgen.yml", "gqlgen.yml", "gqlgen.yaml"];

/// Type the `Node` interface binds to in the ent package
pub const NODER: &str = "Noder";

/// The parts of a gqlgen config the bridge reads and writes
///
/// Keys it does not know about are kept and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GqlgenConfig {
    /// Schema sources
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub schema: Vec<String>,

    /// Packages gqlgen binds models from automatically
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub autobind: Vec<String>,

    /// GraphQL type name -> model binding
    #[serde(default, skip_serializing_if = "TypeMap::is_empty")]
    pub models: TypeMap,

    /// Everything else
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl GqlgenConfig {
    /// Read a config file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the config as YAML; comments of the loaded file are not kept
    pub fn write(&self, path: &Path) -> Result<(), LoadError> {
        let content = serde_yaml::to_string(self).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Add a schema source unless already listed
    pub fn add_schema(&mut self, source: impl Into<String>) {
        let source = source.into();
        if !self.schema.contains(&source) {
            self.schema.push(source);
        }
    }
}

/// Find the config in `dir` or the nearest ancestor holding one
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    dir.ancestors().find_map(|dir| {
        CONFIG_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

/// Load the config from the default locations, starting at `dir`
pub fn load_config_from_default_locations(dir: &Path) -> Result<(PathBuf, GqlgenConfig), LoadError> {
    let path = find_config(dir).ok_or_else(|| LoadError::ConfigNotFound {
        dir: dir.to_path_buf(),
    })?;
    tracing::debug!(path = %path.display(), "loading gqlgen config");
    let config = GqlgenConfig::load(&path)?;
    Ok((path, config))
}

/// Model bindings keyed by GraphQL type name, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeMap(IndexMap<String, TypeMapEntry>);

impl TypeMap {
    /// Whether the type has a binding entry
    pub fn exists(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Append a model path to the type's entry, creating it if needed
    pub fn add(&mut self, name: impl Into<String>, model: impl Into<String>) {
        let model = model.into();
        let entry = self.0.entry(name.into()).or_default();
        if !entry.model.contains(&model) {
            entry.model.push(model);
        }
    }

    /// Entry for a type
    pub fn get(&self, name: &str) -> Option<&TypeMapEntry> {
        self.0.get(name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Type names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// A model binding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeMapEntry {
    /// Candidate model paths; gqlgen accepts one string or a list
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub model: Vec<String>,

    /// `fields`, `extraFields` and other per-model settings
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

/// Check the package root is a plain path such as `crate::ent`
fn package_path(package: &str) -> Result<String, GeneratorError> {
    let invalid = || GeneratorError::InvalidPackagePath {
        path: package.to_string(),
    };
    let path: syn::Path = syn::parse_str(package).map_err(|_| invalid())?;
    if path.segments.iter().any(|s| !s.arguments.is_none()) {
        return Err(invalid());
    }
    Ok(package.trim().to_string())
}

/// Register bindings for the relay built-ins and every generated type
pub fn mutate_config(cfg: &mut GqlgenConfig, graph: &Graph) -> Result<(), GeneratorError> {
    let package = package_path(&graph.package)?;
    let ent_type = |name: &str| format!("{package}::{name}");

    if !cfg.autobind.contains(&package) {
        cfg.autobind.push(package.clone());
    }

    let mut bind = |name: String, model: String| {
        if !cfg.models.exists(&name) {
            tracing::debug!(%name, %model, "binding model");
            cfg.models.add(name, model);
        }
    };

    bind(RELAY_PAGE_INFO.to_string(), ent_type(RELAY_PAGE_INFO));
    bind(RELAY_NODE.to_string(), ent_type(NODER));
    bind(RELAY_CURSOR.to_string(), ent_type(RELAY_CURSOR));
    bind(ORDER_DIRECTION.to_string(), ent_type(ORDER_DIRECTION));

    for node in graph.nodes.iter().filter(|t| !t.is_skipped()) {
        bind(node.name.clone(), ent_type(&node.name));

        if node.relay_connection() {
            let connection = connection_name(&node.name);
            let edge = edge_name(&node.name);
            bind(connection.clone(), ent_type(&connection));
            bind(edge.clone(), ent_type(&edge));

            if node.has_order_by() {
                let order = order_name(&node.name);
                let order_field = order_field_name(&node.name);
                bind(order.clone(), ent_type(&order));
                bind(order_field.clone(), ent_type(&order_field));
            }
        }
    }

    Ok(())
}
