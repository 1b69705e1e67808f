//! Graph loading
//!
//! A schema directory holds one JSON document per entity type plus an
//! optional `entc.json` with graph-level settings:
//!
//! ```json
//! {"package": "crate::ent", "annotations": {"EntGQL": {"GqlScalarMappings": {"Time": "Time"}}}}
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::annotation::{self, Annotation};
use crate::error::LoadError;
use crate::graph::{DEFAULT_PACKAGE, Graph, Type};

/// Graph settings file inside the schema directory
pub const GRAPH_CONFIG_FILE: &str = "entc.json";

#[derive(Debug, Deserialize)]
struct GraphConfig {
    #[serde(default)]
    package: Option<String>,
    #[serde(default, rename = "annotations", deserialize_with = "annotation::deserialize")]
    annotation: Option<Annotation>,
}

/// Load the graph described by a schema directory
///
/// Types are sorted by name so the result does not depend on directory
/// iteration order.
pub fn load_graph(dir: &Path) -> Result<Graph, LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .map_err(io_err)?;
    paths.sort();

    let mut graph = Graph::new(DEFAULT_PACKAGE);
    for path in paths {
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) == Some(GRAPH_CONFIG_FILE) {
            let config: GraphConfig = read_json(&path)?;
            if let Some(package) = config.package {
                graph.package = package;
            }
            graph.annotation = config.annotation;
            continue;
        }

        let node: Type = read_json(&path)?;
        tracing::debug!(type_name = %node.name, path = %path.display(), "loaded type");
        graph.nodes.push(node);
    }

    graph.nodes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(graph)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}
