//! entgql
//!
//! Generates GraphQL schema definitions from an ent graph for gqlgen:
//! - Object types implementing the Relay `Node` interface
//! - Enums collected from enum fields
//! - `<Type>Connection`/`<Type>Edge` wrappers and `<Type>Order` inputs
//! - Model bindings in the gqlgen config
//!
//! ```no_run
//! use entgql::{Generator, load_graph};
//!
//! let graph = load_graph(std::path::Path::new("ent/schema"))?;
//! let source = Generator::new(&graph).generate()?;
//! println!("{}", source.input);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod annotation;
pub mod ast;
pub mod config;
mod enums;
mod error;
pub mod field;
mod formatter;
pub mod graph;
mod load;
mod order;
pub mod plugin;
mod relay;

pub use annotation::{ANNOTATION_NAME, Annotation};
pub use ast::{Definition, Schema, TypeRef};
pub use config::{GqlgenConfig, load_config_from_default_locations, mutate_config};
pub use enums::collect_enums;
pub use error::{GeneratorError, LoadError};
pub use formatter::format_schema;
pub use graph::{Field, FieldKind, Graph, Type};
pub use load::load_graph;
pub use order::{ORDER_DIRECTION, order_by, order_direction};
pub use plugin::{Generator, GeneratorConfig, SchemaHook, Source, generate};
pub use relay::{RELAY_CURSOR, RELAY_NODE, RELAY_PAGE_INFO, relay_builtins, relay_connection};
