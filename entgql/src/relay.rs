//! Relay pagination types
//!
//! Generates:
//! - `Cursor` scalar, `Node` interface and `PageInfo` type (once per schema)
//! - `<Type>Connection` and `<Type>Edge` for relay-annotated types

use crate::ast::{Definition, FieldDefinition, TypeRef};
use crate::graph::Type;

/// Relay cursor scalar
pub const RELAY_CURSOR: &str = "Cursor";
/// Relay node interface
pub const RELAY_NODE: &str = "Node";
/// Relay page info object
pub const RELAY_PAGE_INFO: &str = "PageInfo";

/// `<Type>Connection`
pub fn connection_name(type_name: &str) -> String {
    format!("{type_name}Connection")
}

/// `<Type>Edge`
pub fn edge_name(type_name: &str) -> String {
    format!("{type_name}Edge")
}

/// Whether a type gets Connection/Edge wrappers
pub fn create_relay_connection(node: &Type) -> bool {
    node.relay_connection()
}

/// Interfaces an object implements: `Node` first, then declared ones
pub fn interfaces(node: &Type) -> Vec<String> {
    let mut interfaces = vec![RELAY_NODE.to_string()];
    interfaces.extend(node.implements().iter().cloned());
    interfaces
}

/// The cursor scalar, node interface and page info type
pub fn relay_builtins() -> Vec<Definition> {
    vec![
        Definition::scalar(RELAY_CURSOR),
        Definition::interface(
            RELAY_NODE,
            vec![FieldDefinition::new("id", TypeRef::named("ID", false))],
        ),
        Definition::object(
            RELAY_PAGE_INFO,
            vec![
                FieldDefinition::new("hasNextPage", TypeRef::named("Boolean", false)),
                FieldDefinition::new("hasPreviousPage", TypeRef::named("Boolean", false)),
                FieldDefinition::new("startCursor", TypeRef::named(RELAY_CURSOR, true)),
                FieldDefinition::new("endCursor", TypeRef::named(RELAY_CURSOR, true)),
            ],
        ),
    ]
}

/// Connection and edge types wrapping `node`
pub fn relay_connection(node: &Type) -> Vec<Definition> {
    let edge = edge_name(&node.name);
    vec![
        Definition::object(
            connection_name(&node.name),
            vec![
                FieldDefinition::new("edges", TypeRef::list(TypeRef::named(edge.clone(), true))),
                FieldDefinition::new("pageInfo", TypeRef::named(RELAY_PAGE_INFO, false)),
                FieldDefinition::new("totalCount", TypeRef::named("Int", false)),
            ],
        ),
        Definition::object(
            edge,
            vec![
                FieldDefinition::new("node", TypeRef::named(node.name.clone(), true)),
                FieldDefinition::new("cursor", TypeRef::named(RELAY_CURSOR, true)),
            ],
        ),
    ]
}
