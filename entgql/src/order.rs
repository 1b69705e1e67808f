//! Ordering inputs
//!
//! Types with order-annotated fields get a `<Type>OrderField` enum and a
//! `<Type>Order` input; all of them share one `OrderDirection` enum.

use std::collections::HashSet;

use crate::ast::{Definition, FieldDefinition, TypeRef};
use crate::graph::Type;

/// Name of the shared direction enum
pub const ORDER_DIRECTION: &str = "OrderDirection";

/// `enum OrderDirection { ASC DESC }`
pub fn order_direction() -> Definition {
    Definition::enumeration(ORDER_DIRECTION, ["ASC", "DESC"])
}

/// `<Type>OrderField`
pub fn order_field_name(type_name: &str) -> String {
    format!("{type_name}OrderField")
}

/// `<Type>Order`
pub fn order_name(type_name: &str) -> String {
    format!("{type_name}Order")
}

/// Order definitions for a type, empty when no field is orderable
///
/// Order-field names are used verbatim; duplicates are kept as is.
pub fn order_by(node: &Type) -> Vec<Definition> {
    if !node.has_order_by() {
        return Vec::new();
    }

    let values: Vec<&str> = node.order_fields().collect();
    let mut seen = HashSet::new();
    for value in &values {
        if !seen.insert(*value) {
            tracing::warn!(
                type_name = %node.name,
                value = %value,
                "duplicate order field value"
            );
        }
    }

    let field_enum = order_field_name(&node.name);
    vec![
        Definition::enumeration(field_enum.clone(), values),
        Definition::input(
            order_name(&node.name),
            vec![
                FieldDefinition::new("direction", TypeRef::named(ORDER_DIRECTION, false)),
                FieldDefinition::new("field", TypeRef::named(field_enum, false)),
            ],
        ),
    ]
}
