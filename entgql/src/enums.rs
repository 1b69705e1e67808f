//! Enum collection
//!
//! Groups enum fields across all types by their GraphQL enum name. Fields
//! sharing a name must agree on the value set (in any order); the first
//! field seen fixes the value order.

use std::collections::{BTreeMap, HashSet};

use crate::ast::Definition;
use crate::error::GeneratorError;
use crate::field::enum_name;
use crate::graph::Type;

/// Collect one enum definition per distinct enum name
pub fn collect_enums(types: &[Type]) -> Result<Vec<Definition>, GeneratorError> {
    let mut enums: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for node in types {
        for field in node.fields.iter().filter(|f| f.is_enum()) {
            let name = enum_name(field);
            match enums.get(&name) {
                Some(values) => {
                    if !unordered_equal(values, &field.enum_values) {
                        return Err(GeneratorError::EnumConflict {
                            name,
                            existing: values.clone(),
                            conflicting: field.enum_values.clone(),
                        });
                    }
                }
                None => {
                    enums.insert(name, field.enum_values.clone());
                }
            }
        }
    }

    Ok(enums
        .into_iter()
        .map(|(name, values)| Definition::enumeration(name, values))
        .collect())
}

/// Set equality of two value lists, ignoring order
fn unordered_equal(first: &[String], second: &[String]) -> bool {
    if first.len() != second.len() {
        return false;
    }
    let first: HashSet<&str> = first.iter().map(String::as_str).collect();
    let second: HashSet<&str> = second.iter().map(String::as_str).collect();
    first == second
}
