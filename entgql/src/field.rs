//! Field type mapping
//!
//! Maps ent field kinds to GraphQL type references and builds the field
//! list of each generated object.

use crate::ast::{FieldDefinition, TypeRef};
use crate::error::GeneratorError;
use crate::graph::{Field, FieldKind, Type};
use crate::plugin::GeneratorConfig;

/// Map a field to its GraphQL type
///
/// Rules, first match wins: `GqlType` override, scalar-mapping table,
/// identifier (`ID!`, never nullable), enum name, primitive kind.
pub fn field_type(
    config: &GeneratorConfig,
    field: &Field,
    id_field: bool,
) -> Result<TypeRef, GeneratorError> {
    // TODO: map list-valued fields once the graph carries them
    if let Some(ty) = user_defined_type(field) {
        return Ok(ty);
    }
    let nullable = field.nillable;
    let kind = field.kind;

    if let Some(scalar) = config.scalar_mappings.get(kind.name()) {
        return Ok(TypeRef::named(scalar, nullable));
    }
    if id_field {
        return Ok(TypeRef::named("ID", false));
    }
    if field.is_enum() {
        return Ok(TypeRef::named(enum_name(field), nullable));
    }

    match kind {
        k if k.is_float() => Ok(TypeRef::named("Float", nullable)),
        k if k.is_integer() => Ok(TypeRef::named("Int", nullable)),
        FieldKind::String => Ok(TypeRef::named("String", nullable)),
        FieldKind::Bool => Ok(TypeRef::named("Boolean", nullable)),
        FieldKind::Bytes | FieldKind::Json => Err(GeneratorError::UnsupportedTypeKind { kind }),
        FieldKind::Other => Err(GeneratorError::UntypedOtherKind),
        kind => Err(GeneratorError::UnexpectedTypeKind { kind }),
    }
}

/// The `GqlType` override, honoring the field's nullability
pub fn user_defined_type(field: &Field) -> Option<TypeRef> {
    field
        .gql_type()
        .map(|name| TypeRef::named(name, field.nillable))
}

/// GraphQL enum name of an enum field: the override, else the field name
/// with its first letter capitalized (`user_role` -> `User_role`)
pub fn enum_name(field: &Field) -> String {
    match field.gql_type() {
        Some(name) => name.to_string(),
        None => title(&field.name),
    }
}

fn title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether the field appears in its object
pub fn include_field(field: &Field) -> bool {
    !field.is_skipped()
}

/// Object fields of a type: identifier first, then declared fields
pub fn type_fields(
    config: &GeneratorConfig,
    node: &Type,
) -> Result<Vec<FieldDefinition>, GeneratorError> {
    let mut fields = Vec::new();

    if let Some(id) = node.id.as_ref().filter(|f| include_field(f)) {
        let ty = field_type(config, id, true).map_err(|e| e.in_field(&node.name, &id.name))?;
        fields.push(FieldDefinition::new((config.field_name)(&id.name), ty));
    }

    for field in node.fields.iter().filter(|f| include_field(f)) {
        let ty = field_type(config, field, false)
            .map_err(|e| e.in_field(&node.name, &field.name))?;
        fields.push(FieldDefinition::new((config.field_name)(&field.name), ty));
    }

    Ok(fields)
}
