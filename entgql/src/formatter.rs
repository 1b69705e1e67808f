//! Deterministic SDL printer
//!
//! Definitions print in name order, members tab-indented, with no blank
//! lines in between. Printing the same schema twice yields identical text.

use crate::ast::{Definition, DefinitionKind, Directive, Schema};

/// Render a schema as SDL text; an empty schema renders as ""
pub fn format_schema(schema: &Schema) -> String {
    let mut out = String::new();
    for def in schema.definitions() {
        format_definition(&mut out, def);
    }
    out
}

fn format_definition(out: &mut String, def: &Definition) {
    out.push_str(def.kind.keyword());
    out.push(' ');
    out.push_str(&def.name);

    if !def.interfaces.is_empty()
        && matches!(def.kind, DefinitionKind::Object | DefinitionKind::Interface)
    {
        out.push_str(" implements ");
        out.push_str(&def.interfaces.join(" & "));
    }
    push_directives(out, &def.directives);

    let members: Vec<String> = match def.kind {
        DefinitionKind::Scalar => Vec::new(),
        DefinitionKind::Enum => def
            .enum_values
            .iter()
            .map(|value| {
                let mut line = value.name.clone();
                push_directives(&mut line, &value.directives);
                line
            })
            .collect(),
        DefinitionKind::Object | DefinitionKind::Interface | DefinitionKind::InputObject => def
            .fields
            .iter()
            .map(|field| {
                let mut line = format!("{}: {}", field.name, field.ty);
                push_directives(&mut line, &field.directives);
                line
            })
            .collect(),
    };

    if members.is_empty() {
        out.push('\n');
        return;
    }

    out.push_str(" {\n");
    for member in members {
        out.push('\t');
        out.push_str(&member);
        out.push('\n');
    }
    out.push_str("}\n");
}

fn push_directives(out: &mut String, directives: &[Directive]) {
    for directive in directives {
        out.push(' ');
        out.push_str(&directive.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FieldDefinition, TypeRef};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_schema() {
        assert_eq!(format_schema(&Schema::new()), "");
    }

    #[test]
    fn test_sorted_by_name() {
        let mut schema = Schema::new();
        schema.insert(Definition::enumeration("Status", ["IN_PROGRESS", "COMPLETED"]));
        schema.insert(Definition::scalar("Cursor"));
        schema.insert(Definition::input(
            "TodoOrder",
            vec![
                FieldDefinition::new("direction", TypeRef::named("OrderDirection", false)),
                FieldDefinition::new("field", TypeRef::named("TodoOrderField", false)),
            ],
        ));

        assert_eq!(
            format_schema(&schema),
            "scalar Cursor
enum Status {
\tIN_PROGRESS
\tCOMPLETED
}
input TodoOrder {
\tdirection: OrderDirection!
\tfield: TodoOrderField!
}
"
        );
    }

    #[test]
    fn test_interfaces_and_directives() {
        let mut todo = Definition::object(
            "Todo",
            vec![FieldDefinition {
                directives: vec![Directive::new("deprecated")],
                ..FieldDefinition::new("text", TypeRef::named("String", false))
            }],
        )
        .implements(vec!["Node".to_string(), "Entity".to_string()]);
        todo.directives
            .push(Directive::new("goModel").argument("model", "\"crate::ent::Todo\""));

        let mut schema = Schema::new();
        schema.insert(todo);

        assert_eq!(
            format_schema(&schema),
            "type Todo implements Node & Entity @goModel(model: \"crate::ent::Todo\") {
\ttext: String! @deprecated
}
"
        );
    }

    #[test]
    fn test_directive_lists() {
        let mut status = Definition::enumeration("Status", ["OPEN", "CLOSED"]);
        status.enum_values[1]
            .directives
            .push(Directive::new("deprecated").argument("reason", "\"use DONE\""));
        status.directives.push(Directive::new("a"));
        status.directives.push(Directive::new("b").argument("x", "1").argument("y", "2"));

        let mut schema = Schema::new();
        schema.insert(status);

        assert_eq!(
            format_schema(&schema),
            "enum Status @a @b(x: 1, y: 2) {
\tOPEN
\tCLOSED @deprecated(reason: \"use DONE\")
}
"
        );
    }

    #[test]
    fn test_memberless_definitions_have_no_braces() {
        let mut schema = Schema::new();
        schema.insert(Definition::object("Empty", Vec::new()));
        schema.insert(Definition::enumeration("Nothing", Vec::<String>::new()));

        assert_eq!(format_schema(&schema), "type Empty\nenum Nothing\n");
    }

    #[test]
    fn test_output_parses_as_sdl() {
        let mut schema = Schema::new();
        schema.insert(Definition::scalar("Cursor"));
        schema.insert(
            Definition::object(
                "Todo",
                vec![FieldDefinition::new(
                    "edges",
                    TypeRef::list(TypeRef::named("Todo", true)),
                )],
            )
            .implements(vec!["Node".to_string()]),
        );
        schema.insert(Definition::interface(
            "Node",
            vec![FieldDefinition::new("id", TypeRef::named("ID", false))],
        ));

        let sdl = format_schema(&schema);
        assert!(async_graphql_parser::parse_schema(&sdl).is_ok());
    }
}
