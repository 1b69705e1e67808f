//! Schema assembly
//!
//! Runs the generation steps in a fixed order over a shared [`Schema`]:
//! mapped scalars, relay built-ins, enums, then one object per type with
//! its relay and ordering definitions. Hooks run last, before printing.

use std::collections::BTreeMap;

use heck::ToLowerCamelCase;

use crate::ast::{Definition, Schema, is_builtin_scalar};
use crate::config::{GqlgenConfig, mutate_config};
use crate::enums::collect_enums;
use crate::error::GeneratorError;
use crate::field::{include_field, type_fields};
use crate::formatter::format_schema;
use crate::graph::{Graph, Type};
use crate::order::{order_by, order_direction};
use crate::relay::{create_relay_connection, interfaces, relay_builtins, relay_connection};

/// File name the generated schema is registered under
pub const SOURCE_NAME: &str = "entgql.graphql";

/// Hook to modify the schema before printing
pub type SchemaHook = Box<dyn Fn(&mut Schema)>;

/// Generation settings
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Field kind name -> GraphQL scalar name
    pub scalar_mappings: BTreeMap<String, String>,
    /// Turns an ent field name into a GraphQL field name
    pub field_name: fn(&str) -> String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            scalar_mappings: BTreeMap::from([("Time".to_string(), "Time".to_string())]),
            field_name: camel,
        }
    }
}

impl GeneratorConfig {
    /// Defaults overridden by the graph's `GqlScalarMappings`
    pub fn from_graph(graph: &Graph) -> Self {
        let mut config = GeneratorConfig::default();
        if let Some(ann) = &graph.annotation {
            for (kind, scalar) in &ann.gql_scalar_mappings {
                config.scalar_mappings.insert(kind.clone(), scalar.clone());
            }
        }
        config
    }
}

/// ent's `camel`: `created_at` -> `createdAt`, `ID` -> `id`
pub fn camel(name: &str) -> String {
    name.to_lower_camel_case()
}

/// A generated schema source, as handed to gqlgen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Source file name
    pub name: String,
    /// SDL text
    pub input: String,
    /// Always false: this is user schema, not a gqlgen builtin
    pub built_in: bool,
}

/// Builds the GraphQL schema for an ent graph
pub struct Generator<'g> {
    graph: &'g Graph,
    config: GeneratorConfig,
    hooks: Vec<SchemaHook>,
}

impl<'g> Generator<'g> {
    /// A generator configured from the graph's annotations
    pub fn new(graph: &'g Graph) -> Self {
        Self::with_config(graph, GeneratorConfig::from_graph(graph))
    }

    /// A generator with explicit settings
    pub fn with_config(graph: &'g Graph, config: GeneratorConfig) -> Self {
        Generator {
            graph,
            config,
            hooks: Vec::new(),
        }
    }

    /// Register a hook; hooks run in registration order
    pub fn hook(mut self, hook: impl Fn(&mut Schema) + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Register several hooks
    pub fn hooks(mut self, hooks: impl IntoIterator<Item = SchemaHook>) -> Self {
        self.hooks.extend(hooks);
        self
    }

    /// The active settings
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the schema definitions, hooks applied
    pub fn build_schema(&self) -> Result<Schema, GeneratorError> {
        let mut schema = Schema::new();

        self.scalars(&mut schema);
        schema.extend(relay_builtins());
        self.enums(&mut schema)?;
        self.types(&mut schema)?;

        for hook in &self.hooks {
            hook(&mut schema);
        }

        for reference in schema.dangling_references() {
            tracing::warn!(%reference, "generated schema has a dangling reference");
        }
        for missing in schema.missing_interface_fields() {
            tracing::warn!(%missing, "generated object does not satisfy its interface");
        }

        Ok(schema)
    }

    /// Build and print the schema
    pub fn generate(&self) -> Result<Source, GeneratorError> {
        let schema = self.build_schema()?;
        tracing::debug!(definitions = schema.len(), "printing schema");
        Ok(Source {
            name: SOURCE_NAME.to_string(),
            input: format_schema(&schema),
            built_in: false,
        })
    }

    fn gen_types(&self) -> impl Iterator<Item = &'g Type> {
        self.graph.nodes.iter().filter(|t| !t.is_skipped())
    }

    /// Scalars the emitted fields resolve to through the mapping table
    fn scalars(&self, schema: &mut Schema) {
        for node in self.gen_types() {
            let fields = node.id.iter().chain(&node.fields).filter(|f| include_field(f));
            for field in fields {
                if field.gql_type().is_some() {
                    continue;
                }
                if let Some(scalar) = self.config.scalar_mappings.get(field.kind.name()) {
                    if !is_builtin_scalar(scalar) && !schema.contains(scalar) {
                        tracing::debug!(%scalar, kind = %field.kind, "adding mapped scalar");
                        schema.insert(Definition::scalar(scalar.clone()));
                    }
                }
            }
        }
    }

    fn enums(&self, schema: &mut Schema) -> Result<(), GeneratorError> {
        let enums = collect_enums(&self.graph.nodes)?;
        tracing::debug!(count = enums.len(), "collected enums");
        schema.extend(enums);
        Ok(())
    }

    fn types(&self, schema: &mut Schema) -> Result<(), GeneratorError> {
        for node in self.gen_types() {
            let fields = type_fields(&self.config, node)?;
            schema.insert(Definition::object(node.name.clone(), fields).implements(interfaces(node)));

            if create_relay_connection(node) {
                schema.extend(relay_connection(node));
            }

            let order = order_by(node);
            if !order.is_empty() {
                schema.insert(order_direction());
                schema.extend(order);
            }
            tracing::debug!(type_name = %node.name, "added type");
        }
        Ok(())
    }
}

/// Register model bindings in `cfg` and generate the schema source
pub fn generate(
    cfg: &mut GqlgenConfig,
    graph: &Graph,
    hooks: Vec<SchemaHook>,
) -> Result<Source, GeneratorError> {
    mutate_config(cfg, graph)?;
    Generator::new(graph).hooks(hooks).generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;
    use crate::ast::{Directive, DefinitionKind};
    use crate::graph::{Field, FieldKind};
    use crate::relay::{RELAY_CURSOR, RELAY_NODE, RELAY_PAGE_INFO};
    use pretty_assertions::assert_eq;

    const RELAY_BUILTINS: &str = "scalar Cursor
interface Node {
\tid: ID!
}
type PageInfo {
\thasNextPage: Boolean!
\thasPreviousPage: Boolean!
\tstartCursor: Cursor
\tendCursor: Cursor
}
";

    fn todo_graph() -> Graph {
        Graph::default()
            .node(
                Type::new("Todo")
                    .with_id(Field::new("id", FieldKind::Int))
                    .field(Field::new("created_at", FieldKind::Time).annotate(Annotation::gql_type("Invalid")))
                    .field(
                        Field::enumeration("status", ["IN_PROGRESS", "COMPLETED"])
                            .annotate(Annotation::order_field("STATUS")),
                    )
                    .field(Field::new("priority", FieldKind::Int).annotate(Annotation::order_field("PRIORITY")))
                    .field(Field::new("text", FieldKind::String).annotate(Annotation::order_field("TEXT")))
                    .annotate(Annotation::relay_connection()),
            )
            .node(
                Type::new("User")
                    .with_id(Field::new("id", FieldKind::Int))
                    .field(Field::new("username", FieldKind::String))
                    .field(Field::new("age", FieldKind::Float64))
                    .field(Field::new("amount", FieldKind::Float32))
                    .field(Field::enumeration("role", ["ADMIN", "USER", "UNKNOWN"])),
            )
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_schema(&Schema::new()), "");
    }

    #[test]
    fn test_generate_empty_graph() {
        let graph = Graph::default();
        let source = Generator::new(&graph).generate().unwrap();
        assert!(!source.built_in);
        assert_eq!(source.name, SOURCE_NAME);
        assert_eq!(source.input, RELAY_BUILTINS);
    }

    #[test]
    fn test_generate_simple_type() {
        let graph = Graph::default().node(
            Type::new("User")
                .with_id(Field::new("id", FieldKind::Int))
                .field(Field::new("name", FieldKind::String)),
        );
        let source = Generator::new(&graph).generate().unwrap();
        assert_eq!(
            source.input,
            format!(
                "{RELAY_BUILTINS}type User implements Node {{
\tid: ID!
\tname: String!
}}
"
            )
        );
    }

    #[test]
    fn test_generate_todo_graph() {
        let graph = todo_graph();
        let source = Generator::new(&graph).generate().unwrap();
        assert_eq!(
            source.input,
            "scalar Cursor
interface Node {
\tid: ID!
}
enum OrderDirection {
\tASC
\tDESC
}
type PageInfo {
\thasNextPage: Boolean!
\thasPreviousPage: Boolean!
\tstartCursor: Cursor
\tendCursor: Cursor
}
enum Role {
\tADMIN
\tUSER
\tUNKNOWN
}
enum Status {
\tIN_PROGRESS
\tCOMPLETED
}
type Todo implements Node {
\tid: ID!
\tcreatedAt: Invalid!
\tstatus: Status!
\tpriority: Int!
\ttext: String!
}
type TodoConnection {
\tedges: [TodoEdge]
\tpageInfo: PageInfo!
\ttotalCount: Int!
}
type TodoEdge {
\tnode: Todo
\tcursor: Cursor
}
input TodoOrder {
\tdirection: OrderDirection!
\tfield: TodoOrderField!
}
enum TodoOrderField {
\tSTATUS
\tPRIORITY
\tTEXT
}
type User implements Node {
\tid: ID!
\tusername: String!
\tage: Float!
\tamount: Float!
\trole: Role!
}
"
        );
        assert!(async_graphql_parser::parse_schema(&source.input).is_ok());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let graph = todo_graph();
        let first = Generator::new(&graph).generate().unwrap();
        let second = Generator::new(&graph).generate().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_direction_once() {
        let graph = Graph::default()
            .node(Type::new("A").field(Field::new("name", FieldKind::String).annotate(Annotation::order_field("NAME"))))
            .node(Type::new("B").field(Field::new("name", FieldKind::String).annotate(Annotation::order_field("NAME"))))
            .node(Type::new("C").field(Field::new("name", FieldKind::String)));

        let schema = Generator::new(&graph).build_schema().unwrap();
        let sdl = format_schema(&schema);
        assert_eq!(sdl.matches("enum OrderDirection").count(), 1);
        assert!(schema.contains("AOrder") && schema.contains("AOrderField"));
        assert!(schema.contains("BOrder") && schema.contains("BOrderField"));
        assert!(!schema.contains("COrder") && !schema.contains("COrderField"));
    }

    #[test]
    fn test_skipped_type_excluded() {
        let graph = Graph::default()
            .node(
                Type::new("Secret")
                    .with_id(Field::new("id", FieldKind::Int))
                    .field(Field::new("value", FieldKind::String).annotate(Annotation::order_field("VALUE")))
                    .annotate(Annotation::relay_connection())
                    .annotate(Annotation::skip()),
            )
            .node(
                Type::new("Todo")
                    .with_id(Field::new("id", FieldKind::Int))
                    .field(Field::new("secret", FieldKind::Other).annotate(Annotation::gql_type("Secret"))),
            );

        let schema = Generator::new(&graph).build_schema().unwrap();
        for name in ["Secret", "SecretConnection", "SecretEdge", "SecretOrder", "SecretOrderField", "OrderDirection"] {
            assert!(!schema.contains(name), "{name} should not be generated");
        }

        let dangling = schema.dangling_references();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].missing, "Secret");
    }

    #[test]
    fn test_extra_interfaces() {
        let graph = Graph::default().node(
            Type::new("Todo")
                .with_id(Field::new("id", FieldKind::Int))
                .annotate(Annotation::implements(["Entity"])),
        );
        let schema = Generator::new(&graph).build_schema().unwrap();
        assert_eq!(
            schema.get("Todo").map(|d| d.interfaces.clone()),
            Some(vec![RELAY_NODE.to_string(), "Entity".to_string()])
        );
    }

    #[test]
    fn test_node_without_id_is_reported() {
        let graph = Graph::default()
            .node(Type::new("Tag").field(Field::new("name", FieldKind::String)))
            .node(
                Type::new("Todo")
                    .with_id(Field::new("id", FieldKind::Int).annotate(Annotation::skip()))
                    .field(Field::new("text", FieldKind::String)),
            )
            .node(Type::new("User").with_id(Field::new("id", FieldKind::Int)));

        let schema = Generator::new(&graph).build_schema().unwrap();
        let missing: Vec<String> = schema
            .missing_interface_fields()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            missing,
            vec![
                "Tag implements Node but has no field id",
                "Todo implements Node but has no field id",
            ]
        );
    }

    #[test]
    fn test_edge_annotations_leave_schema_unchanged() {
        let plain = Graph::default().node(
            Type::new("Todo")
                .with_id(Field::new("id", FieldKind::Int))
                .field(Field::new("text", FieldKind::String)),
        );
        let annotated = Graph::default().node(
            Type::new("Todo")
                .with_id(Field::new("id", FieldKind::Int))
                .field(
                    Field::new("text", FieldKind::String)
                        .annotate(Annotation::bind())
                        .annotate(Annotation::maps_to(["body"]))
                        .annotate(Annotation {
                            gql_name: "body".to_string(),
                            ..Annotation::default()
                        }),
                ),
        );

        assert_eq!(
            Generator::new(&annotated).generate().unwrap(),
            Generator::new(&plain).generate().unwrap()
        );
    }

    #[test]
    fn test_mapped_scalars_only_when_referenced() {
        let graph = Graph::default()
            .annotate(Annotation::scalar_mappings([("UUID", "UUID"), ("Bytes", "String")]))
            .node(
                Type::new("Todo")
                    .with_id(Field::new("id", FieldKind::Uuid))
                    .field(Field::new("created_at", FieldKind::Time))
                    .field(Field::new("data", FieldKind::Bytes).nillable()),
            );

        let schema = Generator::new(&graph).build_schema().unwrap();
        assert_eq!(schema.get("UUID").map(|d| d.kind), Some(DefinitionKind::Scalar));
        assert_eq!(schema.get("Time").map(|d| d.kind), Some(DefinitionKind::Scalar));
        assert!(!schema.contains("String"));

        let todo = schema.get("Todo").unwrap();
        assert_eq!(todo.field("id").map(|f| f.ty.to_string()).as_deref(), Some("UUID!"));
        assert_eq!(todo.field("data").map(|f| f.ty.to_string()).as_deref(), Some("String"));

        assert!(schema.dangling_references().is_empty());
    }

    #[test]
    fn test_unused_mapping_emits_nothing() {
        let graph = Graph::default().annotate(Annotation::scalar_mappings([("UUID", "UUID")]));
        let source = Generator::new(&graph).generate().unwrap();
        assert_eq!(source.input, RELAY_BUILTINS);
    }

    #[test]
    fn test_mapping_error_aborts() {
        let graph = Graph::default().node(
            Type::new("Todo")
                .with_id(Field::new("id", FieldKind::Int))
                .field(Field::new("payload", FieldKind::Json)),
        );
        let err = Generator::new(&graph).generate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "type(Todo): field(payload): JSON type not implemented"
        );
    }

    #[test]
    fn test_enum_conflict_aborts() {
        let graph = Graph::default()
            .node(Type::new("Todo").field(Field::enumeration("status", ["OPEN"])))
            .node(Type::new("Task").field(Field::enumeration("status", ["CLOSED"])));
        assert!(matches!(
            Generator::new(&graph).generate(),
            Err(GeneratorError::EnumConflict { .. })
        ));
    }

    #[test]
    fn test_hooks_run_in_order() {
        let graph = Graph::default().node(Type::new("Todo").with_id(Field::new("id", FieldKind::Int)));
        let schema = Generator::new(&graph)
            .hook(|schema| {
                schema.rename("Todo", "Task");
            })
            .hook(|schema| {
                if let Some(task) = schema.get_mut("Task") {
                    task.directives.push(Directive::new("key").argument("fields", "\"id\""));
                }
            })
            .build_schema()
            .unwrap();

        let task = schema.get("Task").unwrap();
        assert_eq!(task.directives.len(), 1);
        assert!(!schema.contains("Todo"));
        assert!(schema.contains(RELAY_CURSOR) && schema.contains(RELAY_PAGE_INFO));
    }

    #[test]
    fn test_custom_field_namer() {
        fn snake(name: &str) -> String {
            name.to_string()
        }

        let graph = Graph::default().node(Type::new("Todo").field(Field::new("created_at", FieldKind::String)));
        let config = GeneratorConfig {
            field_name: snake,
            ..GeneratorConfig::default()
        };
        let schema = Generator::with_config(&graph, config).build_schema().unwrap();
        assert!(schema.get("Todo").and_then(|d| d.field("created_at")).is_some());
    }

    #[test]
    fn test_generate_registers_bindings() {
        let graph = todo_graph();
        let mut cfg = GqlgenConfig::default();
        let source = generate(&mut cfg, &graph, Vec::new()).unwrap();

        assert!(source.input.contains("type TodoConnection"));
        assert!(cfg.models.exists("TodoConnection"));
        assert_eq!(cfg.autobind, vec!["crate::ent".to_string()]);
    }

    #[test]
    fn test_config_from_graph() {
        let graph = Graph::default().annotate(Annotation::scalar_mappings([("Time", "DateTime")]));
        let config = GeneratorConfig::from_graph(&graph);
        assert_eq!(config.scalar_mappings.get("Time").map(String::as_str), Some("DateTime"));
        assert_eq!((config.field_name)("created_at"), "createdAt");
        assert_eq!(camel("ID"), "id");
    }
}
