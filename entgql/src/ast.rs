//! GraphQL schema definitions
//!
//! A minimal SDL syntax tree: just enough to describe the scalars, enums,
//! objects, interfaces and inputs the generator emits, and for hooks to
//! adjust them before printing.

use std::collections::BTreeMap;
use std::fmt;

/// Scalars every GraphQL schema has without declaring them
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Whether `name` is one of the builtin scalars
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Definitions keyed by name; the last insert for a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    types: BTreeMap<String, Definition>,
}

impl Schema {
    /// An empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a definition
    pub fn insert(&mut self, def: Definition) {
        self.types.insert(def.name.clone(), def);
    }

    /// Insert or overwrite several definitions
    pub fn extend(&mut self, defs: impl IntoIterator<Item = Definition>) {
        for def in defs {
            self.insert(def);
        }
    }

    /// Look up a definition
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.types.get(name)
    }

    /// Look up a definition for modification
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Definition> {
        self.types.get_mut(name)
    }

    /// Remove a definition
    pub fn remove(&mut self, name: &str) -> Option<Definition> {
        self.types.remove(name)
    }

    /// Whether a definition exists
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Definitions in name order
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.types.values()
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the schema has no definitions
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Rename a definition and rewrite every field type and interface
    /// referring to it. Returns false when `from` is not defined.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        let Some(mut def) = self.types.remove(from) else {
            return false;
        };
        def.name = to.to_string();
        self.types.insert(def.name.clone(), def);

        for def in self.types.values_mut() {
            for interface in &mut def.interfaces {
                if *interface == from {
                    *interface = to.to_string();
                }
            }
            for field in &mut def.fields {
                field.ty.rename(from, to);
            }
        }
        true
    }

    /// Field types and interfaces naming a type that is neither defined
    /// nor a builtin scalar
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let resolves = |name: &str| is_builtin_scalar(name) || self.types.contains_key(name);
        let mut dangling = Vec::new();

        for def in self.types.values() {
            for interface in &def.interfaces {
                if !resolves(interface) {
                    dangling.push(DanglingReference {
                        definition: def.name.clone(),
                        member: None,
                        missing: interface.clone(),
                    });
                }
            }
            for field in &def.fields {
                let name = field.ty.name();
                if !resolves(name) {
                    dangling.push(DanglingReference {
                        definition: def.name.clone(),
                        member: Some(field.name.clone()),
                        missing: name.to_string(),
                    });
                }
            }
        }

        dangling
    }

    /// Interface fields an implementing definition does not declare
    ///
    /// Interfaces that are not defined are left to
    /// [`Schema::dangling_references`].
    pub fn missing_interface_fields(&self) -> Vec<MissingInterfaceField> {
        let mut missing = Vec::new();

        for def in self.types.values() {
            for interface in &def.interfaces {
                let Some(iface) = self.types.get(interface) else {
                    continue;
                };
                for field in &iface.fields {
                    if def.field(&field.name).is_none() {
                        missing.push(MissingInterfaceField {
                            definition: def.name.clone(),
                            interface: interface.clone(),
                            field: field.name.clone(),
                        });
                    }
                }
            }
        }

        missing
    }
}

/// A reference to a type missing from the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Definition holding the reference
    pub definition: String,
    /// Field holding the reference, `None` for an interface
    pub member: Option<String>,
    /// The undefined type name
    pub missing: String,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            Some(member) => write!(f, "{}.{} refers to undefined type {}", self.definition, member, self.missing),
            None => write!(f, "{} implements undefined interface {}", self.definition, self.missing),
        }
    }
}

/// An interface field missing from an implementing definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingInterfaceField {
    /// Implementing definition
    pub definition: String,
    /// Interface declaring the field
    pub interface: String,
    /// The missing field
    pub field: String,
}

impl fmt::Display for MissingInterfaceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} implements {} but has no field {}",
            self.definition, self.interface, self.field
        )
    }
}

/// Kind of a top-level definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// `scalar`
    Scalar,
    /// `type`
    Object,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
    /// `input`
    InputObject,
}

impl DefinitionKind {
    /// SDL keyword
    pub fn keyword(&self) -> &'static str {
        match self {
            DefinitionKind::Scalar => "scalar",
            DefinitionKind::Object => "type",
            DefinitionKind::Interface => "interface",
            DefinitionKind::Enum => "enum",
            DefinitionKind::InputObject => "input",
        }
    }
}

/// A top-level type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Definition kind
    pub kind: DefinitionKind,
    /// Type name
    pub name: String,
    /// Implemented interfaces (objects and interfaces)
    pub interfaces: Vec<String>,
    /// Fields (objects, interfaces, inputs)
    pub fields: Vec<FieldDefinition>,
    /// Values (enums)
    pub enum_values: Vec<EnumValueDefinition>,
    /// Directives applied to the definition
    pub directives: Vec<Directive>,
}

impl Definition {
    fn new(kind: DefinitionKind, name: impl Into<String>) -> Self {
        Definition {
            kind,
            name: name.into(),
            interfaces: Vec::new(),
            fields: Vec::new(),
            enum_values: Vec::new(),
            directives: Vec::new(),
        }
    }

    /// `scalar <name>`
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(DefinitionKind::Scalar, name)
    }

    /// `type <name> { ... }`
    pub fn object(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Definition {
            fields,
            ..Self::new(DefinitionKind::Object, name)
        }
    }

    /// `interface <name> { ... }`
    pub fn interface(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Definition {
            fields,
            ..Self::new(DefinitionKind::Interface, name)
        }
    }

    /// `input <name> { ... }`
    pub fn input(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Definition {
            fields,
            ..Self::new(DefinitionKind::InputObject, name)
        }
    }

    /// `enum <name> { ... }`
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Definition {
            enum_values: values.into_iter().map(EnumValueDefinition::new).collect(),
            ..Self::new(DefinitionKind::Enum, name)
        }
    }

    /// Set implemented interfaces
    pub fn implements(mut self, interfaces: Vec<String>) -> Self {
        self.interfaces = interfaces;
        self
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Enum value names in order
    pub fn value_names(&self) -> Vec<&str> {
        self.enum_values.iter().map(|v| v.name.as_str()).collect()
    }
}

/// A field of an object, interface or input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: TypeRef,
    /// Directives applied to the field
    pub directives: Vec<Directive>,
}

impl FieldDefinition {
    /// A field without directives
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        FieldDefinition {
            name: name.into(),
            ty,
            directives: Vec::new(),
        }
    }
}

/// A value of an enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDefinition {
    /// Value name
    pub name: String,
    /// Directives applied to the value
    pub directives: Vec<Directive>,
}

impl EnumValueDefinition {
    /// A value without directives
    pub fn new(name: impl Into<String>) -> Self {
        EnumValueDefinition {
            name: name.into(),
            directives: Vec::new(),
        }
    }
}

/// A directive application, e.g. `@goModel(model: "todo.Todo")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Directive name without `@`
    pub name: String,
    /// Argument name and value, the value in SDL source form
    pub arguments: Vec<(String, String)>,
}

impl Directive {
    /// A directive without arguments
    pub fn new(name: impl Into<String>) -> Self {
        Directive {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Add an argument; `value` is written verbatim
    pub fn argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.push((name.into(), value.into()));
        self
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.arguments.is_empty() {
            let args: Vec<String> = self
                .arguments
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect();
            write!(f, "({})", args.join(", "))?;
        }
        Ok(())
    }
}

/// A type reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// `Name`
    Named(String),
    /// `[T]`
    List(Box<TypeRef>),
    /// `T!`
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// A named type, non-null unless `nullable`
    pub fn named(name: impl Into<String>, nullable: bool) -> Self {
        let ty = TypeRef::Named(name.into());
        if nullable { ty } else { ty.non_null() }
    }

    /// `[T]`
    pub fn list(of: TypeRef) -> Self {
        TypeRef::List(Box::new(of))
    }

    /// Wrap in non-null; already non-null types are returned unchanged
    pub fn non_null(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    /// The innermost named type
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.name(),
        }
    }

    /// Whether the outermost type is non-null
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    fn rename(&mut self, from: &str, to: &str) {
        match self {
            TypeRef::Named(name) => {
                if *name == from {
                    *name = to.to_string();
                }
            }
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.rename(from, to),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}
