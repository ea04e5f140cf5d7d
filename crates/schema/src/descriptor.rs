//! Engine-facing schema descriptors.
//!
//! A [`ModelDescriptor`] is a named, ordered collection of fields; a
//! [`TypeDescriptor`] is the tagged structural description of one field's
//! value type. Descriptors are read-only views for the generator: traversal
//! and rendering never construct new ones.

use serde::Deserialize;

/// Primitive scalar kinds with a fixed Python spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Str,
    Int,
    Float,
    Bool,
    Bytes,
}

impl Primitive {
    /// The Python builtin name this primitive renders to.
    pub fn py_name(self) -> &'static str {
        match self {
            Primitive::Str => "str",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
            Primitive::Bytes => "bytes",
        }
    }
}

/// One value of a `Literal[...]` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

/// Structural description of a field's declared value type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    /// Python `None`; only meaningful as a union variant.
    None,
    /// Pipe-joined union of variants. Optional fields are a union with
    /// [`TypeDescriptor::None`].
    Union(Vec<TypeDescriptor>),
    List(Box<TypeDescriptor>),
    /// `dict[K, V]`. Values are rendered but not traversed for nested
    /// records, matching MongoDB's lack of typed paths through free-form
    /// mappings.
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    /// Reference to another declared model, by registry name.
    Record(String),
    /// An imported scalar class such as `datetime.datetime` or an enum.
    External { module: String, name: String },
    Literal(Vec<LiteralValue>),
    /// Catch-all for unclassifiable types; renders as `Any`.
    Any,
}

/// Validation-direction alias metadata. Only the plain-string form
/// participates in wire name resolution; a candidate list (Pydantic's
/// `AliasChoices`) is ambiguous and is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationAlias {
    Single(String),
    Choices(Vec<String>),
}

/// Model-wide alias generation strategy, applied to a field's declared name
/// when no explicit alias is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasGenerator {
    /// `in_stock` -> `inStock`
    Camel,
    /// `in_stock` -> `InStock`
    Pascal,
    /// `in_stock` -> `IN_STOCK`
    Upper,
    /// `in_stock` -> `in-stock`
    Kebab,
}

impl AliasGenerator {
    /// Apply the strategy to a declared (snake_case) field name.
    pub fn apply(self, name: &str) -> String {
        match self {
            AliasGenerator::Camel => {
                let mut out = String::new();
                for (i, part) in name.split('_').filter(|p| !p.is_empty()).enumerate() {
                    if i == 0 {
                        out.push_str(part);
                    } else {
                        out.push_str(&capitalize_first(part));
                    }
                }
                out
            }
            AliasGenerator::Pascal => name
                .split('_')
                .filter(|p| !p.is_empty())
                .map(capitalize_first)
                .collect(),
            AliasGenerator::Upper => name.to_ascii_uppercase(),
            AliasGenerator::Kebab => name.replace('_', "-"),
        }
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// One declared field of a schema model.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Declared (source-side) field name.
    pub name: String,
    /// Explicit serialization-direction alias; highest precedence.
    pub serialization_alias: Option<String>,
    /// Explicit validation-direction alias metadata.
    pub validation_alias: Option<ValidationAlias>,
    /// The field's value type.
    pub ty: TypeDescriptor,
}

/// A named schema model: ordered fields plus alias and collection metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    /// Registry identity.
    pub name: String,
    /// Dotted Python module path the model class lives in; drives imports.
    pub module: String,
    /// MongoDB collection name. `Some` marks a generation root; `None`
    /// marks an embeddable record reachable only via `$ref`.
    pub collection: Option<String>,
    /// Model-wide alias strategy, lowest non-fallback precedence tier.
    pub alias_generator: Option<AliasGenerator>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}
