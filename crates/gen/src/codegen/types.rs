//! Python type-expression AST for the generated stub.
//!
//! The renderer lowers schema [`TypeDescriptor`]s into these nodes; the
//! `Emit` trait then turns them into source text. Keeping a real AST between
//! the two steps means new type kinds are additive rather than special-cased
//! string concatenation.
//!
//! [`TypeDescriptor`]: typed_mongo_schema::TypeDescriptor

/// A Python type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum PyType {
    /// Bare builtin name: `str`, `int`, `float`, `bool`, `bytes`.
    Builtin(&'static str),
    /// The `None` type, used inside unions.
    None,
    /// `typing.Any`, the opaque catch-all.
    Any,
    /// Pipe-joined union: `A | B | C`.
    Union(Vec<PyType>),
    /// `list[T]`.
    List(Box<PyType>),
    /// `dict[K, V]`.
    Dict { key: Box<PyType>, value: Box<PyType> },
    /// `Literal[...]` over exact values.
    Literal(Vec<PyLiteral>),
    /// A named class, optionally qualified by a module alias:
    /// `Name` or `_pkg_module.Name`.
    Named {
        qualifier: Option<String>,
        name: String,
    },
}

/// A literal value inside `Literal[...]`, spelled the way Python `repr` does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PyLiteral {
    Str(String),
    Int(i64),
    Bool(bool),
}
