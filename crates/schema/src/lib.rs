//! Schema model descriptors and registry for typed-mongo-gen.
//!
//! This crate is the reflection interface the generator engine depends on:
//! every schema model is an explicit [`ModelDescriptor`] holding an ordered
//! list of [`FieldDescriptor`]s, and every field type is a structural
//! [`TypeDescriptor`]. The engine only reads these; it never mutates a model
//! or builds new descriptors during traversal.
//!
//! Declarations are loaded from JSON files (see [`decl`]) into a [`Registry`],
//! an ordered name -> model mapping whose iteration order is the emission
//! order of the generated files.

use std::path::PathBuf;

use thiserror::Error;

pub mod decl;
mod descriptor;
mod registry;

pub use decl::{load_registry, parse_declaration};
pub use descriptor::{
    AliasGenerator, FieldDescriptor, LiteralValue, ModelDescriptor, Primitive, TypeDescriptor,
    ValidationAlias,
};
pub use registry::Registry;

/// Errors raised while loading schema declarations into a registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A declaration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A declaration file is not valid JSON for the declaration format.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A declaration is structurally valid JSON but semantically malformed
    /// (bad `$ref` target syntax, unsupported type kind, bad enum value).
    #[error("invalid declaration for {model}.{field}: {message}")]
    Decl {
        model: String,
        field: String,
        message: String,
    },

    /// The same model name was declared more than once across input files.
    #[error("duplicate model declaration: {name}")]
    DuplicateModel { name: String },
}
