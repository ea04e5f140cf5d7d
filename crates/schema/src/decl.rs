//! Schema declaration files: serde structs and conversion into descriptors.
//!
//! A declaration file is JSON with a dotted `module` path and a `models`
//! table. The type grammar is JSON-Schema-flavoured:
//! `{"type": "string"}`, `{"type": "array", "items": T}`, `{"anyOf": [T...]}`,
//! `{"enum": [...]}`, `{"$ref": "#/models/Name"}`,
//! `{"external": {"module": "datetime", "name": "datetime"}}`.
//!
//! Parsing is a two-step pipeline: serde deserializes the raw shape, then
//! conversion produces engine-facing [`TypeDescriptor`]s, rejecting anything
//! structurally valid but semantically malformed.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::descriptor::{
    AliasGenerator, FieldDescriptor, LiteralValue, ModelDescriptor, Primitive, TypeDescriptor,
    ValidationAlias,
};
use crate::registry::Registry;
use crate::SchemaError;

/// Prefix a `$ref` must carry to address a declared model.
const MODEL_REF_PREFIX: &str = "#/models/";

/// Root of one declaration file.
#[derive(Debug, Deserialize)]
pub struct DeclFile {
    /// Dotted Python module path shared by every model in this file.
    pub module: String,
    /// Models in declaration order.
    pub models: IndexMap<String, ModelDecl>,
}

/// One declared model.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDecl {
    /// MongoDB collection name; present on generation roots only.
    pub collection: Option<String>,
    pub alias_generator: Option<AliasGenerator>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

/// One declared field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDecl {
    pub name: String,
    pub serialization_alias: Option<String>,
    pub validation_alias: Option<ValidationAliasDecl>,
    #[serde(rename = "type", default)]
    pub ty: TypeDecl,
}

/// Validation alias: a plain string or a list of candidates.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValidationAliasDecl {
    Single(String),
    Choices(Vec<String>),
}

/// Raw type expression. Exactly one construct is expected per node; `$ref`,
/// `external`, `anyOf`, and `enum` take precedence over `type` when present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDecl {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub items: Option<Box<TypeDecl>>,
    pub additional_properties: Option<Box<TypeDecl>>,
    pub any_of: Option<Vec<TypeDecl>>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<serde_json::Value>>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    pub external: Option<ExternalDecl>,
}

/// An imported scalar class.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalDecl {
    pub module: String,
    pub name: String,
}

/// Parse one declaration file's JSON text into model descriptors.
pub fn parse_declaration(json: &str, path: &Path) -> Result<Vec<ModelDescriptor>, SchemaError> {
    let file: DeclFile = serde_json::from_str(json).map_err(|source| SchemaError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut models = Vec::with_capacity(file.models.len());
    for (name, decl) in file.models {
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in decl.fields {
            let ty = convert_type(&field.ty, &name, &field.name)?;
            fields.push(FieldDescriptor {
                name: field.name,
                serialization_alias: field.serialization_alias,
                validation_alias: field.validation_alias.map(|alias| match alias {
                    ValidationAliasDecl::Single(s) => ValidationAlias::Single(s),
                    ValidationAliasDecl::Choices(c) => ValidationAlias::Choices(c),
                }),
                ty,
            });
        }
        models.push(ModelDescriptor {
            name,
            module: file.module.clone(),
            collection: decl.collection,
            alias_generator: decl.alias_generator,
            fields,
        });
    }
    Ok(models)
}

/// Load declaration files and merge them into one ordered registry.
pub fn load_registry(sources: &[PathBuf]) -> Result<Registry, SchemaError> {
    let mut registry = Registry::new();
    for path in sources {
        let json = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.clone(),
            source,
        })?;
        for model in parse_declaration(&json, path)? {
            registry.insert(model)?;
        }
    }
    Ok(registry)
}

fn decl_error(model: &str, field: &str, message: impl Into<String>) -> SchemaError {
    SchemaError::Decl {
        model: model.to_string(),
        field: field.to_string(),
        message: message.into(),
    }
}

fn convert_type(decl: &TypeDecl, model: &str, field: &str) -> Result<TypeDescriptor, SchemaError> {
    if let Some(reference) = &decl.reference {
        let target = reference
            .strip_prefix(MODEL_REF_PREFIX)
            .ok_or_else(|| decl_error(model, field, format!("unsupported $ref: {reference}")))?;
        if target.is_empty() || target.contains('/') {
            return Err(decl_error(model, field, format!("unsupported $ref: {reference}")));
        }
        return Ok(TypeDescriptor::Record(target.to_string()));
    }

    if let Some(external) = &decl.external {
        return Ok(TypeDescriptor::External {
            module: external.module.clone(),
            name: external.name.clone(),
        });
    }

    if let Some(variants) = &decl.any_of {
        let converted = variants
            .iter()
            .map(|variant| convert_type(variant, model, field))
            .collect::<Result<Vec<_>, _>>()?;
        if converted.is_empty() {
            return Err(decl_error(model, field, "anyOf must not be empty"));
        }
        return Ok(TypeDescriptor::Union(converted));
    }

    if let Some(values) = &decl.enum_values {
        let converted = values
            .iter()
            .map(|value| convert_literal(value, model, field))
            .collect::<Result<Vec<_>, _>>()?;
        if converted.is_empty() {
            return Err(decl_error(model, field, "enum must not be empty"));
        }
        return Ok(TypeDescriptor::Literal(converted));
    }

    match decl.kind.as_deref() {
        Some("string") => Ok(TypeDescriptor::Primitive(Primitive::Str)),
        Some("integer") => Ok(TypeDescriptor::Primitive(Primitive::Int)),
        Some("number") => Ok(TypeDescriptor::Primitive(Primitive::Float)),
        Some("boolean") => Ok(TypeDescriptor::Primitive(Primitive::Bool)),
        Some("binary") => Ok(TypeDescriptor::Primitive(Primitive::Bytes)),
        Some("null") => Ok(TypeDescriptor::None),
        Some("array") => {
            let element = match &decl.items {
                Some(items) => convert_type(items, model, field)?,
                None => TypeDescriptor::Any,
            };
            Ok(TypeDescriptor::List(Box::new(element)))
        }
        Some("object") => {
            let value = match &decl.additional_properties {
                Some(value) => convert_type(value, model, field)?,
                None => TypeDescriptor::Any,
            };
            Ok(TypeDescriptor::Map {
                key: Box::new(TypeDescriptor::Primitive(Primitive::Str)),
                value: Box::new(value),
            })
        }
        // Absent or explicit "any" both mean the opaque catch-all.
        Some("any") | None => Ok(TypeDescriptor::Any),
        Some(other) => Err(decl_error(model, field, format!("unsupported type kind: {other}"))),
    }
}

fn convert_literal(
    value: &serde_json::Value,
    model: &str,
    field: &str,
) -> Result<LiteralValue, SchemaError> {
    match value {
        serde_json::Value::String(s) => Ok(LiteralValue::Str(s.clone())),
        serde_json::Value::Bool(b) => Ok(LiteralValue::Bool(*b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(LiteralValue::Int)
            .ok_or_else(|| decl_error(model, field, format!("unsupported enum value: {n}"))),
        other => Err(decl_error(model, field, format!("unsupported enum value: {other}"))),
    }
}
