//! Rendering schema type descriptors into Python type AST.
//!
//! Two modes share one recursive core: `render_type` produces the exact
//! declared type (used for the fields shape), while `render_query_value`
//! produces the query-side type, where an n-deep list field accepts a match
//! at every nesting level: `T | list[T] | ... | list^n[T]`.

use tracing::warn;
use typed_mongo_schema::{Registry, TypeDescriptor};

use super::imports::ModuleAliases;
use super::types::{PyLiteral, PyType};

/// What to do with a descriptor that falls outside every rendering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPolicy {
    /// Widen to `Any` and log a warning. The silent widening matches the
    /// original generator's behavior.
    #[default]
    Degrade,
    /// Fail generation with `GenerateError::UnrenderableType`.
    Strict,
}

/// Shared context for one generation run: the registry for resolving record
/// references, the finalized module alias map, and the render policy.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub registry: &'a Registry,
    pub module_aliases: &'a ModuleAliases,
    pub policy: RenderPolicy,
}

impl RenderContext<'_> {
    /// Build the reference AST for a named class living in `module`,
    /// qualifying it when the module carries a collision alias.
    pub fn named(&self, module: &str, name: &str) -> PyType {
        PyType::Named {
            qualifier: self.module_aliases.get(module).cloned(),
            name: name.to_string(),
        }
    }
}

/// Render the exact declared type of a field.
///
/// Under [`RenderPolicy::Degrade`] this never fails; unresolvable constructs
/// widen to `Any`. Under [`RenderPolicy::Strict`] the error carries the
/// reason; the caller attaches model and path context.
pub fn render_type(ty: &TypeDescriptor, ctx: &RenderContext<'_>) -> Result<PyType, String> {
    match ty {
        TypeDescriptor::Primitive(p) => Ok(PyType::Builtin(p.py_name())),
        TypeDescriptor::None => Ok(PyType::None),
        TypeDescriptor::Any => Ok(PyType::Any),
        TypeDescriptor::Union(variants) => {
            let rendered = variants
                .iter()
                .map(|variant| render_type(variant, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(PyType::Union(rendered))
        }
        TypeDescriptor::List(element) => {
            Ok(PyType::List(Box::new(render_type(element, ctx)?)))
        }
        TypeDescriptor::Map { key, value } => Ok(PyType::Dict {
            key: Box::new(render_type(key, ctx)?),
            value: Box::new(render_type(value, ctx)?),
        }),
        TypeDescriptor::Literal(values) => Ok(PyType::Literal(
            values.iter().map(literal_value).collect(),
        )),
        TypeDescriptor::External { module, name } => Ok(ctx.named(module, name)),
        TypeDescriptor::Record(name) => match ctx.registry.get(name) {
            Some(model) => Ok(ctx.named(&model.module, &model.name)),
            None => degrade_or_fail(ctx, format!("unknown record reference: {name}")),
        },
    }
}

/// Render the query-side value type for a field.
///
/// For `list`-typed fields the document store matches either an element or
/// any level of nesting, so the result unions the element's query type with
/// the full list type at each depth. Other shapes render exactly.
pub fn render_query_value(ty: &TypeDescriptor, ctx: &RenderContext<'_>) -> Result<PyType, String> {
    if let TypeDescriptor::List(element) = ty {
        let element_query = render_query_value(element, ctx)?;
        let full_list = render_type(ty, ctx)?;
        let mut variants = match element_query {
            PyType::Union(parts) => parts,
            other => vec![other],
        };
        variants.push(full_list);
        return Ok(PyType::Union(variants));
    }
    render_type(ty, ctx)
}

fn literal_value(value: &typed_mongo_schema::LiteralValue) -> PyLiteral {
    match value {
        typed_mongo_schema::LiteralValue::Str(s) => PyLiteral::Str(s.clone()),
        typed_mongo_schema::LiteralValue::Int(i) => PyLiteral::Int(*i),
        typed_mongo_schema::LiteralValue::Bool(b) => PyLiteral::Bool(*b),
    }
}

fn degrade_or_fail(ctx: &RenderContext<'_>, reason: String) -> Result<PyType, String> {
    match ctx.policy {
        RenderPolicy::Degrade => {
            warn!(reason = %reason, "Widening unrenderable type to Any.");
            Ok(PyType::Any)
        }
        RenderPolicy::Strict => Err(reason),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::codegen::emit::Emit;
    use typed_mongo_schema::{FieldDescriptor, LiteralValue, ModelDescriptor, Primitive};

    fn empty_registry() -> Registry {
        Registry::new()
    }

    fn registry_with_address() -> Registry {
        let mut registry = Registry::new();
        registry
            .insert(ModelDescriptor {
                name: "Address".to_string(),
                module: "my_app.models".to_string(),
                collection: None,
                alias_generator: None,
                fields: vec![FieldDescriptor {
                    name: "city".to_string(),
                    serialization_alias: None,
                    validation_alias: None,
                    ty: TypeDescriptor::Primitive(Primitive::Str),
                }],
            })
            .unwrap();
        registry
    }

    fn ctx<'a>(registry: &'a Registry, aliases: &'a ModuleAliases, policy: RenderPolicy) -> RenderContext<'a> {
        RenderContext {
            registry,
            module_aliases: aliases,
            policy,
        }
    }

    #[test]
    fn test_render_primitives_and_unions() {
        let registry = empty_registry();
        let aliases = ModuleAliases::new();
        let ctx = ctx(&registry, &aliases, RenderPolicy::Degrade);

        let ty = TypeDescriptor::Union(vec![
            TypeDescriptor::Primitive(Primitive::Str),
            TypeDescriptor::None,
        ]);
        assert_eq!(render_type(&ty, &ctx).unwrap().emit(), "str | None");
    }

    #[test]
    fn test_render_literal_set() {
        let registry = empty_registry();
        let aliases = ModuleAliases::new();
        let ctx = ctx(&registry, &aliases, RenderPolicy::Degrade);

        let ty = TypeDescriptor::Literal(vec![
            LiteralValue::Str("active".to_string()),
            LiteralValue::Int(3),
        ]);
        assert_eq!(render_type(&ty, &ctx).unwrap().emit(), "Literal['active', 3]");
    }

    #[test]
    fn test_query_value_expands_every_list_depth() {
        let registry = empty_registry();
        let aliases = ModuleAliases::new();
        let ctx = ctx(&registry, &aliases, RenderPolicy::Degrade);

        // list[list[list[str]]]
        let ty = TypeDescriptor::List(Box::new(TypeDescriptor::List(Box::new(
            TypeDescriptor::List(Box::new(TypeDescriptor::Primitive(Primitive::Str))),
        ))));
        assert_eq!(
            render_query_value(&ty, &ctx).unwrap().emit(),
            "str | list[str] | list[list[str]] | list[list[list[str]]]"
        );
    }

    #[test]
    fn test_query_value_identity_for_non_lists() {
        let registry = empty_registry();
        let aliases = ModuleAliases::new();
        let ctx = ctx(&registry, &aliases, RenderPolicy::Degrade);

        let ty = TypeDescriptor::Primitive(Primitive::Float);
        assert_eq!(render_query_value(&ty, &ctx).unwrap().emit(), "float");
    }

    #[test]
    fn test_record_reference_qualified_by_alias_map() {
        let registry = registry_with_address();
        let mut aliases = ModuleAliases::new();
        aliases.insert("my_app.models".to_string(), "_my_app_models".to_string());
        let ctx = ctx(&registry, &aliases, RenderPolicy::Degrade);

        let ty = TypeDescriptor::Record("Address".to_string());
        assert_eq!(render_type(&ty, &ctx).unwrap().emit(), "_my_app_models.Address");
    }

    #[test]
    fn test_unknown_record_degrades_to_any() {
        let registry = empty_registry();
        let aliases = ModuleAliases::new();
        let ctx = ctx(&registry, &aliases, RenderPolicy::Degrade);

        let ty = TypeDescriptor::Record("Missing".to_string());
        assert_eq!(render_type(&ty, &ctx).unwrap(), PyType::Any);
    }

    #[test]
    fn test_unknown_record_fails_in_strict_mode() {
        let registry = empty_registry();
        let aliases = ModuleAliases::new();
        let ctx = ctx(&registry, &aliases, RenderPolicy::Strict);

        let ty = TypeDescriptor::List(Box::new(TypeDescriptor::Record("Missing".to_string())));
        let err = render_type(&ty, &ctx).unwrap_err();
        assert!(err.contains("Missing"));
    }
}
