//! Field path introspection for schema models.
//!
//! Walks a root model's fields recursively and collects every dot-delimited
//! MongoDB field path, handling nested records, lists of records, unions,
//! aliases, and self-referential models.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use typed_mongo_schema::{
    FieldDescriptor, ModelDescriptor, Registry, TypeDescriptor, ValidationAlias,
};

/// Resolve the MongoDB field name for a declared field.
///
/// Precedence, first match wins: explicit serialization alias, explicit
/// validation alias (plain-string form only), the model's alias generator,
/// the declared name. Pure function of model + field.
pub fn resolve_alias(model: &ModelDescriptor, field: &FieldDescriptor) -> String {
    if let Some(alias) = &field.serialization_alias {
        return alias.clone();
    }
    if let Some(ValidationAlias::Single(alias)) = &field.validation_alias {
        return alias.clone();
    }
    if let Some(generator) = model.alias_generator {
        return generator.apply(&field.name);
    }
    field.name.clone()
}

/// Return the sorted, deduplicated set of all dot-delimited field paths
/// reachable from `model`. Intermediate nested-record paths are included
/// alongside their descendants.
pub fn collect_field_paths(registry: &Registry, model: &ModelDescriptor) -> Vec<String> {
    let mut paths = BTreeSet::new();
    let mut ancestors = Vec::new();
    walk(registry, model, "", &mut ancestors, &mut |path, _| {
        paths.insert(path);
    });
    paths.into_iter().collect()
}

/// Return each reachable field path mapped to its raw declared type
/// descriptor, in declaration (traversal) order.
pub fn collect_field_path_types<'a>(
    registry: &'a Registry,
    model: &'a ModelDescriptor,
) -> IndexMap<String, &'a TypeDescriptor> {
    let mut path_types = IndexMap::new();
    let mut ancestors = Vec::new();
    walk(registry, model, "", &mut ancestors, &mut |path, ty| {
        path_types.insert(path, ty);
    });
    path_types
}

/// Extract every record name reachable through arbitrary nesting of list and
/// union wrappers. A `list[Model]` is entered exactly as if the field were
/// the record itself (MongoDB implicit array navigation); a union contributes
/// every non-null variant. Map values are not traversed.
fn extract_records<'a>(ty: &'a TypeDescriptor, out: &mut Vec<&'a str>) {
    match ty {
        TypeDescriptor::Record(name) => out.push(name),
        TypeDescriptor::List(element) => extract_records(element, out),
        TypeDescriptor::Union(variants) => {
            for variant in variants {
                if !matches!(variant, TypeDescriptor::None) {
                    extract_records(variant, out);
                }
            }
        }
        _ => {}
    }
}

/// Depth-first traversal shared by both collection modes.
///
/// `ancestors` is the chain of models on the current recursion branch (the
/// root excluded). A nested model already on the branch is skipped, which
/// terminates cycles while still expanding the same model independently when
/// it is reachable through unrelated sibling fields.
fn walk<'a>(
    registry: &'a Registry,
    model: &'a ModelDescriptor,
    prefix: &str,
    ancestors: &mut Vec<&'a str>,
    sink: &mut impl FnMut(String, &'a TypeDescriptor),
) {
    for field in &model.fields {
        let alias = resolve_alias(model, field);
        let full_path = if prefix.is_empty() {
            alias
        } else {
            format!("{prefix}.{alias}")
        };
        sink(full_path.clone(), &field.ty);

        let mut nested = Vec::new();
        extract_records(&field.ty, &mut nested);
        for name in nested {
            if ancestors.contains(&name) {
                continue;
            }
            // Dangling refs contribute no recursion; the renderer decides
            // whether they degrade or fail.
            let Some(nested_model) = registry.get(name) else {
                continue;
            };
            ancestors.push(name);
            walk(registry, nested_model, &full_path, ancestors, sink);
            ancestors.pop();
        }
    }
}
