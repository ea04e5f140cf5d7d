//! Import requirement collection and module-collision aliasing.
//!
//! A generation run imports every external class referenced by any rendered
//! type, plus each root model itself. Bare names claimed by more than one
//! module would make the stub's import block ambiguous, so every module in a
//! conflicting group is imported under a synthetic alias and all references
//! into it are rendered qualified.

use std::collections::{BTreeMap, BTreeSet};

use typed_mongo_schema::{Registry, TypeDescriptor};

/// Module path -> synthetic alias, for modules whose bare names conflict.
pub type ModuleAliases = BTreeMap<String, String>;

/// Deduplicated import requirements for one generation run.
#[derive(Debug, Default)]
pub struct ImportSet {
    /// Names imported from `typing` (beyond the always-present baseline).
    pub typing: BTreeSet<String>,
    /// `(module, name)` pairs for user-land classes.
    pub user: BTreeSet<(String, String)>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk a type descriptor and record everything it needs imported.
    /// Primitives, `None`, and `Any` need nothing; record references resolve
    /// through the registry to find their module.
    pub fn collect(&mut self, ty: &TypeDescriptor, registry: &Registry) {
        match ty {
            TypeDescriptor::Primitive(_) | TypeDescriptor::None | TypeDescriptor::Any => {}
            TypeDescriptor::Union(variants) => {
                for variant in variants {
                    self.collect(variant, registry);
                }
            }
            TypeDescriptor::List(element) => self.collect(element, registry),
            TypeDescriptor::Map { key, value } => {
                self.collect(key, registry);
                self.collect(value, registry);
            }
            TypeDescriptor::Literal(_) => {
                self.typing.insert("Literal".to_string());
            }
            TypeDescriptor::External { module, name } => {
                self.user.insert((module.clone(), name.clone()));
            }
            TypeDescriptor::Record(name) => {
                // Dangling refs render as Any and need no import.
                if let Some(model) = registry.get(name) {
                    self.user.insert((model.module.clone(), model.name.clone()));
                }
            }
        }
    }
}

/// Convert a dotted module path to a unique, deterministic Python alias.
pub fn module_alias(module: &str) -> String {
    format!("_{}", module.replace('.', "_"))
}

/// Detect naming conflicts and return the module -> alias mapping.
///
/// A bare name exported by more than one module marks every module in that
/// group conflicting; non-conflicting modules import unqualified and do not
/// appear in the map.
pub fn build_module_aliases(user_imports: &BTreeSet<(String, String)>) -> ModuleAliases {
    let mut name_to_modules: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (module, name) in user_imports {
        name_to_modules.entry(name).or_default().insert(module);
    }

    let mut aliases = ModuleAliases::new();
    for modules in name_to_modules.values() {
        if modules.len() > 1 {
            for module in modules {
                aliases.insert((*module).to_string(), module_alias(module));
            }
        }
    }
    aliases
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use typed_mongo_schema::{FieldDescriptor, ModelDescriptor, Primitive};

    fn registry_with(models: Vec<(&str, &str)>) -> Registry {
        let mut registry = Registry::new();
        for (name, module) in models {
            registry
                .insert(ModelDescriptor {
                    name: name.to_string(),
                    module: module.to_string(),
                    collection: None,
                    alias_generator: None,
                    fields: vec![FieldDescriptor {
                        name: "x".to_string(),
                        serialization_alias: None,
                        validation_alias: None,
                        ty: TypeDescriptor::Primitive(Primitive::Str),
                    }],
                })
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_collect_through_wrappers() {
        let registry = registry_with(vec![("Address", "my_app.models")]);
        let mut imports = ImportSet::new();

        let ty = TypeDescriptor::Union(vec![
            TypeDescriptor::List(Box::new(TypeDescriptor::Record("Address".to_string()))),
            TypeDescriptor::None,
        ]);
        imports.collect(&ty, &registry);

        assert!(imports
            .user
            .contains(&("my_app.models".to_string(), "Address".to_string())));
        assert!(imports.typing.is_empty());
    }

    #[test]
    fn test_collect_literal_needs_typing() {
        let registry = Registry::new();
        let mut imports = ImportSet::new();
        imports.collect(
            &TypeDescriptor::Literal(vec![typed_mongo_schema::LiteralValue::Bool(true)]),
            &registry,
        );
        assert!(imports.typing.contains("Literal"));
        assert!(imports.user.is_empty());
    }

    #[test]
    fn test_primitives_need_no_import() {
        let registry = Registry::new();
        let mut imports = ImportSet::new();
        imports.collect(&TypeDescriptor::Primitive(Primitive::Bytes), &registry);
        imports.collect(&TypeDescriptor::Any, &registry);
        assert!(imports.typing.is_empty());
        assert!(imports.user.is_empty());
    }

    #[test]
    fn test_module_alias_shape() {
        assert_eq!(module_alias("my_app.models"), "_my_app_models");
        assert_eq!(module_alias("vendor"), "_vendor");
    }

    #[test]
    fn test_conflicting_names_alias_every_claimant() {
        let mut user = BTreeSet::new();
        user.insert(("app_a.models".to_string(), "User".to_string()));
        user.insert(("app_b.models".to_string(), "User".to_string()));
        user.insert(("app_a.models".to_string(), "Order".to_string()));
        user.insert(("shared".to_string(), "Token".to_string()));

        let aliases = build_module_aliases(&user);
        assert_eq!(aliases.get("app_a.models").map(String::as_str), Some("_app_a_models"));
        assert_eq!(aliases.get("app_b.models").map(String::as_str), Some("_app_b_models"));
        assert!(!aliases.contains_key("shared"));
    }

    #[test]
    fn test_no_conflicts_no_aliases() {
        let mut user = BTreeSet::new();
        user.insert(("app_a.models".to_string(), "User".to_string()));
        user.insert(("app_b.models".to_string(), "Order".to_string()));
        assert!(build_module_aliases(&user).is_empty());
    }
}
