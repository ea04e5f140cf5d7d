//! Dual-file code generation for MongoDB field path types.
//!
//! The pipeline per generation run:
//! 1. Introspect: every root model's field paths and path -> type map
//! 2. Imports: one whole-registry pre-pass computing the finalized alias map
//! 3. Render: type descriptors -> Python type AST -> source text
//! 4. Emit: interleave runtime and stub sections model by model
//!
//! Both output texts are fully built in memory before anything touches the
//! filesystem, so a failing run commits nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use typed_mongo_schema::{ModelDescriptor, Registry, TypeDescriptor};

pub mod emit;
pub mod imports;
pub mod render;
pub mod types;

pub use emit::Emit;
pub use imports::{build_module_aliases, module_alias, ImportSet, ModuleAliases};
pub use render::{render_query_value, render_type, RenderContext, RenderPolicy};

use crate::error::GenerateError;
use crate::introspect::{collect_field_path_types, collect_field_paths};

/// Header shared by both generated files.
const HEADER: &str = r#""""Auto-generated MongoDB field path types.

Do not edit manually. Regenerate with:
    typed-mongo-gen <sources> --output <output>
"""

"#;

/// Import lines fixed by the collaborator interface: the generic collection
/// wrapper and the async database handle the accessors are bound to.
const DATABASE_IMPORT: &str = "from pymongo.asynchronous.database import AsyncDatabase\n";
const COLLECTION_IMPORT: &str = "from typed_mongo import TypedCollection\n";
const OPERATOR_IMPORT: &str = "from typed_mongo.operators import Op\n";

/// The free-form mapping source text that is exempt from operator wrapping.
const FREEFORM_DICT: &str = "dict[str, Any]";

/// The two generated artifacts of one run. Same models, same paths,
/// different fidelity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPair {
    /// Untyped runtime module (`.py`): placeholders plus collection classes.
    pub runtime: String,
    /// Fully typed stub module (`.pyi`) for static checking only.
    pub stub: String,
}

/// Generate both output texts for every collection-rooted model in the
/// registry, in registry iteration order.
pub fn generate(registry: &Registry, policy: RenderPolicy) -> Result<GeneratedPair, GenerateError> {
    let roots: Vec<&ModelDescriptor> = registry.roots().collect();
    if roots.is_empty() {
        return Err(GenerateError::EmptyRegistry);
    }
    debug!(models = roots.len(), "Generating field path types.");

    // Pre-pass: typed walks and the whole-registry import set, so every
    // per-model section can assume a finalized alias map.
    let mut import_set = ImportSet::new();
    let mut model_imports: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut walked = Vec::with_capacity(roots.len());
    for model in roots {
        let path_types = collect_field_path_types(registry, model);
        for ty in path_types.values() {
            import_set.collect(ty, registry);
        }
        import_set
            .user
            .insert((model.module.clone(), model.name.clone()));
        model_imports
            .entry(model.module.clone())
            .or_default()
            .insert(model.name.clone());
        walked.push((model, path_types));
    }
    let module_aliases = build_module_aliases(&import_set.user);
    let ctx = RenderContext {
        registry,
        module_aliases: &module_aliases,
        policy,
    };

    let mut runtime = String::new();
    let mut stub = String::new();
    write_headers(&mut runtime, &mut stub, &import_set, &model_imports, &module_aliases);
    for (model, path_types) in &walked {
        write_model(&mut runtime, &mut stub, registry, model, path_types, &ctx)?;
    }

    Ok(GeneratedPair { runtime, stub })
}

/// The stub path companion to a runtime path.
pub fn stub_path(runtime_path: &Path) -> PathBuf {
    runtime_path.with_extension("pyi")
}

/// Write both files of a generated pair, creating parent directories.
///
/// The runtime file is written first; a failure aborts before the stub is
/// touched, so no pair where the stub is newer than the runtime can appear.
pub fn write_outputs(pair: &GeneratedPair, runtime_path: &Path) -> Result<(), GenerateError> {
    let stub_path = stub_path(runtime_path);
    if let Some(parent) = runtime_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| GenerateError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(runtime_path, &pair.runtime).map_err(|source| GenerateError::Io {
        path: runtime_path.to_path_buf(),
        source,
    })?;
    fs::write(&stub_path, &pair.stub).map_err(|source| GenerateError::Io {
        path: stub_path.clone(),
        source,
    })?;
    info!(
        runtime = %runtime_path.display(),
        stub = %stub_path.display(),
        "Generated field path types."
    );
    Ok(())
}

/// Write headers and import blocks to both texts.
fn write_headers(
    runtime: &mut String,
    stub: &mut String,
    import_set: &ImportSet,
    model_imports: &BTreeMap<String, BTreeSet<String>>,
    module_aliases: &ModuleAliases,
) {
    // Runtime: minimal header — collection wrapper plus direct root model
    // class imports, bare names by design (see DESIGN.md).
    runtime.push_str(HEADER);
    runtime.push_str("from typing import Any\n");
    runtime.push_str(DATABASE_IMPORT);
    runtime.push_str(COLLECTION_IMPORT);
    for (module, names) in model_imports {
        let joined = names.iter().cloned().collect::<Vec<_>>().join(", ");
        runtime.push_str(&format!("from {module} import {joined}\n"));
    }
    runtime.push('\n');

    // Stub: full header.
    stub.push_str(HEADER);
    stub.push_str("# ruff: noqa: E501\n\n");

    let mut typing_names = import_set.typing.clone();
    typing_names.insert("Any".to_string());
    typing_names.insert("Literal".to_string());
    typing_names.insert("TypedDict".to_string());
    let joined = typing_names.into_iter().collect::<Vec<_>>().join(", ");
    stub.push_str(&format!("from typing import {joined}\n"));

    // Direct from-imports for non-conflicting modules.
    let mut direct: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (module, name) in &import_set.user {
        if !module_aliases.contains_key(module) {
            direct.entry(module).or_default().insert(name);
        }
    }
    for (module, names) in direct {
        let joined = names.into_iter().collect::<Vec<_>>().join(", ");
        stub.push_str(&format!("from {module} import {joined}\n"));
    }

    // Aliased imports for conflicting modules.
    for (module, alias) in module_aliases {
        stub.push_str(&format!("import {module} as {alias}\n"));
    }

    stub.push_str(DATABASE_IMPORT);
    stub.push_str(COLLECTION_IMPORT);
    stub.push_str(OPERATOR_IMPORT);
    stub.push('\n');
}

/// Write one model's runtime and stub sections.
fn write_model(
    runtime: &mut String,
    stub: &mut String,
    registry: &Registry,
    model: &ModelDescriptor,
    path_types: &indexmap::IndexMap<String, &TypeDescriptor>,
    ctx: &RenderContext<'_>,
) -> Result<(), GenerateError> {
    let name = &model.name;

    // Runtime: opaque placeholders plus the delegating collection class.
    runtime.push_str(&format!("# {name}\n"));
    runtime.push_str(&format!("type {name}Path = str\n"));
    runtime.push_str(&format!("{name}Query = dict[str, Any]\n"));
    runtime.push_str(&format!("{name}Fields = dict[str, Any]\n\n"));
    runtime.push_str(&format!("class {name}Collection(TypedCollection):\n"));
    runtime.push_str("    def __init__(self, db: AsyncDatabase[dict[str, Any]]) -> None:\n");
    runtime.push_str(&format!(
        "        super().__init__({name}, {name}.get_collection(db))\n\n\n"
    ));

    // Stub: closed path enumeration, sorted.
    let paths = collect_field_paths(registry, model);
    stub.push_str(&format!("type {name}Path = Literal[\n"));
    for path in &paths {
        stub.push_str(&format!("    \"{path}\",\n"));
    }
    stub.push_str("]\n\n");

    let mut sorted_paths: Vec<&String> = path_types.keys().collect();
    sorted_paths.sort();

    // Query shape: operator-wrapped values, except free-form mappings, plus
    // the whole-document predicate escape.
    stub.push_str(&format!("{name}Query = TypedDict(\"{name}Query\", {{\n"));
    for path in &sorted_paths {
        let rendered = render_source(path_types[*path], model, path, ctx, render_type)?;
        if rendered == FREEFORM_DICT {
            stub.push_str(&format!("    \"{path}\": {rendered},\n"));
        } else {
            let query = render_source(path_types[*path], model, path, ctx, render_query_value)?;
            stub.push_str(&format!("    \"{path}\": Op[{query}],\n"));
        }
    }
    stub.push_str(&format!("    \"$expr\": {FREEFORM_DICT},\n"));
    stub.push_str("}, total=False)\n\n");

    // Fields shape: exact types, for typed partial-update payloads.
    stub.push_str(&format!("{name}Fields = TypedDict(\"{name}Fields\", {{\n"));
    for path in &sorted_paths {
        let rendered = render_source(path_types[*path], model, path, ctx, render_type)?;
        stub.push_str(&format!("    \"{path}\": {rendered},\n"));
    }
    stub.push_str("}, total=False)\n\n");

    // Collection class, parameterized by the model and all three shapes.
    let model_ref = ctx.named(&model.module, name).emit();
    stub.push_str(&format!(
        "class {name}Collection(TypedCollection[{model_ref}, {name}Path, {name}Query, {name}Fields]):\n"
    ));
    stub.push_str("    def __init__(self, db: AsyncDatabase[dict[str, Any]]) -> None: ...\n\n\n");

    Ok(())
}

/// Render with one of the two modes, attaching model/path context to strict
/// failures.
fn render_source(
    ty: &TypeDescriptor,
    model: &ModelDescriptor,
    path: &str,
    ctx: &RenderContext<'_>,
    mode: fn(&TypeDescriptor, &RenderContext<'_>) -> Result<types::PyType, String>,
) -> Result<String, GenerateError> {
    let rendered = mode(ty, ctx).map_err(|reason| GenerateError::UnrenderableType {
        model: model.name.clone(),
        path: path.to_string(),
        reason,
    })?;
    Ok(rendered.emit())
}
