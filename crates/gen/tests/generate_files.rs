//! Integration test for the full declaration-to-files pipeline.
//!
//! Loads a JSON declaration from disk, generates both output texts, writes
//! them, and checks the written files against the expected shapes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;

use tempfile::TempDir;
use typed_mongo_gen::{generate, stub_path, write_outputs, RenderPolicy};
use typed_mongo_schema::load_registry;

const DECLARATION: &str = r##"{
  "module": "shop.models",
  "models": {
    "Order": {
      "collection": "orders",
      "fields": [
        { "name": "id", "serializationAlias": "_id", "type": { "type": "string" } },
        { "name": "status", "type": { "enum": ["open", "shipped"] } },
        { "name": "lines", "type": { "type": "array", "items": { "$ref": "#/models/OrderLine" } } },
        { "name": "meta", "type": { "type": "object" } }
      ]
    },
    "OrderLine": {
      "fields": [
        { "name": "sku", "type": { "type": "string" } },
        { "name": "quantity", "type": { "type": "integer" } }
      ]
    }
  }
}"##;

#[test]
fn test_generate_writes_runtime_and_stub() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let source = dir.path().join("orders.json");
    fs::write(&source, DECLARATION).expect("Failed to write declaration");

    let registry = load_registry(&[source]).expect("Failed to load registry");
    let pair = generate(&registry, RenderPolicy::Degrade).expect("Failed to generate");

    let runtime_path = dir.path().join("out").join("_generated_types.py");
    write_outputs(&pair, &runtime_path).expect("Failed to write outputs");

    let runtime = fs::read_to_string(&runtime_path).expect("Failed to read runtime file");
    let stub = fs::read_to_string(stub_path(&runtime_path)).expect("Failed to read stub file");

    // Both files open with the shared header.
    assert!(runtime.starts_with("\"\"\"Auto-generated MongoDB field path types."));
    assert!(stub.starts_with("\"\"\"Auto-generated MongoDB field path types."));

    // Runtime keeps every generated name importable with opaque types.
    assert!(runtime.contains("from shop.models import Order\n"));
    assert!(runtime.contains("type OrderPath = str\n"));
    assert!(runtime.contains("OrderQuery = dict[str, Any]\n"));
    assert!(runtime.contains("class OrderCollection(TypedCollection):\n"));
    assert!(runtime.contains("super().__init__(Order, Order.get_collection(db))\n"));
    // The embedded model gets no section.
    assert!(!runtime.contains("OrderLinePath"));

    // Stub enumerates nested paths through the embedded model, sorted.
    assert!(stub.contains(
        "type OrderPath = Literal[\n    \"_id\",\n    \"lines\",\n    \"lines.quantity\",\n    \"lines.sku\",\n    \"meta\",\n    \"status\",\n]\n"
    ));

    // Query shape: operator wrapping, list query unions, untouched free-form
    // mappings, and the whole-document escape.
    assert!(stub.contains("    \"_id\": Op[str],\n"));
    assert!(stub.contains("    \"status\": Op[Literal['open', 'shipped']],\n"));
    assert!(stub.contains("    \"lines\": Op[OrderLine | list[OrderLine]],\n"));
    assert!(stub.contains("    \"lines.quantity\": Op[int],\n"));
    assert!(stub.contains("    \"meta\": dict[str, Any],\n"));
    assert!(stub.contains("    \"$expr\": dict[str, Any],\n"));

    // Fields shape: exact types.
    assert!(stub.contains("    \"lines\": list[OrderLine],\n"));
    assert!(stub.contains("    \"status\": Literal['open', 'shipped'],\n"));

    // Imports and the parameterized collection class.
    assert!(stub.contains("from shop.models import Order, OrderLine\n"));
    assert!(stub.contains("from typed_mongo.operators import Op\n"));
    assert!(stub.contains(
        "class OrderCollection(TypedCollection[Order, OrderPath, OrderQuery, OrderFields]):\n"
    ));
}

#[test]
fn test_generate_from_multiple_sources() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let users = dir.path().join("users.json");
    let audits = dir.path().join("audits.json");
    fs::write(
        &users,
        r#"{
  "module": "app.users",
  "models": {
    "User": {
      "collection": "users",
      "fields": [ { "name": "email", "type": { "type": "string" } } ]
    }
  }
}"#,
    )
    .expect("Failed to write declaration");
    fs::write(
        &audits,
        r##"{
  "module": "app.audit",
  "models": {
    "AuditEntry": {
      "collection": "audit_entries",
      "fields": [ { "name": "actor", "type": { "$ref": "#/models/User" } } ]
    }
  }
}"##,
    )
    .expect("Failed to write declaration");

    let registry = load_registry(&[users, audits]).expect("Failed to load registry");
    let pair = generate(&registry, RenderPolicy::Degrade).expect("Failed to generate");

    // Cross-file model references resolve through the merged registry.
    assert!(pair.stub.contains("    \"actor\": Op[User],\n"));
    assert!(pair.stub.contains("    \"actor.email\": Op[str],\n"));
    assert!(pair.stub.contains("from app.users import User\n"));
    assert!(pair.stub.contains("type UserPath = Literal[\n"));
    assert!(pair.stub.contains("type AuditEntryPath = Literal[\n"));
}

#[test]
fn test_empty_declaration_is_refused() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let source = dir.path().join("empty.json");
    fs::write(&source, r#"{ "module": "app", "models": {} }"#).expect("Failed to write declaration");

    let registry = load_registry(&[source.clone()]).expect("Failed to load registry");
    let err = generate(&registry, RenderPolicy::Degrade).unwrap_err();
    assert!(err.to_string().contains("nothing to generate"));
}
