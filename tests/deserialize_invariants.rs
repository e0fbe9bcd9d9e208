//! Deserialization invariant tests
//!
//! Failure modes, dispatch semantics, and application ordering of the
//! reconstruction driver:
//! - Unknown kinds, rules, flags, and options are rejected
//! - Rule application preserves the given order exactly
//! - Flags apply strictly after rules
//! - The object/function split happens at creation time
//! - Symbol maps substitute from the caller-supplied table
//! - Nesting past the ceiling fails fast

use schemaport::{
    deserialize, serialize, DeserializeError, DeserializeOptions, Description, Schema, Symbol,
};
use schemaport::schema::{FlagValue, SymbolTarget};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn desc(value: Value) -> Description {
    serde_json::from_value(value).unwrap()
}

fn rebuild(value: Value) -> Result<Schema, DeserializeError> {
    deserialize(&desc(value), &DeserializeOptions::default())
}

// =============================================================================
// Rejection Tests
// =============================================================================

#[test]
fn test_unknown_type_rejected() {
    let err = rebuild(json!({"type": "bogus"})).unwrap_err();
    assert!(matches!(err, DeserializeError::UnknownType(name) if name == "bogus"));
}

#[test]
fn test_unknown_rule_rejected() {
    let err = rebuild(json!({
        "type": "string",
        "rules": [{"name": "bogus", "arg": 1}]
    }))
    .unwrap_err();
    match err {
        DeserializeError::NoHandler {
            category,
            kind,
            name,
        } => {
            assert_eq!(category, "rule");
            assert_eq!(kind, "string");
            assert_eq!(name, "bogus");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_flag_rejected() {
    let err = rebuild(json!({"type": "number", "flags": {"sideways": true}})).unwrap_err();
    assert!(matches!(
        err,
        DeserializeError::NoHandler { category: "flag", .. }
    ));
}

#[test]
fn test_unknown_option_rejected() {
    let err = rebuild(json!({"type": "any", "bogus": 1})).unwrap_err();
    assert!(matches!(
        err,
        DeserializeError::NoHandler { category: "option", .. }
    ));
}

#[test]
fn test_kind_specific_rule_does_not_leak_across_kinds() {
    // `integer` belongs to number; string resolution must exhaust the
    // chain and fail.
    let err = rebuild(json!({
        "type": "string",
        "rules": [{"name": "integer"}]
    }))
    .unwrap_err();
    assert!(matches!(err, DeserializeError::NoHandler { .. }));
}

#[test]
fn test_unknown_presence_rejected() {
    let err = rebuild(json!({"type": "any", "flags": {"presence": "sometimes"}})).unwrap_err();
    assert!(matches!(err, DeserializeError::UnknownPresence(_)));
}

#[test]
fn test_unknown_dependency_relation_rejected() {
    let err = rebuild(json!({
        "type": "object",
        "dependencies": [{"type": "unless", "peers": ["a", "b"]}]
    }))
    .unwrap_err();
    assert!(matches!(err, DeserializeError::UnknownRelation(name) if name == "unless"));
}

#[test]
fn test_malformed_regex_literal_rejected() {
    let err = rebuild(json!({
        "type": "object",
        "patterns": [{"regex": "no-slashes", "rule": {"type": "string"}}]
    }))
    .unwrap_err();
    assert!(matches!(err, DeserializeError::Pattern(_)));
}

#[test]
fn test_invalid_date_bound_rejected() {
    let err = rebuild(json!({
        "type": "date",
        "rules": [{"name": "min", "arg": "yesterday-ish"}]
    }))
    .unwrap_err();
    assert!(matches!(err, DeserializeError::InvalidDate { .. }));
}

#[test]
fn test_unknown_timestamp_unit_rejected() {
    let err = rebuild(json!({"type": "date", "flags": {"timestamp": "martian"}})).unwrap_err();
    assert!(matches!(err, DeserializeError::InvalidArgument { .. }));
}

#[test]
fn test_malformed_nested_description_rejected() {
    // Children must themselves parse as descriptions.
    let err = rebuild(json!({
        "type": "object",
        "children": {"a": {"no_type_field": true}}
    }))
    .unwrap_err();
    assert!(matches!(err, DeserializeError::InvalidDescription(_)));
}

// =============================================================================
// Ordering Tests
// =============================================================================

#[test]
fn test_rule_order_is_preserved_exactly() {
    let forward = rebuild(json!({
        "type": "string",
        "rules": [{"name": "min", "arg": 2}, {"name": "max", "arg": 8}]
    }))
    .unwrap();
    let reverse = rebuild(json!({
        "type": "string",
        "rules": [{"name": "max", "arg": 8}, {"name": "min", "arg": 2}]
    }))
    .unwrap();

    // The rebuilt schema records one entry per handler invocation, so the
    // recorded sequence is the observed call order.
    let forward_names: Vec<&str> = forward.rules().iter().map(|rule| rule.name).collect();
    let reverse_names: Vec<&str> = reverse.rules().iter().map(|rule| rule.name).collect();
    assert_eq!(forward_names, vec!["min", "max"]);
    assert_eq!(reverse_names, vec!["max", "min"]);

    // Order survives introspection too.
    let rules = serialize(&forward).rules.unwrap();
    assert_eq!(rules[0].name, "min");
    assert_eq!(rules[1].name, "max");
}

#[test]
fn test_flags_apply_after_rules() {
    // The trim flag is a no-op because the trim rule has already
    // reapplied the transform. If flags ran first, a real handler would
    // have to exist and the recorded value could be clobbered; applying
    // strictly after rules leaves the rule's record in place.
    let schema = rebuild(json!({
        "type": "string",
        "rules": [{"name": "trim", "arg": true}],
        "flags": {"trim": false}
    }))
    .unwrap();

    assert_eq!(schema.rules()[0].name, "trim");
    assert_eq!(
        schema.flag("trim").and_then(FlagValue::as_json),
        Some(&json!(true))
    );
}

#[test]
fn test_option_fields_apply_in_description_order() {
    let schema = rebuild(json!({
        "type": "any",
        "label": "first",
        "unit": "second"
    }))
    .unwrap();
    let described = serialize(&schema);
    assert_eq!(described.options.get("label"), Some(&json!("first")));
    assert_eq!(described.options.get("unit"), Some(&json!("second")));
}

// =============================================================================
// No-op Flag Resolution Tests
// =============================================================================

#[test]
fn test_informational_flags_still_resolve() {
    // case, byteAligned, trim, and normalize are echoes of rules; they
    // must resolve to no-ops, never to a missing-handler failure.
    let schema = rebuild(json!({
        "type": "string",
        "rules": [
            {"name": "lowercase"},
            {"name": "hex"},
            {"name": "trim", "arg": true},
            {"name": "normalize", "arg": "NFC"}
        ],
        "flags": {
            "case": "lower",
            "byteAligned": true,
            "trim": true,
            "normalize": "NFC"
        }
    }))
    .unwrap();

    let names: Vec<&str> = schema.rules().iter().map(|rule| rule.name).collect();
    assert_eq!(names, vec!["lowercase", "hex", "trim", "normalize"]);
}

#[test]
fn test_precision_flag_superseded_by_rule() {
    let schema = rebuild(json!({
        "type": "number",
        "rules": [{"name": "precision", "arg": 2}],
        "flags": {"precision": 2}
    }))
    .unwrap();
    assert_eq!(
        schema.flag("precision").and_then(FlagValue::as_json),
        Some(&json!(2))
    );
}

// =============================================================================
// Object/Function Branching Tests
// =============================================================================

#[test]
fn test_func_flag_branches_at_creation() {
    let schema = rebuild(json!({"type": "object", "flags": {"func": true}})).unwrap();
    assert!(schema.is_func());

    let described = serialize(&schema);
    assert_eq!(described.kind, "object");
    assert!(described.flag_is_true("func"));
}

#[test]
fn test_plain_object_is_not_func() {
    let schema = rebuild(json!({"type": "object"})).unwrap();
    assert!(!schema.is_func());
    assert!(serialize(&schema).flag("func").is_none());
}

#[test]
fn test_hex_reads_flag_bag_not_applied_state() {
    let schema = rebuild(json!({
        "type": "string",
        "rules": [{"name": "hex"}],
        "flags": {"byteAligned": true}
    }))
    .unwrap();
    // The rule ran before any flag was applied, yet it saw byteAligned.
    assert!(serialize(&schema).flag_is_true("byteAligned"));
}

// =============================================================================
// Symbol Substitution Tests
// =============================================================================

#[test]
fn test_symbol_map_substitutes_from_table() {
    let sym_a = Symbol::new("sym-a");
    let opts = DeserializeOptions::with_symbols([("a".to_string(), sym_a.clone())].into());

    let schema = deserialize(
        &desc(json!({
            "type": "symbol",
            "flags": {"allowOnly": true},
            "map": [["a", "sym-a"]]
        })),
        &opts,
    )
    .unwrap();

    let map = schema.symbol_map().unwrap();
    assert_eq!(map[0].0, json!("a"));
    assert_eq!(map[0].1, SymbolTarget::Symbol(sym_a));
}

#[test]
fn test_symbol_map_falls_back_without_table() {
    let schema = rebuild(json!({
        "type": "symbol",
        "flags": {"allowOnly": true},
        "map": [["a", "sym-a"]]
    }))
    .unwrap();

    let map = schema.symbol_map().unwrap();
    assert_eq!(map[0].1, SymbolTarget::Value(json!("sym-a")));
}

#[test]
fn test_symbol_map_ignored_without_allow_only() {
    let schema = rebuild(json!({
        "type": "symbol",
        "map": [["a", "sym-a"]]
    }))
    .unwrap();
    assert!(schema.symbol_map().unwrap().is_empty());
}

#[test]
fn test_symbol_table_misses_fall_back_per_entry() {
    let sym_a = Symbol::new("sym-a");
    let opts = DeserializeOptions::with_symbols([("a".to_string(), sym_a.clone())].into());

    let schema = deserialize(
        &desc(json!({
            "type": "symbol",
            "flags": {"allowOnly": true},
            "map": [["a", "sym-a"], ["b", "sym-b"]]
        })),
        &opts,
    )
    .unwrap();

    let map = schema.symbol_map().unwrap();
    assert_eq!(map[0].1, SymbolTarget::Symbol(sym_a));
    assert_eq!(map[1].1, SymbolTarget::Value(json!("sym-b")));
}

// =============================================================================
// Recursion Tests
// =============================================================================

#[test]
fn test_nested_reconstruction_forwards_context() {
    let sym = Symbol::new("inner");
    let opts = DeserializeOptions::with_symbols([("k".to_string(), sym.clone())].into());

    // The symbol table must reach a symbol schema nested inside an object.
    let schema = deserialize(
        &desc(json!({
            "type": "object",
            "children": {
                "id": {
                    "type": "symbol",
                    "flags": {"allowOnly": true},
                    "map": [["k", "inner"]]
                }
            }
        })),
        &opts,
    )
    .unwrap();

    let described = serialize(&schema);
    let child = described.options["children"]["id"].clone();
    assert_eq!(child["map"], json!([["k", "inner"]]));
}

#[test]
fn test_depth_ceiling_rejected() {
    let mut nested = json!({"type": "string"});
    for _ in 0..80 {
        nested = json!({
            "type": "array",
            "items": [nested]
        });
    }
    let err = rebuild(nested).unwrap_err();
    assert!(matches!(err, DeserializeError::DepthExceeded(_)));
}

#[test]
fn test_realistic_nesting_accepted() {
    let mut nested = json!({"type": "string"});
    for _ in 0..10 {
        nested = json!({"type": "array", "items": [nested]});
    }
    assert!(rebuild(nested).is_ok());
}
