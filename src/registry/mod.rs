//! Type registry and handler resolution
//!
//! Every schema kind is a static [`Kind`]: a constructor, an optional
//! parent kind, and three name-keyed handler tables. Lookup walks the
//! single-inheritance chain rooted at `any`, so a kind-specific handler
//! overrides the base one by name collision. The tables are plain statics
//! of `fn` values; string-keyed dispatch stays confined to this boundary.

mod alternatives;
mod any;
mod array;
mod object;
mod primitive;
mod symbol;

use std::fmt;

use serde_json::{Map, Value};

use crate::description::Description;
use crate::deserialize::{Context, DeserializeError, DeserializeResult};
use crate::schema::Schema;

/// Handler categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Rule,
    Flag,
    Option,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Rule => "rule",
            Category::Flag => "flag",
            Category::Option => "option",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind constructors receive the full description, so a constructor may
/// branch on fields outside its own namespace (the object/function split).
pub type CreateFn = fn(&Description, &Context) -> DeserializeResult<Schema>;

/// Signature shared by rule, flag, and option handlers: a pure
/// schema-to-schema transform given the argument, the whole description,
/// and the recursion context.
pub type HandlerFn = fn(Schema, &Value, &Description, &Context) -> DeserializeResult<Schema>;

/// Name-keyed handler table; small enough that linear scan beats a map.
pub type HandlerTable = &'static [(&'static str, HandlerFn)];

/// One schema kind: constructor, parent, and handler tables.
pub struct Kind {
    pub name: &'static str,
    pub inherits: Option<&'static str>,
    pub create: CreateFn,
    pub rules: HandlerTable,
    pub flags: HandlerTable,
    pub options: HandlerTable,
}

/// All built-in kinds. Fixed at build time, never mutated.
static KINDS: &[Kind] = &[
    any::KIND,
    primitive::STRING,
    primitive::BOOLEAN,
    primitive::NUMBER,
    primitive::BINARY,
    primitive::DATE,
    object::KIND,
    array::KIND,
    symbol::KIND,
    alternatives::KIND,
];

/// Looks up a kind by name.
pub fn kind(name: &str) -> Option<&'static Kind> {
    KINDS.iter().find(|kind| kind.name == name)
}

/// Resolves a handler by walking the inheritance chain.
///
/// Fails once the chain (rooted at `any`, which has no parent) is
/// exhausted without a match.
pub fn resolve(
    start: &'static Kind,
    category: Category,
    name: &str,
) -> DeserializeResult<HandlerFn> {
    let mut current = Some(start);
    while let Some(step) = current {
        let table = match category {
            Category::Rule => step.rules,
            Category::Flag => step.flags,
            Category::Option => step.options,
        };
        if let Some((_, handler)) = table.iter().find(|(entry, _)| *entry == name) {
            return Ok(*handler);
        }
        current = step.inherits.and_then(kind);
    }
    Err(DeserializeError::NoHandler {
        category: category.as_str(),
        kind: start.name,
        name: name.to_string(),
    })
}

// Helpers shared by the kind modules.

/// Flag handler for markers consumed elsewhere (create, sibling rules,
/// or the option that reads them straight off the description).
pub(crate) fn noop(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema)
}

pub(crate) fn expect_array<'a>(arg: &'a Value, name: &str) -> DeserializeResult<&'a Vec<Value>> {
    arg.as_array()
        .ok_or_else(|| DeserializeError::InvalidArgument {
            name: name.to_string(),
            expected: "an array",
        })
}

pub(crate) fn expect_object<'a>(
    arg: &'a Value,
    name: &str,
) -> DeserializeResult<&'a Map<String, Value>> {
    arg.as_object()
        .ok_or_else(|| DeserializeError::InvalidArgument {
            name: name.to_string(),
            expected: "an object",
        })
}

pub(crate) fn expect_str<'a>(arg: &'a Value, name: &str) -> DeserializeResult<&'a str> {
    arg.as_str().ok_or_else(|| DeserializeError::InvalidArgument {
        name: name.to_string(),
        expected: "a string",
    })
}

/// Verbatim pass-through for arguments that may be absent.
pub(crate) fn optional(arg: &Value) -> Option<Value> {
    if arg.is_null() {
        None
    } else {
        Some(arg.clone())
    }
}

/// Boolean toggle arguments; a bare marker counts as enabled.
pub(crate) fn enabled(arg: &Value) -> bool {
    arg.as_bool().unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deserialize::DeserializeOptions;

    #[test]
    fn test_every_kind_is_registered() {
        for name in [
            "any",
            "string",
            "boolean",
            "number",
            "binary",
            "date",
            "object",
            "array",
            "symbol",
            "alternatives",
        ] {
            let kind = kind(name).unwrap();
            assert_eq!(kind.name, name);
        }
        assert!(kind("bogus").is_none());
    }

    #[test]
    fn test_only_any_is_a_root() {
        for entry in KINDS {
            if entry.name == "any" {
                assert!(entry.inherits.is_none());
            } else {
                assert_eq!(entry.inherits, Some("any"));
            }
        }
    }

    #[test]
    fn test_resolution_falls_back_to_any() {
        let string = kind("string").unwrap();
        // `label` only exists at the base level.
        assert!(resolve(string, Category::Option, "label").is_ok());
    }

    #[test]
    fn test_kind_level_override_wins() {
        let opts = DeserializeOptions::default();
        let ctx = Context::root(&opts);
        let string = kind("string").unwrap();
        let desc = Description::new("string");

        // The string-level trim flag is a no-op; the base table has no
        // trim entry at all, so resolution must stop at the string level.
        let handler = resolve(string, Category::Flag, "trim").unwrap();
        let schema = Schema::string();
        let out = handler(schema.clone(), &Value::Bool(true), &desc, &ctx).unwrap();
        assert_eq!(out, schema);
    }

    #[test]
    fn test_exhausted_chain_is_an_error() {
        let string = kind("string").unwrap();
        let err = resolve(string, Category::Rule, "bogus").unwrap_err();
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
}
