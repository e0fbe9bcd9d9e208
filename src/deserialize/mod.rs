//! Deserialization driver
//!
//! Reconstruction is a fold over the description: resolve the kind,
//! construct, then apply option fields (in description order), rules (in
//! given order), and finally flags. Handlers are pure schema-to-schema
//! transforms; the driver threads the latest value forward and recurses
//! into nested descriptions with the caller's context unchanged.

mod errors;

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace};

pub use errors::{DeserializeError, DeserializeResult};

use crate::description::Description;
use crate::registry::{self, Category};
use crate::schema::{Schema, Symbol};

/// Hard ceiling on description nesting. Well-formed descriptions are
/// acyclic, so this only trips on malformed or pathological input.
pub const MAX_DEPTH: usize = 64;

const NULL: Value = Value::Null;

/// Caller-supplied auxiliary context, forwarded unchanged through every
/// recursive call.
#[derive(Debug, Clone, Default)]
pub struct DeserializeOptions {
    /// Out-of-band symbol values keyed by map entry label
    pub symbols: Option<HashMap<String, Symbol>>,
}

impl DeserializeOptions {
    /// Context carrying a symbol table.
    pub fn with_symbols(symbols: HashMap<String, Symbol>) -> Self {
        Self {
            symbols: Some(symbols),
        }
    }

    /// Looks up a symbol by label.
    pub fn symbol(&self, label: &str) -> Option<&Symbol> {
        self.symbols.as_ref().and_then(|table| table.get(label))
    }
}

/// Recursion context handed to every handler.
pub struct Context<'a> {
    opts: &'a DeserializeOptions,
    depth: usize,
}

impl<'a> Context<'a> {
    pub(crate) fn root(opts: &'a DeserializeOptions) -> Self {
        Self { opts, depth: 0 }
    }

    /// The caller-supplied context.
    pub fn options(&self) -> &DeserializeOptions {
        self.opts
    }

    /// Reconstructs a nested description value one level deeper.
    pub fn recurse(&self, value: &Value) -> DeserializeResult<Schema> {
        let desc = Description::from_value(value)?;
        deserialize_at(&desc, self.opts, self.depth + 1)
    }
}

/// Introspects a live schema into its portable description.
pub fn serialize(schema: &Schema) -> Description {
    schema.describe()
}

/// Reconstructs a live schema from its portable description.
pub fn deserialize(desc: &Description, opts: &DeserializeOptions) -> DeserializeResult<Schema> {
    deserialize_at(desc, opts, 0)
}

fn deserialize_at(
    desc: &Description,
    opts: &DeserializeOptions,
    depth: usize,
) -> DeserializeResult<Schema> {
    if depth > MAX_DEPTH {
        return Err(DeserializeError::DepthExceeded(MAX_DEPTH));
    }

    let kind = registry::kind(&desc.kind)
        .ok_or_else(|| DeserializeError::UnknownType(desc.kind.clone()))?;
    trace!(kind = kind.name, depth, "reconstructing schema");

    let ctx = Context { opts, depth };
    let mut schema = (kind.create)(desc, &ctx)?;

    for (name, value) in &desc.options {
        let handler = registry::resolve(kind, Category::Option, name)?;
        schema = handler(schema, value, desc, &ctx)?;
    }

    if let Some(rules) = &desc.rules {
        for rule in rules {
            let handler = registry::resolve(kind, Category::Rule, &rule.name)?;
            schema = handler(schema, rule.arg.as_ref().unwrap_or(&NULL), desc, &ctx)?;
        }
    }

    if let Some(flags) = &desc.flags {
        for (name, value) in flags {
            let handler = registry::resolve(kind, Category::Flag, name)?;
            schema = handler(schema, value, desc, &ctx)?;
        }
    }

    debug!(
        kind = kind.name,
        rules = schema.rules().len(),
        "schema reconstructed"
    );
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn desc(value: Value) -> Description {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_minimal_description() {
        let schema = deserialize(&desc(json!({"type": "string"})), &Default::default()).unwrap();
        assert_eq!(schema.kind_name(), "string");
        assert!(schema.rules().is_empty());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = deserialize(&desc(json!({"type": "bogus"})), &Default::default()).unwrap_err();
        assert!(matches!(err, DeserializeError::UnknownType(name) if name == "bogus"));
    }

    #[test]
    fn test_rule_without_arg_gets_null() {
        let schema = deserialize(
            &desc(json!({"type": "string", "rules": [{"name": "alphanum"}]})),
            &Default::default(),
        )
        .unwrap();
        assert_eq!(schema.rules()[0].name, "alphanum");
        assert_eq!(schema.rules()[0].arg, None);
    }

    #[test]
    fn test_depth_ceiling() {
        let mut nested = json!({"type": "any"});
        for _ in 0..(MAX_DEPTH + 2) {
            nested = json!({"type": "any", "flags": {"empty": nested}});
        }
        let err = deserialize(&desc(nested), &Default::default()).unwrap_err();
        assert!(matches!(err, DeserializeError::DepthExceeded(_)));
    }
}
