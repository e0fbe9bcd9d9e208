//! Symbol kind
//!
//! Symbols cannot travel inside a description. The map option carries
//! label stand-ins; reconstruction substitutes real symbols from the
//! caller-supplied table, keyed by map entry, and falls back to the
//! stand-in value for labels the table does not cover.

use serde_json::Value;

use crate::description::Description;
use crate::deserialize::{Context, DeserializeError, DeserializeResult};
use crate::schema::{Schema, SymbolTarget};

use super::{expect_array, HandlerTable, Kind};

pub(super) const KIND: Kind = Kind {
    name: "symbol",
    inherits: Some("any"),
    create: |_, _| Ok(Schema::symbol()),
    rules: &[],
    flags: &[],
    options: OPTIONS,
};

const OPTIONS: HandlerTable = &[("map", map)];

/// Reattached only when the allowOnly flag marks the map as the schema's
/// exclusive value set.
fn map(
    schema: Schema,
    arg: &Value,
    desc: &Description,
    ctx: &Context,
) -> DeserializeResult<Schema> {
    if !desc.flag_is_true("allowOnly") {
        return Ok(schema);
    }

    let mut entries = Vec::new();
    for pair in expect_array(arg, "map")? {
        let pair = pair
            .as_array()
            .filter(|pair| pair.len() == 2)
            .ok_or_else(|| DeserializeError::InvalidArgument {
                name: "map".to_string(),
                expected: "[key, value] pairs",
            })?;
        let key = pair[0].clone();
        let target = key
            .as_str()
            .and_then(|label| ctx.options().symbol(label))
            .map(|symbol| SymbolTarget::Symbol(symbol.clone()))
            .unwrap_or_else(|| SymbolTarget::Value(pair[1].clone()));
        entries.push((key, target));
    }
    Ok(schema.map(entries))
}
