//! Alternatives kind

use serde_json::Value;

use crate::description::Description;
use crate::deserialize::{Context, DeserializeResult};
use crate::schema::Schema;

use super::{expect_array, HandlerTable, Kind};

pub(super) const KIND: Kind = Kind {
    name: "alternatives",
    inherits: Some("any"),
    create: |_, _| Ok(Schema::alternatives()),
    rules: &[],
    flags: &[],
    options: OPTIONS,
};

const OPTIONS: HandlerTable = &[("alternatives", candidates)];

/// An empty candidate list leaves the schema unconstrained.
fn candidates(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    ctx: &Context,
) -> DeserializeResult<Schema> {
    let entries = expect_array(arg, "alternatives")?;
    if entries.is_empty() {
        return Ok(schema);
    }
    let schemas = entries
        .iter()
        .map(|entry| ctx.recurse(entry))
        .collect::<DeserializeResult<Vec<_>>>()?;
    Ok(schema.matches(schemas))
}
