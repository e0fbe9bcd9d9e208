//! Array kind

use serde_json::Value;

use crate::description::Description;
use crate::deserialize::{Context, DeserializeResult};
use crate::schema::Schema;

use super::{enabled, expect_array, HandlerTable, Kind};

pub(super) const KIND: Kind = Kind {
    name: "array",
    inherits: Some("any"),
    create: |_, _| Ok(Schema::array()),
    rules: RULES,
    flags: FLAGS,
    options: OPTIONS,
};

const RULES: HandlerTable = &[
    ("min", super::primitive::rule_min),
    ("max", super::primitive::rule_max),
    ("length", super::primitive::rule_length),
    ("unique", unique),
];

const FLAGS: HandlerTable = &[("sparse", sparse), ("single", single)];

const OPTIONS: HandlerTable = &[("items", items), ("orderedItems", ordered_items)];

fn items(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    ctx: &Context,
) -> DeserializeResult<Schema> {
    let schemas = expect_array(arg, "items")?
        .iter()
        .map(|item| ctx.recurse(item))
        .collect::<DeserializeResult<Vec<_>>>()?;
    Ok(schema.items(schemas))
}

fn ordered_items(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    ctx: &Context,
) -> DeserializeResult<Schema> {
    let schemas = expect_array(arg, "orderedItems")?
        .iter()
        .map(|item| ctx.recurse(item))
        .collect::<DeserializeResult<Vec<_>>>()?;
    Ok(schema.ordered(schemas))
}

/// The one argument doubles as comparator path source and options bag in
/// the original call shape; it is replayed verbatim rather than split.
fn unique(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.unique(arg.clone()))
}

fn sparse(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.sparse(enabled(arg)))
}

fn single(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.single(enabled(arg)))
}
