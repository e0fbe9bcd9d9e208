//! Base kind: handlers every other kind inherits

use serde_json::Value;

use crate::description::Description;
use crate::deserialize::{Context, DeserializeError, DeserializeResult};
use crate::schema::{Presence, Schema};

use super::{enabled, expect_array, expect_object, expect_str, noop, HandlerTable, Kind};

pub(super) const KIND: Kind = Kind {
    name: "any",
    inherits: None,
    create,
    rules: RULES,
    flags: FLAGS,
    options: OPTIONS,
};

const RULES: HandlerTable = &[];

const FLAGS: HandlerTable = &[
    // Marker read by the valids option, nothing to apply here.
    ("allowOnly", noop),
    ("presence", presence),
    ("default", default_value),
    ("raw", raw),
    ("strip", strip),
    ("error", error),
    ("empty", empty),
];

const OPTIONS: HandlerTable = &[
    ("valids", valids),
    ("invalids", invalids),
    ("description", description),
    ("notes", notes),
    ("tags", tags),
    ("meta", meta),
    ("examples", examples),
    ("unit", unit),
    ("label", label),
    ("options", options_bag),
];

fn create(_desc: &Description, _ctx: &Context) -> DeserializeResult<Schema> {
    Ok(Schema::any())
}

fn presence(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    let mode = arg
        .as_str()
        .and_then(Presence::parse)
        .ok_or_else(|| DeserializeError::UnknownPresence(arg.to_string()))?;
    Ok(schema.presence(mode))
}

fn default_value(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.default_value(arg.clone()))
}

fn raw(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.raw(enabled(arg)))
}

fn strip(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.strip(enabled(arg)))
}

fn error(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.error(arg.clone()))
}

fn empty(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.empty(ctx.recurse(arg)?))
}

/// Exclusive enumeration when `allowOnly` is set, open allow-list
/// otherwise. The marker is read off the description, not off any
/// previously applied flag state.
fn valids(
    schema: Schema,
    arg: &Value,
    desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    let values = expect_array(arg, "valids")?.iter().cloned();
    if desc.flag_is_true("allowOnly") {
        Ok(schema.valid(values))
    } else {
        Ok(schema.allow(values))
    }
}

fn invalids(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.invalid(expect_array(arg, "invalids")?.iter().cloned()))
}

fn description(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.description(expect_str(arg, "description")?))
}

fn notes(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.notes(arg.clone()))
}

fn tags(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.tags(arg.clone()))
}

fn meta(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.meta(arg.clone()))
}

fn examples(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    let mut schema = schema;
    for entry in expect_array(arg, "examples")? {
        let value = entry
            .get("value")
            .ok_or_else(|| DeserializeError::InvalidArgument {
                name: "examples".to_string(),
                expected: "entries with a 'value' field",
            })?;
        schema = schema.example(value.clone(), entry.get("options").cloned());
    }
    Ok(schema)
}

fn unit(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.unit(expect_str(arg, "unit")?))
}

fn label(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.label(expect_str(arg, "label")?))
}

fn options_bag(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    expect_object(arg, "options")?;
    Ok(schema.options(arg.clone()))
}
