//! Object kind, including the function variant
//!
//! The function variant is a creation-time branch: `create` inspects the
//! `func` flag before construction, so the schema variant itself depends
//! on configuration that is otherwise applied after construction.

use serde_json::Value;

use crate::description::Description;
use crate::deserialize::{Context, DeserializeError, DeserializeResult};
use crate::pattern::Pattern;
use crate::schema::{Relation, Schema};

use super::{enabled, expect_array, expect_object, expect_str, noop, HandlerTable, Kind};

pub(super) const KIND: Kind = Kind {
    name: "object",
    inherits: Some("any"),
    create,
    rules: RULES,
    flags: FLAGS,
    options: OPTIONS,
};

const RULES: HandlerTable = &[
    ("min", super::primitive::rule_min),
    ("max", super::primitive::rule_max),
    ("length", super::primitive::rule_length),
    ("arity", arity),
    ("minArity", min_arity),
    ("maxArity", max_arity),
    ("class", class),
];

const FLAGS: HandlerTable = &[
    ("allowUnknown", allow_unknown),
    // Consumed by create; nothing left to apply.
    ("func", noop),
];

const OPTIONS: HandlerTable = &[
    ("children", children),
    ("patterns", patterns),
    ("dependencies", dependencies),
    ("renames", renames),
    ("assertions", assertions),
];

fn create(desc: &Description, _ctx: &Context) -> DeserializeResult<Schema> {
    if desc.flag_is_true("func") {
        Ok(Schema::func())
    } else {
        Ok(Schema::object())
    }
}

fn children(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    ctx: &Context,
) -> DeserializeResult<Schema> {
    let mut schema = schema;
    for (name, child) in expect_object(arg, "children")? {
        schema = schema.key(name, ctx.recurse(child)?);
    }
    Ok(schema)
}

fn patterns(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    ctx: &Context,
) -> DeserializeResult<Schema> {
    let mut schema = schema;
    for entry in expect_array(arg, "patterns")? {
        let rule = entry
            .get("rule")
            .ok_or_else(|| DeserializeError::InvalidArgument {
                name: "patterns".to_string(),
                expected: "entries with a 'rule' description",
            })?;
        let rule = ctx.recurse(rule)?;
        schema = if let Some(literal) = entry.get("regex").and_then(Value::as_str) {
            schema.pattern(&Pattern::parse(literal)?, rule)
        } else if let Some(matcher) = entry.get("schema") {
            schema.pattern_schema(ctx.recurse(matcher)?, rule)
        } else {
            return Err(DeserializeError::InvalidArgument {
                name: "patterns".to_string(),
                expected: "entries with a 'regex' literal or a 'schema' matcher",
            });
        };
    }
    Ok(schema)
}

fn dependencies(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    let mut schema = schema;
    for entry in expect_array(arg, "dependencies")? {
        let relation = entry
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DeserializeError::InvalidArgument {
                name: "dependencies".to_string(),
                expected: "entries with a 'type' relation name",
            })?;
        let relation = Relation::parse(relation)
            .ok_or_else(|| DeserializeError::UnknownRelation(relation.to_string()))?;

        let peers = peer_list(entry)?;
        schema = if relation.takes_key() {
            let key = entry
                .get("key")
                .and_then(Value::as_str)
                .ok_or_else(|| DeserializeError::InvalidArgument {
                    name: "dependencies".to_string(),
                    expected: "a 'key' for with/without relations",
                })?;
            match relation {
                Relation::With => schema.with(key, peers),
                _ => schema.without(key, peers),
            }
        } else {
            match relation {
                Relation::And => schema.and(peers),
                Relation::Nand => schema.nand(peers),
                Relation::Or => schema.or(peers),
                Relation::Xor => schema.xor(peers),
                _ => schema.oxor(peers),
            }
        };
    }
    Ok(schema)
}

fn peer_list(entry: &Value) -> DeserializeResult<Vec<String>> {
    expect_array(
        entry.get("peers").unwrap_or(&Value::Null),
        "dependencies",
    )?
    .iter()
    .map(|peer| {
        peer.as_str()
            .map(str::to_string)
            .ok_or_else(|| DeserializeError::InvalidArgument {
                name: "dependencies".to_string(),
                expected: "peer names as strings",
            })
    })
    .collect()
}

fn renames(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    let mut schema = schema;
    for entry in expect_array(arg, "renames")? {
        let from = expect_str(entry.get("from").unwrap_or(&Value::Null), "renames")?;
        let to = expect_str(entry.get("to").unwrap_or(&Value::Null), "renames")?;
        let options = entry.get("options").cloned();
        let pattern_based = entry.get("regex").map(enabled).unwrap_or(false);
        schema = if pattern_based {
            schema.rename_pattern(&Pattern::parse(from)?, to, options)
        } else {
            schema.rename(from, to, options)
        };
    }
    Ok(schema)
}

fn assertions(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    ctx: &Context,
) -> DeserializeResult<Schema> {
    let mut schema = schema;
    for entry in expect_array(arg, "assertions")? {
        let ref_path = expect_str(entry.get("ref").unwrap_or(&Value::Null), "assertions")?;
        let asserted = entry
            .get("schema")
            .ok_or_else(|| DeserializeError::InvalidArgument {
                name: "assertions".to_string(),
                expected: "entries with a 'schema' description",
            })?;
        let message = entry
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        schema = schema.assert(ref_path, ctx.recurse(asserted)?, message);
    }
    Ok(schema)
}

fn allow_unknown(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.unknown(enabled(arg)))
}

fn arity(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.arity(arg.clone()))
}

fn min_arity(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.min_arity(arg.clone()))
}

fn max_arity(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.max_arity(arg.clone()))
}

fn class(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.class())
}
