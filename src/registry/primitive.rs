//! Primitive kinds: string, boolean, number, binary, date
//!
//! Transform rules (lowercase, trim, normalize, ...) reapply their effect
//! at rule time; the matching flags are informational echoes and resolve
//! to no-ops so the introspection side's double bookkeeping never trips a
//! missing-handler failure.

use chrono::DateTime;
use serde_json::Value;

use crate::description::Description;
use crate::deserialize::{Context, DeserializeError, DeserializeResult};
use crate::pattern::Pattern;
use crate::schema::{RegexOptions, Schema, TimestampUnit};

use super::{enabled, expect_array, expect_str, noop, optional, HandlerTable, Kind};

pub(super) const STRING: Kind = Kind {
    name: "string",
    inherits: Some("any"),
    create: |_, _| Ok(Schema::string()),
    rules: STRING_RULES,
    flags: STRING_FLAGS,
    options: &[],
};

pub(super) const BOOLEAN: Kind = Kind {
    name: "boolean",
    inherits: Some("any"),
    create: |_, _| Ok(Schema::boolean()),
    rules: &[],
    flags: &[("insensitive", insensitive)],
    options: &[("truthy", truthy), ("falsy", falsy)],
};

pub(super) const NUMBER: Kind = Kind {
    name: "number",
    inherits: Some("any"),
    create: |_, _| Ok(Schema::number()),
    rules: NUMBER_RULES,
    flags: NUMBER_FLAGS,
    options: &[],
};

pub(super) const BINARY: Kind = Kind {
    name: "binary",
    inherits: Some("any"),
    create: |_, _| Ok(Schema::binary()),
    rules: &[("min", rule_min), ("max", rule_max), ("length", rule_length)],
    flags: &[("encoding", encoding)],
    options: &[],
};

pub(super) const DATE: Kind = Kind {
    name: "date",
    inherits: Some("any"),
    create: |_, _| Ok(Schema::date()),
    rules: DATE_RULES,
    flags: DATE_FLAGS,
    options: &[],
};

const STRING_RULES: HandlerTable = &[
    ("min", rule_min),
    ("max", rule_max),
    ("length", rule_length),
    ("regex", regex),
    ("email", email),
    ("ip", ip),
    ("uri", uri),
    ("hex", hex),
    ("token", token),
    ("alphanum", alphanum),
    ("base64", base64),
    ("creditCard", credit_card),
    ("dataUri", data_uri),
    ("guid", guid),
    ("hostname", hostname),
    ("isoDate", iso_date),
    ("uuid", uuid),
    ("replace", replace),
    ("lowercase", lowercase),
    ("uppercase", uppercase),
    ("trim", trim),
    ("normalize", normalize),
];

const STRING_FLAGS: HandlerTable = &[
    ("insensitive", insensitive),
    ("truncate", truncate),
    // Echoes of the transform rules above; already reapplied there.
    ("case", noop),
    ("byteAligned", noop),
    ("trim", noop),
    ("normalize", noop),
];

const NUMBER_RULES: HandlerTable = &[
    ("min", rule_min),
    ("max", rule_max),
    ("greater", rule_greater),
    ("less", rule_less),
    ("integer", integer),
    ("precision", precision),
    ("multiple", multiple),
    ("positive", positive),
    ("negative", negative),
    ("port", port),
];

const NUMBER_FLAGS: HandlerTable = &[
    // Echo of the precision rule.
    ("precision", noop),
    ("unsafe", allow_unsafe),
];

const DATE_RULES: HandlerTable = &[
    ("min", date_min),
    ("max", date_max),
    ("greater", date_greater),
    ("less", date_less),
];

const DATE_FLAGS: HandlerTable = &[("timestamp", timestamp), ("iso", iso)];

// ==================
// Shared bound rules
// ==================

pub(super) fn rule_min(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.min(arg.clone()))
}

pub(super) fn rule_max(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.max(arg.clone()))
}

pub(super) fn rule_length(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.length(arg.clone()))
}

fn rule_greater(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.greater(arg.clone()))
}

fn rule_less(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.less(arg.clone()))
}

// ==================
// String
// ==================

fn regex(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    let literal = arg
        .get("pattern")
        .and_then(Value::as_str)
        .ok_or_else(|| DeserializeError::InvalidArgument {
            name: "regex".to_string(),
            expected: "an object with a 'pattern' literal",
        })?;
    let pattern = Pattern::parse(literal)?;
    let options = RegexOptions {
        name: arg.get("name").and_then(Value::as_str).map(str::to_string),
        invert: arg.get("invert").map(enabled).unwrap_or(false),
    };
    Ok(schema.regex(&pattern, options))
}

fn email(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.email(optional(arg)))
}

fn ip(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.ip(optional(arg)))
}

fn uri(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.uri(optional(arg)))
}

/// The byteAligned modifier lives in the description's flag bag, not in
/// the rule argument, so it is read straight off the description.
fn hex(
    schema: Schema,
    _arg: &Value,
    desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.hex(desc.flag_is_true("byteAligned")))
}

fn token(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.token())
}

fn alphanum(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.alphanum())
}

fn base64(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.base64(optional(arg)))
}

fn credit_card(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.credit_card())
}

fn data_uri(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.data_uri(optional(arg)))
}

fn guid(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.guid())
}

fn hostname(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.hostname())
}

fn iso_date(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.iso_date())
}

fn uuid(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.uuid())
}

fn replace(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    let literal = arg
        .get("pattern")
        .and_then(Value::as_str)
        .ok_or_else(|| DeserializeError::InvalidArgument {
            name: "replace".to_string(),
            expected: "an object with 'pattern' and 'replacement'",
        })?;
    let replacement =
        arg.get("replacement")
            .and_then(Value::as_str)
            .ok_or_else(|| DeserializeError::InvalidArgument {
                name: "replace".to_string(),
                expected: "an object with 'pattern' and 'replacement'",
            })?;
    let pattern = Pattern::parse(literal)?;
    Ok(schema.replace(&pattern, replacement))
}

fn lowercase(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.lowercase())
}

fn uppercase(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.uppercase())
}

fn trim(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.trim(enabled(arg)))
}

fn normalize(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.normalize(expect_str(arg, "normalize")?))
}

fn insensitive(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.insensitive(enabled(arg)))
}

fn truncate(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.truncate(enabled(arg)))
}

// ==================
// Boolean
// ==================

/// The implicit true/false the introspection echoes at the head of the
/// coercion lists must not be re-added as custom values.
fn truthy(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    let values = expect_array(arg, "truthy")?
        .iter()
        .filter(|value| **value != Value::Bool(true))
        .cloned();
    Ok(schema.truthy(values))
}

fn falsy(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    let values = expect_array(arg, "falsy")?
        .iter()
        .filter(|value| **value != Value::Bool(false))
        .cloned();
    Ok(schema.falsy(values))
}

// ==================
// Number
// ==================

fn integer(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.integer())
}

fn precision(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    let digits = arg
        .as_u64()
        .and_then(|digits| u32::try_from(digits).ok())
        .ok_or_else(|| DeserializeError::InvalidArgument {
            name: "precision".to_string(),
            expected: "a small unsigned integer",
        })?;
    Ok(schema.precision(digits))
}

fn multiple(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.multiple(arg.clone()))
}

fn positive(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.positive())
}

fn negative(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.negative())
}

fn port(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.port())
}

fn allow_unsafe(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.allow_unsafe(enabled(arg)))
}

// ==================
// Binary
// ==================

fn encoding(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.encoding(expect_str(arg, "encoding")?))
}

// ==================
// Date
// ==================

/// Date bounds travel as RFC 3339 strings, the sentinel `"now"`, or an
/// epoch number; anything else is rejected before it reaches the schema.
fn check_date_bound(name: &'static str, arg: &Value) -> DeserializeResult<()> {
    match arg {
        Value::String(text) if text == "now" => Ok(()),
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|_| ())
            .map_err(|source| DeserializeError::InvalidDate {
                value: text.clone(),
                source,
            }),
        Value::Number(_) => Ok(()),
        _ => Err(DeserializeError::InvalidArgument {
            name: name.to_string(),
            expected: "an RFC 3339 string, \"now\", or an epoch number",
        }),
    }
}

fn date_min(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    check_date_bound("min", arg)?;
    Ok(schema.min(arg.clone()))
}

fn date_max(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    check_date_bound("max", arg)?;
    Ok(schema.max(arg.clone()))
}

fn date_greater(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    check_date_bound("greater", arg)?;
    Ok(schema.greater(arg.clone()))
}

fn date_less(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    check_date_bound("less", arg)?;
    Ok(schema.less(arg.clone()))
}

fn timestamp(
    schema: Schema,
    arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    let unit = arg
        .as_str()
        .and_then(TimestampUnit::parse)
        .ok_or_else(|| DeserializeError::InvalidArgument {
            name: "timestamp".to_string(),
            expected: "\"javascript\" or \"unix\"",
        })?;
    Ok(schema.timestamp(unit))
}

fn iso(
    schema: Schema,
    _arg: &Value,
    _desc: &Description,
    _ctx: &Context,
) -> DeserializeResult<Schema> {
    Ok(schema.iso())
}
