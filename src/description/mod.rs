//! Portable schema snapshots
//!
//! A [`Description`] is the JSON-compatible image of a configured schema:
//! the kind name, an ordered rule list, an insertion-ordered flag map, and
//! any kind-specific option fields. Descriptions are produced by
//! introspection ([`crate::serialize`]) and consumed read-only by
//! [`crate::deserialize`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-compatible snapshot of a schema's configuration.
///
/// Kind-specific option fields (`children`, `items`, `valids`, ...) are
/// captured by the flattened `options` map in their original declaration
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    /// Kind name (`"string"`, `"object"`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Named modifiers, insertion-ordered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Map<String, Value>>,
    /// Ordered constraint applications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RuleDesc>>,
    /// Everything else: kind-specific option fields in declaration order
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl Description {
    /// Creates a bare description for the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            flags: None,
            rules: None,
            options: Map::new(),
        }
    }

    /// Parses a description out of a nested JSON value.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }

    /// Looks up a flag value by name.
    pub fn flag(&self, name: &str) -> Option<&Value> {
        self.flags.as_ref().and_then(|flags| flags.get(name))
    }

    /// Whether a flag is present and set to `true`.
    pub fn flag_is_true(&self, name: &str) -> bool {
        matches!(self.flag(name), Some(Value::Bool(true)))
    }
}

/// Builds the JSON value form without going through a serializer.
///
/// Field order matches the serde layout: `type`, `flags`, `rules`, then the
/// option fields in their recorded order.
impl From<&Description> for Value {
    fn from(desc: &Description) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), Value::String(desc.kind.clone()));
        if let Some(flags) = &desc.flags {
            out.insert("flags".into(), Value::Object(flags.clone()));
        }
        if let Some(rules) = &desc.rules {
            let rules = rules.iter().map(Value::from).collect();
            out.insert("rules".into(), Value::Array(rules));
        }
        for (name, value) in &desc.options {
            out.insert(name.clone(), value.clone());
        }
        Value::Object(out)
    }
}

/// One ordered rule application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDesc {
    /// Rule name, resolved against the kind's rule table
    pub name: String,
    /// Argument captured exactly as originally supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<Value>,
}

impl From<&RuleDesc> for Value {
    fn from(rule: &RuleDesc) -> Value {
        let mut out = Map::new();
        out.insert("name".into(), Value::String(rule.name.clone()));
        if let Some(arg) = &rule.arg {
            out.insert("arg".into(), arg.clone());
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_land_in_options() {
        let desc: Description = serde_json::from_value(json!({
            "type": "string",
            "valids": [1, 2],
            "label": "age"
        }))
        .unwrap();

        assert_eq!(desc.kind, "string");
        assert!(desc.flags.is_none());
        assert!(desc.rules.is_none());
        assert_eq!(desc.options.get("valids"), Some(&json!([1, 2])));
        assert_eq!(desc.options.get("label"), Some(&json!("age")));
    }

    #[test]
    fn test_option_field_order_is_preserved() {
        let desc: Description = serde_json::from_value(json!({
            "type": "any",
            "label": "a",
            "valids": [1],
            "unit": "ms"
        }))
        .unwrap();

        let names: Vec<&str> = desc.options.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["label", "valids", "unit"]);
    }

    #[test]
    fn test_serde_round_trip() {
        let input = json!({
            "type": "string",
            "flags": {"presence": "required", "insensitive": true},
            "rules": [{"name": "min", "arg": 3}, {"name": "alphanum"}],
            "valids": ["abc"]
        });

        let desc: Description = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(serde_json::to_value(&desc).unwrap(), input);
        assert_eq!(Value::from(&desc), input);
    }

    #[test]
    fn test_flag_helpers() {
        let desc: Description = serde_json::from_value(json!({
            "type": "object",
            "flags": {"func": true, "allowUnknown": false}
        }))
        .unwrap();

        assert!(desc.flag_is_true("func"));
        assert!(!desc.flag_is_true("allowUnknown"));
        assert!(!desc.flag_is_true("missing"));
        assert_eq!(desc.flag("allowUnknown"), Some(&json!(false)));
    }

    #[test]
    fn test_rule_without_arg_serializes_bare() {
        let rule = RuleDesc {
            name: "alphanum".into(),
            arg: None,
        };
        assert_eq!(Value::from(&rule), json!({"name": "alphanum"}));
    }
}
