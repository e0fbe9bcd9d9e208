//! Schema introspection
//!
//! `describe()` projects a live schema into its portable description.
//! Option fields are emitted in a canonical order (any-level metadata
//! first, then kind-specific state), which makes serialize∘deserialize a
//! fixed point over its own output.

use serde_json::{Map, Value};

use crate::description::{Description, RuleDesc};

use super::types::{
    FlagValue, KeyMatcher, KindState, RenameSource, Rule, Schema, SymbolTarget,
};

impl Schema {
    /// Introspects the schema into its portable description.
    pub fn describe(&self) -> Description {
        let mut desc = Description::new(self.kind_name());

        let mut options = Map::new();
        if !self.valids.is_empty() {
            options.insert("valids".into(), Value::Array(self.valids.clone()));
        }
        if !self.invalids.is_empty() {
            options.insert("invalids".into(), Value::Array(self.invalids.clone()));
        }
        self.describe_metadata(&mut options);
        self.describe_state(&mut options);
        desc.options = options;

        let flags: Map<String, Value> = self
            .flags
            .iter()
            .map(|(name, value)| (name.to_string(), flag_value(value)))
            .collect();
        if !flags.is_empty() {
            desc.flags = Some(flags);
        }

        if !self.rules.is_empty() {
            desc.rules = Some(self.rules.iter().map(rule_desc).collect());
        }

        desc
    }

    fn describe_metadata(&self, options: &mut Map<String, Value>) {
        let meta = &self.metadata;
        if let Some(text) = &meta.description {
            options.insert("description".into(), Value::String(text.clone()));
        }
        if let Some(notes) = &meta.notes {
            options.insert("notes".into(), notes.clone());
        }
        if let Some(tags) = &meta.tags {
            options.insert("tags".into(), tags.clone());
        }
        if let Some(value) = &meta.meta {
            options.insert("meta".into(), value.clone());
        }
        if !meta.examples.is_empty() {
            let examples = meta
                .examples
                .iter()
                .map(|example| {
                    let mut entry = Map::new();
                    entry.insert("value".into(), example.value.clone());
                    if let Some(opts) = &example.options {
                        entry.insert("options".into(), opts.clone());
                    }
                    Value::Object(entry)
                })
                .collect();
            options.insert("examples".into(), Value::Array(examples));
        }
        if let Some(unit) = &meta.unit {
            options.insert("unit".into(), Value::String(unit.clone()));
        }
        if let Some(label) = &meta.label {
            options.insert("label".into(), Value::String(label.clone()));
        }
        if let Some(bag) = &meta.options {
            options.insert("options".into(), bag.clone());
        }
    }

    fn describe_state(&self, options: &mut Map<String, Value>) {
        match &self.state {
            KindState::Any
            | KindState::String
            | KindState::Number
            | KindState::Binary
            | KindState::Date => {}
            KindState::Boolean { truthy, falsy } => {
                // The implicit true/false always lead the coercion lists,
                // the same echo the original introspection produces.
                if !truthy.is_empty() {
                    let mut values = vec![Value::Bool(true)];
                    values.extend(truthy.iter().cloned());
                    options.insert("truthy".into(), Value::Array(values));
                }
                if !falsy.is_empty() {
                    let mut values = vec![Value::Bool(false)];
                    values.extend(falsy.iter().cloned());
                    options.insert("falsy".into(), Value::Array(values));
                }
            }
            KindState::Object {
                children,
                patterns,
                dependencies,
                renames,
                assertions,
                ..
            } => {
                if !children.is_empty() {
                    let map: Map<String, Value> = children
                        .iter()
                        .map(|(name, child)| (name.clone(), Value::from(&child.describe())))
                        .collect();
                    options.insert("children".into(), Value::Object(map));
                }
                if !patterns.is_empty() {
                    let entries = patterns
                        .iter()
                        .map(|entry| {
                            let mut out = Map::new();
                            match &entry.matcher {
                                KeyMatcher::Pattern(pattern) => {
                                    out.insert(
                                        "regex".into(),
                                        Value::String(pattern.literal().into()),
                                    );
                                }
                                KeyMatcher::Schema(schema) => {
                                    out.insert("schema".into(), Value::from(&schema.describe()));
                                }
                            }
                            out.insert("rule".into(), Value::from(&entry.rule.describe()));
                            Value::Object(out)
                        })
                        .collect();
                    options.insert("patterns".into(), Value::Array(entries));
                }
                if !dependencies.is_empty() {
                    let entries = dependencies
                        .iter()
                        .map(|dep| {
                            let mut out = Map::new();
                            out.insert("type".into(), Value::String(dep.relation.as_str().into()));
                            if let Some(key) = &dep.key {
                                out.insert("key".into(), Value::String(key.clone()));
                            }
                            let peers = dep
                                .peers
                                .iter()
                                .map(|peer| Value::String(peer.clone()))
                                .collect();
                            out.insert("peers".into(), Value::Array(peers));
                            Value::Object(out)
                        })
                        .collect();
                    options.insert("dependencies".into(), Value::Array(entries));
                }
                if !renames.is_empty() {
                    let entries = renames
                        .iter()
                        .map(|rename| {
                            let mut out = Map::new();
                            match &rename.from {
                                RenameSource::Key(key) => {
                                    out.insert("from".into(), Value::String(key.clone()));
                                }
                                RenameSource::Pattern(pattern) => {
                                    out.insert(
                                        "from".into(),
                                        Value::String(pattern.literal().into()),
                                    );
                                    out.insert("regex".into(), Value::Bool(true));
                                }
                            }
                            out.insert("to".into(), Value::String(rename.to.clone()));
                            if let Some(opts) = &rename.options {
                                out.insert("options".into(), opts.clone());
                            }
                            Value::Object(out)
                        })
                        .collect();
                    options.insert("renames".into(), Value::Array(entries));
                }
                if !assertions.is_empty() {
                    let entries = assertions
                        .iter()
                        .map(|assertion| {
                            let mut out = Map::new();
                            out.insert("ref".into(), Value::String(assertion.ref_path.clone()));
                            out.insert("schema".into(), Value::from(&assertion.schema.describe()));
                            if let Some(message) = &assertion.message {
                                out.insert("message".into(), Value::String(message.clone()));
                            }
                            Value::Object(out)
                        })
                        .collect();
                    options.insert("assertions".into(), Value::Array(entries));
                }
            }
            KindState::Array { items, ordered } => {
                if !items.is_empty() {
                    options.insert("items".into(), describe_list(items));
                }
                if !ordered.is_empty() {
                    options.insert("orderedItems".into(), describe_list(ordered));
                }
            }
            KindState::Symbol { map } => {
                if !map.is_empty() {
                    let entries = map
                        .iter()
                        .map(|(key, target)| {
                            let value = match target {
                                SymbolTarget::Symbol(symbol) => {
                                    Value::String(symbol.label().into())
                                }
                                SymbolTarget::Value(value) => value.clone(),
                            };
                            Value::Array(vec![key.clone(), value])
                        })
                        .collect();
                    options.insert("map".into(), Value::Array(entries));
                }
            }
            KindState::Alternatives { matches } => {
                if !matches.is_empty() {
                    options.insert("alternatives".into(), describe_list(matches));
                }
            }
        }
    }
}

fn describe_list(schemas: &[Schema]) -> Value {
    Value::Array(
        schemas
            .iter()
            .map(|schema| Value::from(&schema.describe()))
            .collect(),
    )
}

fn flag_value(value: &FlagValue) -> Value {
    match value {
        FlagValue::Json(json) => json.clone(),
        FlagValue::Schema(schema) => Value::from(&schema.describe()),
    }
}

fn rule_desc(rule: &Rule) -> RuleDesc {
    RuleDesc {
        name: rule.name.to_string(),
        arg: rule.arg.clone(),
    }
}
