//! Kind-specific fluent methods
//!
//! Rule arguments are stored exactly as supplied so introspection can
//! reproduce them. Transform rules on the string kind also record their
//! informational flag, matching the shape the introspection side expects.

use serde_json::{json, Map, Value};

use crate::pattern::Pattern;

use super::types::{
    Assertion, Dependency, KeyMatcher, KindState, PatternEntry, Relation, Rename, RenameSource,
    Schema, SymbolTarget, TimestampUnit,
};

/// Options for a string pattern rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegexOptions {
    pub name: Option<String>,
    pub invert: bool,
}

impl Schema {
    // ==================
    // Shared bound rules
    // ==================

    /// Lower bound on the kind's own magnitude (length, value, size, count).
    pub fn min(self, limit: impl Into<Value>) -> Self {
        self.push_rule("min", Some(limit.into()))
    }

    /// Upper bound on the kind's own magnitude.
    pub fn max(self, limit: impl Into<Value>) -> Self {
        self.push_rule("max", Some(limit.into()))
    }

    /// Exact magnitude.
    pub fn length(self, limit: impl Into<Value>) -> Self {
        self.push_rule("length", Some(limit.into()))
    }

    /// Exclusive lower bound (number and date kinds).
    pub fn greater(self, limit: impl Into<Value>) -> Self {
        self.push_rule("greater", Some(limit.into()))
    }

    /// Exclusive upper bound (number and date kinds).
    pub fn less(self, limit: impl Into<Value>) -> Self {
        self.push_rule("less", Some(limit.into()))
    }

    // ==================
    // String
    // ==================

    /// Requires the value to match a pattern.
    pub fn regex(self, pattern: &Pattern, options: RegexOptions) -> Self {
        let mut arg = Map::new();
        arg.insert("pattern".into(), Value::String(pattern.literal().into()));
        if let Some(name) = options.name {
            arg.insert("name".into(), Value::String(name));
        }
        if options.invert {
            arg.insert("invert".into(), Value::Bool(true));
        }
        self.push_rule("regex", Some(Value::Object(arg)))
    }

    pub fn token(self) -> Self {
        self.push_rule("token", None)
    }

    pub fn alphanum(self) -> Self {
        self.push_rule("alphanum", None)
    }

    pub fn base64(self, options: Option<Value>) -> Self {
        self.push_rule("base64", options)
    }

    pub fn credit_card(self) -> Self {
        self.push_rule("creditCard", None)
    }

    pub fn data_uri(self, options: Option<Value>) -> Self {
        self.push_rule("dataUri", options)
    }

    pub fn email(self, options: Option<Value>) -> Self {
        self.push_rule("email", options)
    }

    pub fn guid(self) -> Self {
        self.push_rule("guid", None)
    }

    /// Hexadecimal content; `byte_aligned` additionally requires an even
    /// digit count and is recorded as a flag.
    pub fn hex(self, byte_aligned: bool) -> Self {
        let schema = self.push_rule("hex", None);
        if byte_aligned {
            schema.set_json_flag("byteAligned", true)
        } else {
            schema
        }
    }

    pub fn hostname(self) -> Self {
        self.push_rule("hostname", None)
    }

    pub fn ip(self, options: Option<Value>) -> Self {
        self.push_rule("ip", options)
    }

    pub fn iso_date(self) -> Self {
        self.push_rule("isoDate", None)
    }

    pub fn uuid(self) -> Self {
        self.push_rule("uuid", None)
    }

    pub fn uri(self, options: Option<Value>) -> Self {
        self.push_rule("uri", options)
    }

    /// Lowercase transform; the `case` flag echoes the rule.
    pub fn lowercase(self) -> Self {
        self.push_rule("lowercase", None).set_json_flag("case", "lower")
    }

    /// Uppercase transform; the `case` flag echoes the rule.
    pub fn uppercase(self) -> Self {
        self.push_rule("uppercase", None).set_json_flag("case", "upper")
    }

    /// Whitespace trim transform; the `trim` flag echoes the rule.
    pub fn trim(self, enabled: bool) -> Self {
        self.push_rule("trim", Some(Value::Bool(enabled)))
            .set_json_flag("trim", enabled)
    }

    /// Unicode normalization transform; the `normalize` flag echoes the rule.
    pub fn normalize(self, form: impl Into<String>) -> Self {
        let form = form.into();
        self.push_rule("normalize", Some(Value::String(form.clone())))
            .set_json_flag("normalize", form)
    }

    pub fn replace(self, pattern: &Pattern, replacement: impl Into<String>) -> Self {
        let arg = json!({
            "pattern": pattern.literal(),
            "replacement": replacement.into(),
        });
        self.push_rule("replace", Some(arg))
    }

    /// Case-insensitive value comparison (string and boolean kinds).
    pub fn insensitive(self, enabled: bool) -> Self {
        self.set_json_flag("insensitive", enabled)
    }

    /// Truncates overlong input instead of rejecting it.
    pub fn truncate(self, enabled: bool) -> Self {
        self.set_json_flag("truncate", enabled)
    }

    // ==================
    // Boolean
    // ==================

    /// Extra values coerced to `true`.
    pub fn truthy<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if let KindState::Boolean { truthy, .. } = &mut self.state {
            truthy.extend(values.into_iter().map(Into::into));
        }
        self
    }

    /// Extra values coerced to `false`.
    pub fn falsy<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if let KindState::Boolean { falsy, .. } = &mut self.state {
            falsy.extend(values.into_iter().map(Into::into));
        }
        self
    }

    // ==================
    // Number
    // ==================

    pub fn integer(self) -> Self {
        self.push_rule("integer", None)
    }

    /// Maximum decimal places; the `precision` flag echoes the rule.
    pub fn precision(self, digits: u32) -> Self {
        self.push_rule("precision", Some(Value::from(digits)))
            .set_json_flag("precision", digits)
    }

    pub fn multiple(self, base: impl Into<Value>) -> Self {
        self.push_rule("multiple", Some(base.into()))
    }

    pub fn positive(self) -> Self {
        self.push_rule("positive", None)
    }

    pub fn negative(self) -> Self {
        self.push_rule("negative", None)
    }

    pub fn port(self) -> Self {
        self.push_rule("port", None)
    }

    /// Tolerates integers outside the safe range.
    pub fn allow_unsafe(self, enabled: bool) -> Self {
        self.set_json_flag("unsafe", enabled)
    }

    // ==================
    // Binary
    // ==================

    /// Expected input encoding for string-to-buffer coercion.
    pub fn encoding(self, encoding: impl Into<String>) -> Self {
        self.set_json_flag("encoding", encoding.into())
    }

    // ==================
    // Date
    // ==================

    /// Epoch interpretation for numeric input.
    pub fn timestamp(self, unit: TimestampUnit) -> Self {
        self.set_json_flag("timestamp", unit.as_str())
    }

    /// Requires ISO 8601 formatted input.
    pub fn iso(self) -> Self {
        self.set_json_flag("iso", true)
    }

    // ==================
    // Object
    // ==================

    /// Attaches a named child schema.
    pub fn key(mut self, name: impl Into<String>, schema: Schema) -> Self {
        if let KindState::Object { children, .. } = &mut self.state {
            children.push((name.into(), schema));
        }
        self
    }

    /// Attaches a wildcard entry keyed by a compiled pattern.
    pub fn pattern(mut self, matcher: &Pattern, rule: Schema) -> Self {
        if let KindState::Object { patterns, .. } = &mut self.state {
            patterns.push(PatternEntry {
                matcher: KeyMatcher::Pattern(matcher.clone()),
                rule,
            });
        }
        self
    }

    /// Attaches a wildcard entry keyed by a schema.
    pub fn pattern_schema(mut self, matcher: Schema, rule: Schema) -> Self {
        if let KindState::Object { patterns, .. } = &mut self.state {
            patterns.push(PatternEntry {
                matcher: KeyMatcher::Schema(Box::new(matcher)),
                rule,
            });
        }
        self
    }

    fn dependency(mut self, relation: Relation, key: Option<String>, peers: Vec<String>) -> Self {
        if let KindState::Object { dependencies, .. } = &mut self.state {
            dependencies.push(Dependency {
                relation,
                key,
                peers,
            });
        }
        self
    }

    /// All of the peer keys must appear together.
    pub fn and<I: IntoIterator<Item = S>, S: Into<String>>(self, peers: I) -> Self {
        let peers = peers.into_iter().map(Into::into).collect();
        self.dependency(Relation::And, None, peers)
    }

    /// The peer keys must not all appear together.
    pub fn nand<I: IntoIterator<Item = S>, S: Into<String>>(self, peers: I) -> Self {
        let peers = peers.into_iter().map(Into::into).collect();
        self.dependency(Relation::Nand, None, peers)
    }

    /// At least one of the peer keys must appear.
    pub fn or<I: IntoIterator<Item = S>, S: Into<String>>(self, peers: I) -> Self {
        let peers = peers.into_iter().map(Into::into).collect();
        self.dependency(Relation::Or, None, peers)
    }

    /// Exactly one of the peer keys must appear.
    pub fn xor<I: IntoIterator<Item = S>, S: Into<String>>(self, peers: I) -> Self {
        let peers = peers.into_iter().map(Into::into).collect();
        self.dependency(Relation::Xor, None, peers)
    }

    /// At most one of the peer keys may appear.
    pub fn oxor<I: IntoIterator<Item = S>, S: Into<String>>(self, peers: I) -> Self {
        let peers = peers.into_iter().map(Into::into).collect();
        self.dependency(Relation::Oxor, None, peers)
    }

    /// When the key appears, all peers must appear too.
    pub fn with<I: IntoIterator<Item = S>, S: Into<String>>(
        self,
        key: impl Into<String>,
        peers: I,
    ) -> Self {
        let peers = peers.into_iter().map(Into::into).collect();
        self.dependency(Relation::With, Some(key.into()), peers)
    }

    /// When the key appears, none of the peers may appear.
    pub fn without<I: IntoIterator<Item = S>, S: Into<String>>(
        self,
        key: impl Into<String>,
        peers: I,
    ) -> Self {
        let peers = peers.into_iter().map(Into::into).collect();
        self.dependency(Relation::Without, Some(key.into()), peers)
    }

    /// Renames an input key before validation.
    pub fn rename(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        options: Option<Value>,
    ) -> Self {
        if let KindState::Object { renames, .. } = &mut self.state {
            renames.push(Rename {
                from: RenameSource::Key(from.into()),
                to: to.into(),
                options,
            });
        }
        self
    }

    /// Renames every input key matching a pattern.
    pub fn rename_pattern(
        mut self,
        from: &Pattern,
        to: impl Into<String>,
        options: Option<Value>,
    ) -> Self {
        if let KindState::Object { renames, .. } = &mut self.state {
            renames.push(Rename {
                from: RenameSource::Pattern(from.clone()),
                to: to.into(),
                options,
            });
        }
        self
    }

    /// Asserts a schema over a referenced key.
    pub fn assert(
        mut self,
        ref_path: impl Into<String>,
        schema: Schema,
        message: Option<String>,
    ) -> Self {
        if let KindState::Object { assertions, .. } = &mut self.state {
            assertions.push(Assertion {
                ref_path: ref_path.into(),
                schema,
                message,
            });
        }
        self
    }

    /// Tolerates keys not covered by children or patterns.
    pub fn unknown(self, allow: bool) -> Self {
        self.set_json_flag("allowUnknown", allow)
    }

    /// Exact argument count (function variant).
    pub fn arity(self, count: impl Into<Value>) -> Self {
        self.push_rule("arity", Some(count.into()))
    }

    /// Minimum argument count (function variant).
    pub fn min_arity(self, count: impl Into<Value>) -> Self {
        self.push_rule("minArity", Some(count.into()))
    }

    /// Maximum argument count (function variant).
    pub fn max_arity(self, count: impl Into<Value>) -> Self {
        self.push_rule("maxArity", Some(count.into()))
    }

    /// Requires a class constructor (function variant).
    pub fn class(self) -> Self {
        self.push_rule("class", None)
    }

    // ==================
    // Array
    // ==================

    /// Allowed element types, order-insensitive.
    pub fn items<I: IntoIterator<Item = Schema>>(mut self, schemas: I) -> Self {
        if let KindState::Array { items, .. } = &mut self.state {
            items.extend(schemas);
        }
        self
    }

    /// Positional element types, strictly ordered.
    pub fn ordered<I: IntoIterator<Item = Schema>>(mut self, schemas: I) -> Self {
        if let KindState::Array { ordered, .. } = &mut self.state {
            ordered.extend(schemas);
        }
        self
    }

    /// Element uniqueness. The argument doubles as comparator path source
    /// and options bag; it is stored verbatim and replayed the same way.
    pub fn unique(self, arg: impl Into<Value>) -> Self {
        self.push_rule("unique", Some(arg.into()))
    }

    /// Tolerates holes in the array.
    pub fn sparse(self, enabled: bool) -> Self {
        self.set_json_flag("sparse", enabled)
    }

    /// Wraps a lone value in an array automatically.
    pub fn single(self, enabled: bool) -> Self {
        self.set_json_flag("single", enabled)
    }

    // ==================
    // Symbol
    // ==================

    /// Attaches label-to-symbol conversions. Implies an exclusive
    /// allow-list, so the `allowOnly` flag is set alongside.
    pub fn map<I: IntoIterator<Item = (Value, SymbolTarget)>>(mut self, entries: I) -> Self {
        if let KindState::Symbol { map } = &mut self.state {
            map.extend(entries);
        }
        self.set_json_flag("allowOnly", true)
    }

    // ==================
    // Alternatives
    // ==================

    /// Appends candidate schemas tried in order.
    pub fn matches<I: IntoIterator<Item = Schema>>(mut self, schemas: I) -> Self {
        if let KindState::Alternatives { matches } = &mut self.state {
            matches.extend(schemas);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rules_record_in_call_order() {
        let schema = Schema::string().min(1).max(5).alphanum();
        let names: Vec<&str> = schema.rules().iter().map(|rule| rule.name).collect();
        assert_eq!(names, vec!["min", "max", "alphanum"]);
    }

    #[test]
    fn test_lowercase_records_rule_and_flag() {
        let schema = Schema::string().lowercase();
        assert_eq!(schema.rules()[0].name, "lowercase");
        assert_eq!(
            schema.flag("case").and_then(super::super::FlagValue::as_json),
            Some(&json!("lower"))
        );
    }

    #[test]
    fn test_hex_byte_aligned_flag() {
        let schema = Schema::string().hex(true);
        assert!(matches!(
            schema.flag("byteAligned").and_then(super::super::FlagValue::as_json),
            Some(Value::Bool(true))
        ));
        assert!(Schema::string().hex(false).flag("byteAligned").is_none());
    }

    #[test]
    fn test_regex_arg_shape() {
        let pattern = Pattern::parse("/a+/i").unwrap();
        let schema = Schema::string().regex(
            &pattern,
            RegexOptions {
                name: Some("letters".into()),
                invert: true,
            },
        );
        assert_eq!(
            schema.rules()[0].arg,
            Some(json!({"pattern": "/a+/i", "name": "letters", "invert": true}))
        );
    }

    #[test]
    fn test_object_dependency_recording() {
        let schema = Schema::object().and(["a", "b"]).with("a", ["c"]);
        if let KindState::Object { dependencies, .. } = &schema.state {
            assert_eq!(dependencies.len(), 2);
            assert_eq!(dependencies[0].relation, Relation::And);
            assert_eq!(dependencies[1].key.as_deref(), Some("a"));
        } else {
            panic!("not an object schema");
        }
    }

    #[test]
    fn test_symbol_map_sets_allow_only() {
        let schema = Schema::symbol().map([(json!("a"), SymbolTarget::Value(json!("sym-a")))]);
        assert!(schema.flag("allowOnly").is_some());
        assert_eq!(schema.symbol_map().unwrap().len(), 1);
    }
}
