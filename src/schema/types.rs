//! Core schema state
//!
//! A schema is its kind plus three layers of recorded configuration:
//! an ordered rule list, a position-stable flag list, and typed option
//! state. Every fluent method funnels into one of those layers so that
//! introspection can replay the exact construction sequence.

use serde_json::Value;

use crate::pattern::Pattern;

use super::Symbol;

/// One recorded constraint application.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Rule name as dispatched by the registry
    pub name: &'static str,
    /// Argument captured exactly as supplied
    pub arg: Option<Value>,
}

/// Value carried by a flag.
///
/// Almost every flag holds a plain JSON value; `empty` holds a whole
/// sub-schema that must survive introspection and reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Json(Value),
    Schema(Box<Schema>),
}

impl FlagValue {
    /// The JSON payload, if this is a plain flag.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FlagValue::Json(value) => Some(value),
            FlagValue::Schema(_) => None,
        }
    }
}

/// Presence modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Optional,
    Required,
    Forbidden,
}

impl Presence {
    /// Wire spelling of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Optional => "optional",
            Presence::Required => "required",
            Presence::Forbidden => "forbidden",
        }
    }

    /// Parses the wire spelling; anything else is unknown.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "optional" => Some(Presence::Optional),
            "required" => Some(Presence::Required),
            "forbidden" => Some(Presence::Forbidden),
            _ => None,
        }
    }
}

/// Epoch interpretation for date schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampUnit {
    /// Milliseconds since the epoch
    Javascript,
    /// Seconds since the epoch
    Unix,
}

impl TimestampUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampUnit::Javascript => "javascript",
            TimestampUnit::Unix => "unix",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "javascript" => Some(TimestampUnit::Javascript),
            "unix" => Some(TimestampUnit::Unix),
            _ => None,
        }
    }
}

/// Sibling-key dependency relations for object schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    And,
    Nand,
    Or,
    Xor,
    Oxor,
    With,
    Without,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::And => "and",
            Relation::Nand => "nand",
            Relation::Or => "or",
            Relation::Xor => "xor",
            Relation::Oxor => "oxor",
            Relation::With => "with",
            Relation::Without => "without",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "and" => Some(Relation::And),
            "nand" => Some(Relation::Nand),
            "or" => Some(Relation::Or),
            "xor" => Some(Relation::Xor),
            "oxor" => Some(Relation::Oxor),
            "with" => Some(Relation::With),
            "without" => Some(Relation::Without),
            _ => None,
        }
    }

    /// Whether the relation names a primary key ahead of its peers.
    pub fn takes_key(&self) -> bool {
        matches!(self, Relation::With | Relation::Without)
    }
}

/// One sibling-key constraint on an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    pub relation: Relation,
    /// Primary key for `with`/`without`; absent otherwise
    pub key: Option<String>,
    pub peers: Vec<String>,
}

/// Wildcard key matcher for object patterns.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyMatcher {
    Pattern(Pattern),
    Schema(Box<Schema>),
}

/// One wildcard-key entry on an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternEntry {
    pub matcher: KeyMatcher,
    pub rule: Schema,
}

/// Source side of a rename directive.
#[derive(Debug, Clone, PartialEq)]
pub enum RenameSource {
    Key(String),
    Pattern(Pattern),
}

/// One rename directive on an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Rename {
    pub from: RenameSource,
    pub to: String,
    pub options: Option<Value>,
}

/// One object-key assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Assertion {
    /// Dot-path of the asserted key
    pub ref_path: String,
    pub schema: Schema,
    pub message: Option<String>,
}

/// Target of a symbol map entry.
///
/// Resolved symbols come from the caller-supplied table; values are the
/// non-portable fallback carried by the description itself.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolTarget {
    Symbol(Symbol),
    Value(Value),
}

/// One recorded example.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub value: Value,
    pub options: Option<Value>,
}

/// Metadata setters shared by every kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct Metadata {
    pub description: Option<String>,
    pub notes: Option<Value>,
    pub tags: Option<Value>,
    pub meta: Option<Value>,
    pub examples: Vec<Example>,
    pub unit: Option<String>,
    pub label: Option<String>,
    pub options: Option<Value>,
}

/// Kind-specific option state.
#[derive(Debug, Clone, PartialEq)]
pub enum KindState {
    Any,
    String,
    Boolean {
        truthy: Vec<Value>,
        falsy: Vec<Value>,
    },
    Number,
    Binary,
    Date,
    Object {
        func: bool,
        children: Vec<(String, Schema)>,
        patterns: Vec<PatternEntry>,
        dependencies: Vec<Dependency>,
        renames: Vec<Rename>,
        assertions: Vec<Assertion>,
    },
    Array {
        items: Vec<Schema>,
        ordered: Vec<Schema>,
    },
    Symbol {
        map: Vec<(Value, SymbolTarget)>,
    },
    Alternatives {
        matches: Vec<Schema>,
    },
}

impl KindState {
    fn object(func: bool) -> Self {
        KindState::Object {
            func,
            children: Vec::new(),
            patterns: Vec::new(),
            dependencies: Vec::new(),
            renames: Vec::new(),
            assertions: Vec::new(),
        }
    }
}

/// A live validation schema under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub(super) rules: Vec<Rule>,
    pub(super) flags: Vec<(&'static str, FlagValue)>,
    pub(super) valids: Vec<Value>,
    pub(super) invalids: Vec<Value>,
    pub(super) metadata: Metadata,
    pub(super) state: KindState,
}

impl Schema {
    fn with_state(state: KindState) -> Self {
        Self {
            rules: Vec::new(),
            flags: Vec::new(),
            valids: Vec::new(),
            invalids: Vec::new(),
            metadata: Metadata::default(),
            state,
        }
    }

    /// Unconstrained base schema.
    pub fn any() -> Self {
        Self::with_state(KindState::Any)
    }

    pub fn string() -> Self {
        Self::with_state(KindState::String)
    }

    pub fn boolean() -> Self {
        Self::with_state(KindState::Boolean {
            truthy: Vec::new(),
            falsy: Vec::new(),
        })
    }

    pub fn number() -> Self {
        Self::with_state(KindState::Number)
    }

    pub fn binary() -> Self {
        Self::with_state(KindState::Binary)
    }

    pub fn date() -> Self {
        Self::with_state(KindState::Date)
    }

    pub fn object() -> Self {
        Self::with_state(KindState::object(false))
    }

    /// Function variant of the object kind. Introspects as `object` with
    /// the `func` flag set.
    pub fn func() -> Self {
        Self::with_state(KindState::object(true)).set_flag("func", FlagValue::Json(Value::Bool(true)))
    }

    pub fn array() -> Self {
        Self::with_state(KindState::Array {
            items: Vec::new(),
            ordered: Vec::new(),
        })
    }

    pub fn symbol() -> Self {
        Self::with_state(KindState::Symbol { map: Vec::new() })
    }

    pub fn alternatives() -> Self {
        Self::with_state(KindState::Alternatives {
            matches: Vec::new(),
        })
    }

    /// The kind name this schema introspects as.
    pub fn kind_name(&self) -> &'static str {
        match &self.state {
            KindState::Any => "any",
            KindState::String => "string",
            KindState::Boolean { .. } => "boolean",
            KindState::Number => "number",
            KindState::Binary => "binary",
            KindState::Date => "date",
            KindState::Object { .. } => "object",
            KindState::Array { .. } => "array",
            KindState::Symbol { .. } => "symbol",
            KindState::Alternatives { .. } => "alternatives",
        }
    }

    /// Ordered rule applications recorded so far.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up a flag by name.
    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags
            .iter()
            .find(|(flag, _)| *flag == name)
            .map(|(_, value)| value)
    }

    /// Whether this is the function variant of the object kind.
    pub fn is_func(&self) -> bool {
        matches!(self.state, KindState::Object { func: true, .. })
    }

    /// Symbol map entries; `None` for non-symbol kinds.
    pub fn symbol_map(&self) -> Option<&[(Value, SymbolTarget)]> {
        match &self.state {
            KindState::Symbol { map } => Some(map),
            _ => None,
        }
    }

    pub(super) fn push_rule(mut self, name: &'static str, arg: Option<Value>) -> Self {
        self.rules.push(Rule { name, arg });
        self
    }

    /// Upserts a flag, keeping its original position on re-set.
    pub(super) fn set_flag(mut self, name: &'static str, value: FlagValue) -> Self {
        match self.flags.iter_mut().find(|(flag, _)| *flag == name) {
            Some(slot) => slot.1 = value,
            None => self.flags.push((name, value)),
        }
        self
    }

    pub(super) fn set_json_flag(self, name: &'static str, value: impl Into<Value>) -> Self {
        self.set_flag(name, FlagValue::Json(value.into()))
    }
}
