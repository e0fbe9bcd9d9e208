//! Schema capability: fluent constructors plus introspection
//!
//! The live [`Schema`] value is a recording builder. Fluent methods append
//! to an ordered rule list, upsert a position-stable flag list, or update
//! typed per-kind option state; [`Schema::describe`] projects the whole
//! configuration into a portable [`crate::Description`]. Runtime value
//! checking is deliberately out of scope.

mod base;
mod describe;
mod kinds;
mod symbol;
mod types;

pub use kinds::RegexOptions;
pub use symbol::Symbol;
pub use types::{
    Assertion, Dependency, Example, FlagValue, KeyMatcher, KindState, PatternEntry, Presence,
    Relation, Rename, RenameSource, Rule, Schema, SymbolTarget, TimestampUnit,
};
