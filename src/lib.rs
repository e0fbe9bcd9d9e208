//! schemaport - rebuild live validation schemas from portable descriptions
//!
//! A schema assembled with the fluent [`schema`] constructors can be
//! introspected into a JSON-compatible [`Description`], carried across a
//! process boundary, and reconstructed with [`deserialize`] without
//! re-running the original construction code.

pub mod description;
pub mod deserialize;
pub mod pattern;
pub mod registry;
pub mod schema;

pub use description::{Description, RuleDesc};
pub use deserialize::{deserialize, serialize, DeserializeError, DeserializeOptions, DeserializeResult};
pub use schema::{Schema, Symbol};
