//! Fluent methods shared by every kind

use serde_json::Value;

use super::types::{Example, FlagValue, Presence, Schema};

impl Schema {
    /// Adds values to the open allow-list.
    pub fn allow<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.valids.extend(values.into_iter().map(Into::into));
        self
    }

    /// Adds values to the allow-list and makes it exclusive.
    pub fn valid<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allow(values).set_json_flag("allowOnly", true)
    }

    /// Adds disallowed values.
    pub fn invalid<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.invalids.extend(values.into_iter().map(Into::into));
        self
    }

    /// Sets the presence mode.
    pub fn presence(self, mode: Presence) -> Self {
        self.set_json_flag("presence", mode.as_str())
    }

    pub fn required(self) -> Self {
        self.presence(Presence::Required)
    }

    pub fn optional(self) -> Self {
        self.presence(Presence::Optional)
    }

    pub fn forbidden(self) -> Self {
        self.presence(Presence::Forbidden)
    }

    /// Sets the fallback value supplied when input is missing.
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.set_json_flag("default", value)
    }

    /// Keeps the raw input instead of the coerced result.
    pub fn raw(self, enabled: bool) -> Self {
        self.set_json_flag("raw", enabled)
    }

    /// Strips the value from the validated result.
    pub fn strip(self, enabled: bool) -> Self {
        self.set_json_flag("strip", enabled)
    }

    /// Overrides the reported error.
    pub fn error(self, message: impl Into<Value>) -> Self {
        self.set_json_flag("error", message)
    }

    /// Treats values matching the given schema as absent.
    pub fn empty(self, schema: Schema) -> Self {
        self.set_flag("empty", FlagValue::Schema(Box::new(schema)))
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.metadata.description = Some(text.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<Value>) -> Self {
        self.metadata.notes = Some(notes.into());
        self
    }

    pub fn tags(mut self, tags: impl Into<Value>) -> Self {
        self.metadata.tags = Some(tags.into());
        self
    }

    pub fn meta(mut self, meta: impl Into<Value>) -> Self {
        self.metadata.meta = Some(meta.into());
        self
    }

    /// Records one example, optionally with per-example options.
    pub fn example(mut self, value: impl Into<Value>, options: Option<Value>) -> Self {
        self.metadata.examples.push(Example {
            value: value.into(),
            options,
        });
        self
    }

    pub fn unit(mut self, name: impl Into<String>) -> Self {
        self.metadata.unit = Some(name.into());
        self
    }

    pub fn label(mut self, name: impl Into<String>) -> Self {
        self.metadata.label = Some(name.into());
        self
    }

    /// Sets the validation options bag.
    pub fn options(mut self, bag: impl Into<Value>) -> Self {
        self.metadata.options = Some(bag.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_marks_allow_only() {
        let schema = Schema::any().valid([1, 2]);
        assert!(matches!(
            schema.flag("allowOnly").and_then(FlagValue::as_json),
            Some(Value::Bool(true))
        ));
        assert_eq!(schema.valids, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_allow_stays_open() {
        let schema = Schema::any().allow(["a"]);
        assert!(schema.flag("allowOnly").is_none());
        assert_eq!(schema.valids, vec![json!("a")]);
    }

    #[test]
    fn test_presence_conveniences() {
        let schema = Schema::any().required();
        assert_eq!(
            schema.flag("presence").and_then(FlagValue::as_json),
            Some(&json!("required"))
        );
    }

    #[test]
    fn test_empty_carries_sub_schema() {
        let schema = Schema::string().empty(Schema::string().valid([""]));
        assert!(matches!(schema.flag("empty"), Some(FlagValue::Schema(_))));
    }
}
