use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key carried by a fault record instead of any data fields.
pub const FAULT_KEY: &str = "error";

/// One registry entity description, or the fault left behind by a failed fetch.
///
/// A record is either fault-shaped (it has an `error` key) or data-shaped.
/// Field accessors below return nothing for a fault record, so rules never
/// read data out of one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    fields: Map<String, Value>,
}

impl MetadataRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fault(message: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(FAULT_KEY.to_string(), Value::String(message.into()));
        Self { fields }
    }

    /// Builds a record from an arbitrary JSON value. Anything other than an
    /// object becomes a fault record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            other => Self::fault(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )),
        }
    }

    pub fn is_fault(&self) -> bool {
        self.fields.contains_key(FAULT_KEY)
    }

    pub fn fault_message(&self) -> Option<&str> {
        self.fields.get(FAULT_KEY).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Data fields, or `None` for a fault record.
    pub fn data(&self) -> Option<&Map<String, Value>> {
        if self.is_fault() {
            None
        } else {
            Some(&self.fields)
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data()?.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Field `key` of the nested object `block`. Missing or non-object
    /// blocks yield `None`.
    pub fn get_nested(&self, block: &str, key: &str) -> Option<&Value> {
        self.get(block)?.as_object()?.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for MetadataRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Article-prefixed name of a JSON value's type, for messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
