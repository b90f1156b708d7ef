use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use xltemplate_common::LiteralValue;

/// Source of values for placeholder keys.
///
/// A `None` is a miss, never an error: a missing scalar renders as the empty
/// string and a missing loop leaves its block unexpanded.
pub trait ValueResolver {
    fn resolve_scalar(&self, key: &str) -> Option<LiteralValue>;

    fn resolve_loop(&self, key: &str) -> Option<&LoopDataset>;
}

impl<T: ValueResolver + ?Sized> ValueResolver for &T {
    fn resolve_scalar(&self, key: &str) -> Option<LiteralValue> {
        (**self).resolve_scalar(key)
    }

    fn resolve_loop(&self, key: &str) -> Option<&LoopDataset> {
        (**self).resolve_loop(key)
    }
}

/// One element of a loop's data collection.
pub trait Record {
    /// Value of the field with the given source identifier.
    fn field(&self, id: &str) -> Option<LiteralValue>;
}

/// Record backed by a field-name → value map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapRecord {
    fields: BTreeMap<String, LiteralValue>,
}

impl MapRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, value: impl Into<LiteralValue>) -> Self {
        self.insert(id, value);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<LiteralValue>) {
        self.fields.insert(id.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Record for MapRecord {
    fn field(&self, id: &str) -> Option<LiteralValue> {
        self.fields.get(id).cloned()
    }
}

impl<K: Into<String>, V: Into<LiteralValue>> FromIterator<(K, V)> for MapRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Record built from an object's named attributes.
///
/// Any `Serialize` struct or map works; its fields are captured by name at
/// construction time.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeRecord {
    attributes: serde_json::Map<String, JsonValue>,
}

impl AttributeRecord {
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(value)? {
            JsonValue::Object(attributes) => Ok(Self { attributes }),
            other => Err(serde_json::Error::custom(format!(
                "loop records must serialize to an object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl Record for AttributeRecord {
    fn field(&self, id: &str) -> Option<LiteralValue> {
        self.attributes.get(id).map(json_to_literal)
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Convert a JSON (or YAML-decoded) value into a cell value.
///
/// Integers stay integral; nested arrays and objects are written as their
/// compact JSON text.
pub fn json_to_literal(value: &JsonValue) -> LiteralValue {
    match value {
        JsonValue::Null => LiteralValue::Empty,
        JsonValue::Bool(b) => LiteralValue::Boolean(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => LiteralValue::Int(i),
            None => n.as_f64().map(LiteralValue::Number).unwrap_or_default(),
        },
        JsonValue::String(s) => LiteralValue::Text(s.clone()),
        nested => LiteralValue::Text(nested.to_string()),
    }
}

/// Ordered mapping from record field identifiers to template keys.
///
/// Lookups go from template key back to source, taking the first entry whose
/// target matches when several sources share a target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `source` to `target`. Re-mapping a source keeps its position.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let source = source.into();
        let target = target.into();
        match self.entries.iter_mut().find(|(s, _)| *s == source) {
            Some((_, existing)) => *existing = target,
            None => self.entries.push((source, target)),
        }
    }

    pub fn with(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.insert(source, target);
        self
    }

    /// First source key mapped to `target`.
    pub fn source_for(&self, target: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, t)| t == target)
            .map(|(s, _)| s.as_str())
    }

    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, t)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (source, target) in iter {
            map.insert(source, target);
        }
        map
    }
}

// Deserialized by hand so document order survives without an ordered map type.
impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of source field names to template keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
                let mut map = FieldMap::new();
                while let Some((source, target)) = access.next_entry::<String, String>()? {
                    map.insert(source, target);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

/// A named loop's records plus the field map used to address them.
#[derive(Default)]
pub struct LoopDataset {
    map: FieldMap,
    records: Vec<Box<dyn Record>>,
}

impl LoopDataset {
    pub fn new(map: FieldMap) -> Self {
        Self {
            map,
            records: Vec::new(),
        }
    }

    pub fn push<R: Record + 'static>(&mut self, record: R) {
        self.records.push(Box::new(record));
    }

    pub fn with_record<R: Record + 'static>(mut self, record: R) -> Self {
        self.push(record);
        self
    }

    pub fn with_records<R, I>(mut self, records: I) -> Self
    where
        R: Record + 'static,
        I: IntoIterator<Item = R>,
    {
        self.records
            .extend(records.into_iter().map(|r| Box::new(r) as Box<dyn Record>));
        self
    }

    pub fn field_map(&self) -> &FieldMap {
        &self.map
    }

    pub fn records(&self) -> impl ExactSizeIterator<Item = &dyn Record> {
        self.records.iter().map(|r| &**r as &dyn Record)
    }

    pub fn record(&self, index: usize) -> Option<&dyn Record> {
        self.records.get(index).map(|r| &**r as &dyn Record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Debug for LoopDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopDataset")
            .field("map", &self.map)
            .field("records", &self.records.len())
            .finish()
    }
}
