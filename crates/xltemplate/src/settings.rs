use crate::error::TemplatorError;
use crate::resolver::{FieldMap, LoopDataset, MapRecord, ValueResolver, json_to_literal};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::Path;
use xltemplate_common::LiteralValue;

/// In-memory scalar values and named loop datasets for one render.
///
/// Settings can be assembled in code or loaded from a JSON or YAML document:
///
/// ```yaml
/// values:
///   TITLE: Invoice
/// loops:
///   ITEMS:
///     map: { name: ITEM_NAME, qty: QTY }
///     records:
///       - { name: Pen, qty: 3 }
///       - { name: Book, qty: 1 }
/// ```
#[derive(Debug, Default)]
pub struct Settings {
    values: BTreeMap<String, LiteralValue>,
    loops: BTreeMap<String, LoopDataset>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsDoc {
    #[serde(default)]
    values: BTreeMap<String, JsonValue>,
    #[serde(default)]
    loops: BTreeMap<String, LoopDoc>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LoopDoc {
    #[serde(default)]
    map: FieldMap,
    #[serde(default)]
    records: Vec<BTreeMap<String, JsonValue>>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<LiteralValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<LiteralValue>) -> Self {
        self.set_value(key, value);
        self
    }

    pub fn add_loop(&mut self, key: impl Into<String>, data: LoopDataset) {
        self.loops.insert(key.into(), data);
    }

    pub fn with_loop(mut self, key: impl Into<String>, data: LoopDataset) -> Self {
        self.add_loop(key, data);
        self
    }

    pub fn value(&self, key: &str) -> Option<&LiteralValue> {
        self.values.get(key)
    }

    pub fn loop_data(&self, key: &str) -> Option<&LoopDataset> {
        self.loops.get(key)
    }

    pub fn loop_keys(&self) -> impl Iterator<Item = &str> {
        self.loops.keys().map(String::as_str)
    }

    pub fn from_json_str(text: &str) -> Result<Self, TemplatorError> {
        let doc: SettingsDoc = serde_json::from_str(text)?;
        Ok(doc.into())
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, TemplatorError> {
        let doc: SettingsDoc = serde_yaml::from_str(text)?;
        Ok(doc.into())
    }

    /// Load a settings file, choosing the parser by extension.
    pub fn from_path(path: &Path) -> Result<Self, TemplatorError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let read = || {
            std::fs::read_to_string(path).map_err(|source| TemplatorError::Read {
                path: path.to_path_buf(),
                source,
            })
        };
        match ext.as_deref() {
            Some("json") => Self::from_json_str(&read()?),
            Some("yaml" | "yml") => Self::from_yaml_str(&read()?),
            _ => Err(TemplatorError::SettingsFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl From<SettingsDoc> for Settings {
    fn from(doc: SettingsDoc) -> Self {
        let values = doc
            .values
            .into_iter()
            .map(|(key, value)| (key, json_to_literal(&value)))
            .collect();
        let loops = doc
            .loops
            .into_iter()
            .map(|(key, lp)| {
                let records = lp.records.into_iter().map(|fields| {
                    fields
                        .iter()
                        .map(|(id, value)| (id.clone(), json_to_literal(value)))
                        .collect::<MapRecord>()
                });
                (key, LoopDataset::new(lp.map).with_records(records))
            })
            .collect();
        Settings { values, loops }
    }
}

impl ValueResolver for Settings {
    fn resolve_scalar(&self, key: &str) -> Option<LiteralValue> {
        self.values.get(key).cloned()
    }

    fn resolve_loop(&self, key: &str) -> Option<&LoopDataset> {
        self.loops.get(key)
    }
}
