use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

use crate::definition::form_model::RENDERING_OPTIONS_KEY;
use crate::error::FieldStateError;

pub const FIELD_STATE_KEY: &str = "fieldState";

// ============================================================================
// State record
// ============================================================================

/// Persisted lifecycle record of one field identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStateRecord {
    /// Identifier the field had when first recorded. Never changes.
    #[serde(default)]
    pub identifier: String,

    #[serde(default)]
    pub label: String,

    #[serde(rename = "type")]
    pub element_type: String,

    #[serde(rename = "renderingOptions", default)]
    pub options: RecordOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordOptions {
    #[serde(default, deserialize_with = "legacy_flag")]
    pub deleted: bool,

    /// Shown in the results list by default
    #[serde(rename = "listView", default, deserialize_with = "legacy_flag")]
    pub list_view: bool,
}

impl FieldStateRecord {
    pub fn new(identifier: &str, label: &str, element_type: &str, list_view: bool) -> Self {
        Self {
            identifier: identifier.to_string(),
            label: label.to_string(),
            element_type: element_type.to_string(),
            options: RecordOptions {
                deleted: false,
                list_view,
            },
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.options.deleted
    }

    pub fn list_view(&self) -> bool {
        self.options.list_view
    }
}

/// Older definitions store flags as `0`/`1`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyFlag {
    Bool(bool),
    Int(i64),
    Str(String),
}

fn legacy_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LegacyFlag>::deserialize(deserializer)? {
        None => false,
        Some(LegacyFlag::Bool(b)) => b,
        Some(LegacyFlag::Int(i)) => i != 0,
        Some(LegacyFlag::Str(s)) => matches!(s.trim(), "1" | "true"),
    })
}

// ============================================================================
// State map
// ============================================================================

/// All known field identifiers of one definition, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldStateMap {
    records: Vec<FieldStateRecord>,
}

impl FieldStateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, identifier: &str) -> Option<&FieldStateRecord> {
        self.records.iter().find(|r| r.identifier == identifier)
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut FieldStateRecord> {
        self.records.iter_mut().find(|r| r.identifier == identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.get(identifier).is_some()
    }

    /// Insert, replacing any record with the same identifier in place.
    pub fn insert(&mut self, record: FieldStateRecord) {
        match self.get_mut(&record.identifier) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldStateRecord> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FieldStateRecord> {
        self.records.iter_mut()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.identifier.as_str())
    }

    pub fn active(&self) -> impl Iterator<Item = &FieldStateRecord> {
        self.records.iter().filter(|r| !r.is_deleted())
    }

    pub fn deleted(&self) -> impl Iterator<Item = &FieldStateRecord> {
        self.records.iter().filter(|r| r.is_deleted())
    }

    /// Read `renderingOptions.fieldState` from the definition root.
    /// A missing or null map reads as empty.
    pub fn from_definition(definition: &Value) -> Result<Self, FieldStateError> {
        let raw = definition
            .get(RENDERING_OPTIONS_KEY)
            .and_then(|opts| opts.get(FIELD_STATE_KEY));

        let entries = match raw {
            None | Some(Value::Null) => return Ok(Self::new()),
            Some(Value::Mapping(m)) => m,
            // An empty PHP array serializes as `[]`
            Some(Value::Sequence(s)) if s.is_empty() => return Ok(Self::new()),
            Some(_) => {
                return Err(FieldStateError::NotAMapping(format!(
                    "{}.{}",
                    RENDERING_OPTIONS_KEY, FIELD_STATE_KEY
                )));
            }
        };

        let mut map = Self::new();
        for (key, entry) in entries {
            let key = match key {
                Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
            };

            let mut record: FieldStateRecord = serde_yaml::from_value(entry.clone()).map_err(|e| {
                FieldStateError::MalformedState {
                    identifier: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            if record.identifier.is_empty() {
                record.identifier = key;
            }
            map.insert(record);
        }

        Ok(map)
    }

    /// Store the map at `renderingOptions.fieldState`, keyed by identifier.
    pub fn write_to(&self, definition: &mut Value) -> Result<(), FieldStateError> {
        let root = definition
            .as_mapping_mut()
            .ok_or_else(|| FieldStateError::NotAMapping("root".to_string()))?;

        let options_key = Value::String(RENDERING_OPTIONS_KEY.to_string());
        let options = root
            .entry(options_key)
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !options.is_mapping() {
            *options = Value::Mapping(Mapping::new());
        }

        let options = options
            .as_mapping_mut()
            .ok_or_else(|| FieldStateError::NotAMapping(RENDERING_OPTIONS_KEY.to_string()))?;
        options.insert(Value::String(FIELD_STATE_KEY.to_string()), self.to_value());
        Ok(())
    }

    pub fn to_value(&self) -> Value {
        let mut entries = Mapping::new();
        for record in &self.records {
            let value = serde_yaml::to_value(record).unwrap_or(Value::Null);
            entries.insert(Value::String(record.identifier.clone()), value);
        }
        Value::Mapping(entries)
    }
}

impl FromIterator<FieldStateRecord> for FieldStateMap {
    fn from_iter<I: IntoIterator<Item = FieldStateRecord>>(iter: I) -> Self {
        let mut map = Self::new();
        for record in iter {
            map.insert(record);
        }
        map
    }
}
