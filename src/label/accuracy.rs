use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::types::FieldKey;
use crate::constants::FIELD_COUNT;

/// Binary score per comparable field.
///
/// The canonical wire shape is a flat object with one `0`/`1` integer per field key. Other shapes
/// models have been seen to return (booleans, `"pass"`/`"fail"` strings, a `{ "fields": {...} }`
/// wrapper) are adapted in [`FieldAccuracy::from_value`] and never leave this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldAccuracy {
    scores: [bool; FIELD_COUNT],
}

impl Default for FieldAccuracy {
    fn default() -> Self {
        Self::all_failed()
    }
}

impl FieldAccuracy {
    pub fn all_failed() -> Self {
        Self {
            scores: [false; FIELD_COUNT],
        }
    }

    pub fn all_passed() -> Self {
        Self {
            scores: [true; FIELD_COUNT],
        }
    }

    fn index(key: FieldKey) -> usize {
        key as usize
    }

    pub fn is_accurate(&self, key: FieldKey) -> bool {
        self.scores[Self::index(key)]
    }

    /// Returns `0` or `1`.
    pub fn score(&self, key: FieldKey) -> u8 {
        u8::from(self.is_accurate(key))
    }

    pub fn set(&mut self, key: FieldKey, accurate: bool) {
        self.scores[Self::index(key)] = accurate;
    }

    pub fn with(mut self, key: FieldKey, accurate: bool) -> Self {
        self.set(key, accurate);
        self
    }

    pub fn all_accurate(&self) -> bool {
        self.scores.iter().all(|s| *s)
    }

    pub fn failed_fields(&self) -> Vec<FieldKey> {
        FieldKey::ALL
            .into_iter()
            .filter(|k| !self.is_accurate(*k))
            .collect()
    }

    /// Adapts a scoring response into the canonical shape.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let object = value
            .as_object()
            .ok_or_else(|| "scoring response is not an object".to_string())?;

        let fields = match object.get("fields") {
            Some(Value::Object(inner)) => inner,
            _ => object,
        };

        let mut accuracy = Self::all_failed();
        for key in FieldKey::ALL {
            let raw = fields
                .get(key.as_str())
                .ok_or_else(|| format!("scoring response is missing `{}`", key))?;
            let accurate = binary_score(raw)
                .ok_or_else(|| format!("`{}` is not a binary score: {}", key, raw))?;
            accuracy.set(key, accurate);
        }
        Ok(accuracy)
    }
}

fn binary_score(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => {
            let n = n.as_f64()?;
            if (0.0..=1.0).contains(&n) {
                Some(n >= 0.5)
            } else {
                None
            }
        }
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "pass" | "yes" => Some(true),
            "0" | "false" | "fail" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

impl Serialize for FieldAccuracy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for key in FieldKey::ALL {
            map.serialize_entry(key.as_str(), &self.score(key))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldAccuracy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Per-field scores plus the aggregate verdict.
///
/// `passed` is always the conjunction of `fields`; there is no way to build one that disagrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DecisionWire")]
pub struct AccuracyDecision {
    fields: FieldAccuracy,
    passed: bool,
}

#[derive(Deserialize)]
struct DecisionWire {
    fields: FieldAccuracy,
}

impl From<DecisionWire> for AccuracyDecision {
    fn from(wire: DecisionWire) -> Self {
        Self::new(wire.fields)
    }
}

impl From<FieldAccuracy> for AccuracyDecision {
    fn from(fields: FieldAccuracy) -> Self {
        Self::new(fields)
    }
}

impl AccuracyDecision {
    pub fn new(fields: FieldAccuracy) -> Self {
        Self {
            passed: fields.all_accurate(),
            fields,
        }
    }

    pub fn fields(&self) -> &FieldAccuracy {
        &self.fields
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn is_accurate(&self, key: FieldKey) -> bool {
        self.fields.is_accurate(key)
    }
}
