//! Lookup options - enumeration values served by the reference endpoints.
//!
//! The backend is loose about wire shapes: the id may arrive under `id`,
//! `pk`, or `value`, the display text under `name`, `label`, `display`, or
//! `value`, and either may be a number or a string. All of that tolerance
//! lives here so the rest of the crate only ever sees `LookupOption`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Synonym keys for an option's id, in priority order.
const ID_KEYS: [&str; 3] = ["id", "pk", "value"];

/// Synonym keys for an option's display text, in priority order.
const LABEL_KEYS: [&str; 4] = ["name", "label", "display", "value"];

/// Reference to a lookup option, stored as its canonical string form.
///
/// Record fields and lookup tables disagree about numeric vs string ids
/// (`2` vs `"2"`), so ids are canonicalized to strings at the boundary and
/// compared as strings everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OptionId(String);

impl OptionId {
    /// Create an id from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Canonicalize a raw JSON scalar into an id.
    ///
    /// Returns `None` for null, empty strings, and non-scalar values.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Borrow the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OptionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for OptionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("expected a string or numeric id"))
    }
}

/// One `{id, label}` pair from a reference endpoint.
///
/// Immutable within a session; referenced by id from customer fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupOption {
    pub id: OptionId,
    pub label: String,
}

impl LookupOption {
    /// Build an option from a raw JSON object, trying the synonym keys for
    /// id and label in fixed priority order.
    ///
    /// Returns `None` when no id or no label can be extracted; callers skip
    /// such entries rather than failing the whole table.
    #[must_use]
    pub fn from_value(raw: &Value) -> Option<Self> {
        let obj = raw.as_object()?;
        let id = ID_KEYS
            .iter()
            .find_map(|key| obj.get(*key).and_then(OptionId::from_value))?;
        let label = option_label(raw)?;
        Some(Self { id, label })
    }
}

/// Extract an option's display text from a raw JSON object, trying the
/// synonym keys (`name`, `label`, `display`, `value`) in priority order.
///
/// This is the only place that knows about the synonyms; nothing else
/// branches on the source field's runtime shape.
#[must_use]
pub fn option_label(raw: &Value) -> Option<String> {
    let obj = raw.as_object()?;
    LABEL_KEYS.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
