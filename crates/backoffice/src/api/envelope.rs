//! Tolerant list envelopes.
//!
//! List endpoints return either a bare array or `{results: [...]}`
//! depending on pagination settings server-side. Anything else is treated
//! as an empty list and logged, never surfaced as an error - partially
//! usable data must not take down a whole screen.

use serde::Deserialize;
use serde_json::Value;

/// The shapes a list endpoint may respond with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { results: Vec<T> },
    Other(Value),
}

impl<T> ListEnvelope<T> {
    /// Unwrap into rows, degrading unknown shapes to empty.
    pub fn into_rows(self, context: &str) -> Vec<T> {
        match self {
            Self::Bare(rows) => rows,
            Self::Wrapped { results } => results,
            Self::Other(value) => {
                tracing::warn!(
                    context,
                    shape = value_shape(&value),
                    "unexpected list envelope, treating as empty"
                );
                Vec::new()
            }
        }
    }
}

fn value_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
