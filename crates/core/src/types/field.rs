//! Field kinds and the universal field value used by drafts and diffs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::OptionId;

/// The type of a track field, driving form rendering, encoding, and
/// save-time validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    /// Two-decimal semantics on display and comparison.
    Number,
    /// ISO 8601 date; any time component is truncated.
    Date,
    /// Resolved to a display label via a lookup table.
    Select,
    Checkbox,
    /// Binary, nullable, replace-or-remove semantics.
    File,
}

/// A file picked locally but not yet persisted.
///
/// Carried in memory until the multipart submit; the backend turns it into
/// a URL in its response.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// One field's value, uniform across all field kinds.
///
/// Drafts and change sets are maps of these; the typed [`Customer`] record
/// projects into them per track.
///
/// [`Customer`]: super::Customer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
    Select(OptionId),
    Bool(bool),
    /// A file already stored on the backend, referenced by URL.
    FileRef(String),
    /// A replacement file held in memory until submit.
    Upload(FileUpload),
}

impl FieldValue {
    /// Canonical JSON form used for structural diff comparison.
    ///
    /// Returns `None` for [`FieldValue::Upload`]: an in-memory file is
    /// always considered changed relative to a URL or null original, so it
    /// has no canonical form to compare.
    #[must_use]
    pub fn canonical(&self) -> Option<Value> {
        match self {
            Self::Null => Some(Value::Null),
            Self::Text(s) => Some(Value::String(s.clone())),
            Self::Number(n) => Some(Value::String(canonical_amount(*n))),
            Self::Date(d) => Some(Value::String(d.format("%Y-%m-%d").to_string())),
            Self::Select(id) => Some(Value::String(id.as_str().to_string())),
            Self::Bool(b) => Some(Value::Bool(*b)),
            Self::FileRef(url) => Some(Value::String(url.clone())),
            Self::Upload(_) => None,
        }
    }

    /// JSON encoding for a PATCH body.
    ///
    /// Uploads encode as null here; a change set containing an upload is
    /// encoded as multipart instead, where the bytes travel as a part.
    #[must_use]
    pub fn json_value(&self) -> Value {
        match self {
            Self::Null | Self::Upload(_) => Value::Null,
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => Value::String(canonical_amount(*n)),
            Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            Self::Select(id) => Value::String(id.as_str().to_string()),
            Self::Bool(b) => Value::Bool(*b),
            Self::FileRef(url) => Value::String(url.clone()),
        }
    }

    /// Text encoding for a multipart form part (non-file fields).
    #[must_use]
    pub fn form_text(&self) -> String {
        match self {
            Self::Null | Self::Upload(_) => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => canonical_amount(*n),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Select(id) => id.as_str().to_string(),
            Self::Bool(b) => b.to_string(),
            Self::FileRef(url) => url.clone(),
        }
    }

    /// Whether the value counts as missing for required-field validation:
    /// null, an empty string, or an unchecked checkbox.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            Self::Bool(b) => !b,
            _ => false,
        }
    }

    /// Whether this value holds in-memory file bytes.
    #[must_use]
    pub const fn is_upload(&self) -> bool {
        matches!(self, Self::Upload(_))
    }
}

/// Two-decimal canonical form for amounts: `10.5` and `10.50` compare equal
/// and display identically.
#[must_use]
pub fn canonical_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Parse a date field, truncating any time component.
///
/// The backend is inconsistent between `"2024-03-01"` and full ISO
/// datetimes; only the date part is meaningful here.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn test_amounts_compare_at_two_decimals() {
        let a = FieldValue::Number(dec("10.5"));
        let b = FieldValue::Number(dec("10.50"));
        assert_eq!(a.canonical(), b.canonical());

        let c = FieldValue::Number(dec("10.51"));
        assert_ne!(a.canonical(), c.canonical());
    }

    #[test]
    fn test_upload_has_no_canonical_form() {
        let upload = FieldValue::Upload(FileUpload {
            filename: "receipt.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        });
        assert_eq!(upload.canonical(), None);
        assert!(upload.is_upload());
    }

    #[test]
    fn test_missing_semantics() {
        assert!(FieldValue::Null.is_missing());
        assert!(FieldValue::Text(String::new()).is_missing());
        assert!(FieldValue::Bool(false).is_missing());
        assert!(!FieldValue::Bool(true).is_missing());
        assert!(!FieldValue::Text("x".to_string()).is_missing());
        assert!(!FieldValue::Select(OptionId::new("1")).is_missing());
    }

    #[test]
    fn test_parse_date_truncates_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
        assert_eq!(parse_date("2024-03-01"), Some(expected));
        assert_eq!(parse_date("2024-03-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_form_text_encodings() {
        assert_eq!(FieldValue::Bool(true).form_text(), "true");
        assert_eq!(FieldValue::Null.form_text(), "");
        assert_eq!(FieldValue::Select(OptionId::new("4")).form_text(), "4");
        assert_eq!(FieldValue::Number(dec("99.9")).form_text(), "99.90");
    }
}
