//! Total label resolution for display.
//!
//! Partially-loaded lookup data must never crash list rendering, so every
//! function here is pure and total: unknown input degrades to `"N/A"` or a
//! stringified id, never an error.

use crate::track::FieldSpec;
use crate::types::{FieldKind, FieldValue, LookupOption, OptionId, canonical_amount};

/// Placeholder shown for absent or unresolvable values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Find an option's label by id within one loaded table.
#[must_use]
pub fn find_label<'a>(options: &'a [LookupOption], id: &OptionId) -> Option<&'a str> {
    options
        .iter()
        .find(|option| option.id == *id)
        .map(|option| option.label.as_str())
}

/// Resolve one field's display label.
///
/// Rules, in order:
/// - boolean-valued fields render `"Yes"`/`"No"` regardless of lookup
///   tables;
/// - a null/empty value renders `"N/A"`;
/// - a select with a registered table renders the matched label, or
///   `"N/A"` when the id is absent from the table;
/// - a select with no registered table renders the literal id;
/// - scalar kinds render their canonical display form.
#[must_use]
pub fn resolve_label(
    spec: &FieldSpec,
    value: &FieldValue,
    options: Option<&[LookupOption]>,
) -> String {
    if spec.kind == FieldKind::Checkbox {
        let checked = matches!(value, FieldValue::Bool(true));
        return if checked { "Yes" } else { "No" }.to_string();
    }

    match value {
        FieldValue::Null => NOT_AVAILABLE.to_string(),
        FieldValue::Text(s) if s.is_empty() => NOT_AVAILABLE.to_string(),
        FieldValue::Select(id) => options.map_or_else(
            || id.as_str().to_string(),
            |table| {
                find_label(table, id)
                    .unwrap_or(NOT_AVAILABLE)
                    .to_string()
            },
        ),
        FieldValue::Text(s) => s.clone(),
        FieldValue::Number(n) => canonical_amount(*n),
        FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        FieldValue::FileRef(url) => url.clone(),
        FieldValue::Upload(upload) => upload.filename.clone(),
        FieldValue::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
    }
}
