//! Required-field validation before a save.
//!
//! Validation runs client-side on the whole draft, before any network
//! call; backend field errors are merged into the same [`FieldErrors`]
//! shape so the two surface identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::track::TrackDraft;

/// Field-scoped error messages, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Fold another error set into this one (used when backend field
    /// errors join client-side ones).
    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Check the track's required subset against a draft.
///
/// A required field that is null, an empty string, or an unchecked
/// checkbox fails. Existing record values count: an employee saving a
/// track whose admin-approval is already set passes, even though the
/// field is not theirs to edit.
///
/// # Errors
///
/// Returns the per-field messages for every missing required field.
pub fn validate_track(draft: &TrackDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for spec in draft.track().fields() {
        if spec.required && draft.get(spec.name).is_missing() {
            errors.push(spec.name, "This field is required.");
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;
    use crate::types::{Customer, FieldValue, OptionId};

    #[test]
    fn test_empty_agreement_status_fails_validation() {
        let mut customer = Customer::empty("c-1");
        customer.admin_agreement_approval = Some(OptionId::new("3"));
        let draft = TrackDraft::from_customer(Track::Agreement, &customer);

        let errors = validate_track(&draft).expect_err("missing status");
        assert_eq!(errors.get("agreement_status"), ["This field is required."]);
        assert_eq!(errors.get("admin_agreement_approval"), [] as [String; 0]);
    }

    #[test]
    fn test_complete_required_subset_passes() {
        let mut customer = Customer::empty("c-2");
        customer.settlement_status = Some(OptionId::new("1"));
        customer.settlement_type = Some(OptionId::new("2"));
        customer.settlement_admin_approval = Some(OptionId::new("3"));
        let draft = TrackDraft::from_customer(Track::Settlement, &customer);
        assert!(validate_track(&draft).is_ok());
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let mut customer = Customer::empty("c-3");
        customer.payment_status = Some(OptionId::new("1"));
        customer.payment_method = Some(OptionId::new("1"));
        customer.payment_admin_approval = Some(OptionId::new("3"));
        let mut draft = TrackDraft::from_customer(Track::Payment, &customer);
        draft
            .set("payment_status", FieldValue::Text(String::new()))
            .expect("set");

        let errors = validate_track(&draft).expect_err("blank status");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("payment_status"), ["This field is required."]);
    }

    #[test]
    fn test_merge_and_display() {
        let mut a = FieldErrors::new();
        a.push("payment_status", "This field is required.");
        let mut b = FieldErrors::new();
        b.push("payment_status", "Invalid choice.");
        b.push("payment_amount", "Must be positive.");
        a.merge(b);

        assert_eq!(a.get("payment_status").len(), 2);
        let rendered = a.to_string();
        assert!(rendered.contains("payment_amount: Must be positive."));
        assert!(rendered.contains("; "));
    }
}
