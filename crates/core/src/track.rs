//! The static track table.
//!
//! Each customer carries three independent tracks. A track is defined by an
//! ordered field list and a required subset; this table drives form
//! rendering, role gating, diffing, and save-time validation. It is static
//! per deployment - a mismatch between `required` here and what the backend
//! enforces causes silent save failures, so the table changes only in
//! lockstep with the backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Customer, FieldKind, FieldValue};

/// Lookup table names served by the reference endpoints.
pub const LOOKUP_NAMES: [&str; 7] = [
    "payment-status",
    "payment-method",
    "admin-approval",
    "agreement-status",
    "settlement-status",
    "settlement-type",
    "package-name",
];

/// Static description of one track field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Must be present (non-null, non-empty, checked) for a save to submit.
    pub required: bool,
    /// Writable only by an admin actor.
    pub admin_only: bool,
    /// Lookup table resolving this field's id to a display label.
    pub lookup: Option<&'static str>,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            admin_only: false,
            lookup: None,
        }
    }

    const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    const fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    const fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    const fn checkbox(name: &'static str) -> Self {
        Self::new(name, FieldKind::Checkbox)
    }

    const fn file(name: &'static str) -> Self {
        Self::new(name, FieldKind::File)
    }

    const fn select(name: &'static str, lookup: &'static str) -> Self {
        let mut spec = Self::new(name, FieldKind::Select);
        spec.lookup = Some(lookup);
        spec
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }
}

const PAYMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::select("package_name", "package-name"),
    FieldSpec::date("package_expiry"),
    FieldSpec::checkbox("profile_highlighter"),
    FieldSpec::checkbox("account_status"),
    FieldSpec::checkbox("profile_verified"),
    FieldSpec::select("payment_status", "payment-status").required(),
    FieldSpec::select("payment_method", "payment-method").required(),
    FieldSpec::number("payment_amount"),
    FieldSpec::date("payment_date"),
    FieldSpec::file("payment_receipt"),
    FieldSpec::select("payment_admin_approval", "admin-approval")
        .required()
        .admin_only(),
    FieldSpec::text("bank_name"),
    FieldSpec::text("account_holder_name"),
];

const AGREEMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::select("agreement_status", "agreement-status").required(),
    FieldSpec::file("agreement_file"),
    FieldSpec::select("admin_agreement_approval", "admin-approval")
        .required()
        .admin_only(),
];

const SETTLEMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::select("settlement_status", "settlement-status").required(),
    FieldSpec::text("settlement_by"),
    FieldSpec::number("settlement_amount"),
    FieldSpec::select("settlement_type", "settlement-type").required(),
    FieldSpec::date("settlement_date"),
    FieldSpec::file("settlement_receipt"),
    FieldSpec::select("settlement_admin_approval", "admin-approval")
        .required()
        .admin_only(),
];

/// One of the three independent sub-workflows on a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Payment,
    Agreement,
    Settlement,
}

impl Track {
    pub const ALL: [Self; 3] = [Self::Payment, Self::Agreement, Self::Settlement];

    /// The track's ordered field list.
    #[must_use]
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Payment => PAYMENT_FIELDS,
            Self::Agreement => AGREEMENT_FIELDS,
            Self::Settlement => SETTLEMENT_FIELDS,
        }
    }

    /// Look up a field spec by name within this track.
    #[must_use]
    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.name == name)
    }

    /// The employee-settable stage field of this track.
    #[must_use]
    pub const fn status_field(self) -> &'static str {
        match self {
            Self::Payment => "payment_status",
            Self::Agreement => "agreement_status",
            Self::Settlement => "settlement_status",
        }
    }

    /// The admin-only approval gate field of this track.
    #[must_use]
    pub const fn approval_field(self) -> &'static str {
        match self {
            Self::Payment => "payment_admin_approval",
            Self::Agreement => "admin_agreement_approval",
            Self::Settlement => "settlement_admin_approval",
        }
    }

    /// Single-letter label used on badge rows (P/A/S).
    #[must_use]
    pub const fn initial(self) -> char {
        match self {
            Self::Payment => 'P',
            Self::Agreement => 'A',
            Self::Settlement => 'S',
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payment => write!(f, "payment"),
            Self::Agreement => write!(f, "agreement"),
            Self::Settlement => write!(f, "settlement"),
        }
    }
}

impl std::str::FromStr for Track {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(Self::Payment),
            "agreement" => Ok(Self::Agreement),
            "settlement" => Ok(Self::Settlement),
            _ => Err(format!("invalid track: {s}")),
        }
    }
}

/// Errors raised when manipulating a track draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackError {
    /// The field does not belong to the track being edited.
    #[error("unknown field `{name}` on {track} track")]
    UnknownField { track: Track, name: String },
}

/// The editable working copy of one track's fields.
///
/// Built from the baseline record when editing begins; mutated field by
/// field; diffed against the baseline on save. Holds every field of its
/// track so viewing and editing share one projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDraft {
    track: Track,
    values: BTreeMap<&'static str, FieldValue>,
}

impl TrackDraft {
    /// Project one track of a customer record into an editable draft.
    #[must_use]
    pub fn from_customer(track: Track, customer: &Customer) -> Self {
        let values = track
            .fields()
            .iter()
            .map(|spec| (spec.name, customer.field(spec.name)))
            .collect();
        Self { track, values }
    }

    #[must_use]
    pub const fn track(&self) -> Track {
        self.track
    }

    /// Current value of a field; `Null` for anything outside the track.
    #[must_use]
    pub fn get(&self, name: &str) -> FieldValue {
        self.values.get(name).cloned().unwrap_or_default()
    }

    /// Replace one field's value.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::UnknownField`] when the field is not part of
    /// this track. Role gating happens in the edit session, not here.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), TrackError> {
        let spec = self
            .track
            .field(name)
            .ok_or_else(|| TrackError::UnknownField {
                track: self.track,
                name: name.to_string(),
            })?;
        self.values.insert(spec.name, value);
        Ok(())
    }

    /// Iterate `(name, value)` pairs in the track's declared field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.track
            .fields()
            .iter()
            .filter_map(|spec| self.values.get(spec.name).map(|v| (spec.name, v)))
    }
}
