//! Changed-field computation between a baseline record and a track draft.
//!
//! The partial-update discipline sends exactly the fields whose canonical
//! forms differ - nothing else - so a concurrent edit to an untouched field
//! is never overwritten by this session.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::track::{Track, TrackDraft};
use crate::types::{Customer, FieldValue, Role};

/// The minimal changed-field set for one track submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    track: Track,
    changes: BTreeMap<&'static str, FieldValue>,
}

impl ChangeSet {
    #[must_use]
    pub const fn track(&self) -> Track {
        self.track
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.changes.get(name)
    }

    /// Whether any changed field carries in-memory file bytes, forcing
    /// multipart encoding for the whole submission.
    #[must_use]
    pub fn has_upload(&self) -> bool {
        self.changes.values().any(FieldValue::is_upload)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.changes.iter().map(|(name, value)| (*name, value))
    }

    /// Changed field names, in the track's declared order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.track
            .fields()
            .iter()
            .filter_map(|spec| self.changes.contains_key(spec.name).then_some(spec.name))
            .collect()
    }

    /// JSON object for a changed-fields-only PATCH body.
    ///
    /// Only meaningful when [`Self::has_upload`] is false; uploads travel
    /// as multipart parts instead.
    #[must_use]
    pub fn json_body(&self) -> Map<String, Value> {
        self.changes
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.json_value()))
            .collect()
    }
}

/// Compute the changed-field set of a draft against its baseline record.
///
/// Only fields the role may edit participate: whatever an employee's draft
/// claims about an admin-approval field, the submission never contains it.
/// A file upload is always considered changed relative to a URL or null
/// original.
#[must_use]
pub fn diff_track(original: &Customer, draft: &TrackDraft, role: Role) -> ChangeSet {
    let track = draft.track();
    let mut changes = BTreeMap::new();

    for spec in track.fields() {
        if !role.may_edit(spec) {
            continue;
        }
        let edited = draft.get(spec.name);
        let changed = match (original.field(spec.name).canonical(), edited.canonical()) {
            (Some(before), Some(after)) => before != after,
            // An in-memory upload has no canonical form: always changed.
            _ => true,
        };
        if changed {
            changes.insert(spec.name, edited);
        }
    }

    ChangeSet { track, changes }
}
