//! Per-track edit sessions over one selected customer.
//!
//! Each of the three tracks moves independently through
//! Viewing -> Editing -> Submitting -> Viewing. The protocol is split into
//! [`EditSession::prepare_save`] (validate, diff, lock) and
//! [`EditSession::resolve_save`] (reconcile the response or roll the state
//! back), with [`EditSession::save`] wiring the two around the HTTP call.
//! The split keeps the whole state machine drivable - and testable -
//! without a network.
//!
//! A response is only applied when its [`RequestTag`] still matches the
//! track's in-flight submission; anything else (a cancel raced the
//! response, a different customer was selected) is discarded.

use uuid::Uuid;

use vivaha_core::diff::{ChangeSet, diff_track};
use vivaha_core::track::{Track, TrackDraft};
use vivaha_core::validate::{FieldErrors, validate_track};
use vivaha_core::{Customer, CustomerId, FieldValue, Role};

use crate::api::ApiClient;
use crate::error::ApiError;

/// Identifies one dispatched submission: which customer, which track,
/// which attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag {
    pub customer: CustomerId,
    pub track: Track,
    nonce: Uuid,
}

impl RequestTag {
    fn new(customer: CustomerId, track: Track) -> Self {
        Self {
            customer,
            track,
            nonce: Uuid::new_v4(),
        }
    }
}

/// Transient per-track notice for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The save committed and the track shows server-confirmed values.
    Saved,
    /// Save was requested with zero changed fields; nothing was sent.
    NoChanges,
}

/// Externally visible state of one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Viewing,
    Editing,
    Submitting,
}

#[derive(Debug)]
enum TrackPhase {
    Viewing,
    Editing {
        draft: TrackDraft,
        errors: FieldErrors,
    },
    Submitting {
        draft: TrackDraft,
        tag: RequestTag,
    },
}

#[derive(Debug)]
struct TrackSlot {
    phase: TrackPhase,
    notice: Option<Notice>,
}

impl TrackSlot {
    const fn new() -> Self {
        Self {
            phase: TrackPhase::Viewing,
            notice: None,
        }
    }
}

/// Errors raised by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0} track is not being edited")]
    NotEditing(Track),
    #[error("{0} track is already being edited")]
    AlreadyEditing(Track),
    #[error("a submission is already in flight for the {0} track")]
    SubmissionInFlight(Track),
    #[error("field `{field}` is not editable by the {role} role")]
    FieldNotEditable { field: String, role: Role },
    #[error(transparent)]
    Track(#[from] vivaha_core::track::TrackError),
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A prepared submission, ready to be dispatched.
#[derive(Debug)]
pub struct PendingSubmission {
    pub tag: RequestTag,
    pub changes: ChangeSet,
}

/// Result of [`EditSession::prepare_save`].
#[derive(Debug)]
pub enum SavePrepared {
    /// Zero changed fields: no network call happens; the track returned
    /// to viewing with a notice.
    NoChanges,
    /// Validated, diffed, and locked; dispatch the change set.
    Pending(PendingSubmission),
}

/// Result of reconciling a response via [`EditSession::resolve_save`].
#[derive(Debug)]
pub enum SaveResolution {
    /// The response no longer matches any in-flight submission.
    Stale,
    /// Applied; the baseline now holds the server's projection.
    Saved(Customer),
    /// The submission failed; the track is back in editing with the
    /// draft intact.
    Failed(ApiError),
}

/// Outcome of the blocking [`EditSession::save`] convenience.
#[derive(Debug)]
pub enum SaveOutcome {
    NoChanges,
    Saved(Customer),
}

/// Edit state for one selected customer: a baseline record plus three
/// independent track slots.
///
/// Selecting a different customer means constructing a new session; the
/// old one's in-progress edits are silently discarded.
#[derive(Debug)]
pub struct EditSession {
    role: Role,
    baseline: Customer,
    payment: TrackSlot,
    agreement: TrackSlot,
    settlement: TrackSlot,
}

impl EditSession {
    #[must_use]
    pub const fn new(customer: Customer, role: Role) -> Self {
        Self {
            role,
            baseline: customer,
            payment: TrackSlot::new(),
            agreement: TrackSlot::new(),
            settlement: TrackSlot::new(),
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The current baseline record (server-confirmed values).
    #[must_use]
    pub const fn baseline(&self) -> &Customer {
        &self.baseline
    }

    #[must_use]
    pub const fn customer_id(&self) -> &CustomerId {
        self.baseline.id()
    }

    const fn slot(&self, track: Track) -> &TrackSlot {
        match track {
            Track::Payment => &self.payment,
            Track::Agreement => &self.agreement,
            Track::Settlement => &self.settlement,
        }
    }

    const fn slot_mut(&mut self, track: Track) -> &mut TrackSlot {
        match track {
            Track::Payment => &mut self.payment,
            Track::Agreement => &mut self.agreement,
            Track::Settlement => &mut self.settlement,
        }
    }

    #[must_use]
    pub const fn state(&self, track: Track) -> TrackState {
        match self.slot(track).phase {
            TrackPhase::Viewing => TrackState::Viewing,
            TrackPhase::Editing { .. } => TrackState::Editing,
            TrackPhase::Submitting { .. } => TrackState::Submitting,
        }
    }

    #[must_use]
    pub const fn notice(&self, track: Track) -> Option<Notice> {
        self.slot(track).notice
    }

    /// The working copy, while the track is in editing or submitting.
    #[must_use]
    pub const fn draft(&self, track: Track) -> Option<&TrackDraft> {
        match &self.slot(track).phase {
            TrackPhase::Viewing => None,
            TrackPhase::Editing { draft, .. } | TrackPhase::Submitting { draft, .. } => {
                Some(draft)
            }
        }
    }

    /// Field-level errors, while the track is in editing.
    #[must_use]
    pub const fn field_errors(&self, track: Track) -> Option<&FieldErrors> {
        match &self.slot(track).phase {
            TrackPhase::Editing { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// The value a form shows for one field: the draft while editing,
    /// the baseline otherwise.
    #[must_use]
    pub fn view_value(&self, track: Track, field: &str) -> FieldValue {
        self.draft(track)
            .map_or_else(|| self.baseline.field(field), |draft| draft.get(field))
    }

    /// Enter editing on one track; the other tracks keep their state.
    ///
    /// # Errors
    ///
    /// Fails when the track is already editing or has a submission in
    /// flight.
    pub fn begin_edit(&mut self, track: Track) -> Result<(), SessionError> {
        match self.slot(track).phase {
            TrackPhase::Viewing => {}
            TrackPhase::Editing { .. } => return Err(SessionError::AlreadyEditing(track)),
            TrackPhase::Submitting { .. } => {
                return Err(SessionError::SubmissionInFlight(track));
            }
        }
        let draft = TrackDraft::from_customer(track, &self.baseline);
        let slot = self.slot_mut(track);
        slot.phase = TrackPhase::Editing {
            draft,
            errors: FieldErrors::new(),
        };
        slot.notice = None;
        Ok(())
    }

    /// Change one field of the working copy.
    ///
    /// # Errors
    ///
    /// Fails when the track is not in editing, the field does not belong
    /// to the track, or the role may not write it (an employee can never
    /// stage an admin-approval value).
    pub fn set_field(
        &mut self,
        track: Track,
        field: &str,
        value: FieldValue,
    ) -> Result<(), SessionError> {
        if let Some(spec) = track.field(field)
            && !self.role.may_edit(spec)
        {
            return Err(SessionError::FieldNotEditable {
                field: field.to_string(),
                role: self.role,
            });
        }
        let TrackPhase::Editing { draft, .. } = &mut self.slot_mut(track).phase else {
            return Err(SessionError::NotEditing(track));
        };
        draft.set(field, value)?;
        Ok(())
    }

    /// Discard the working copy and return to viewing. No network call;
    /// an already-dispatched request cannot be aborted, but its response
    /// will no longer match and gets discarded.
    ///
    /// # Errors
    ///
    /// Fails when the track is already in viewing.
    pub fn cancel(&mut self, track: Track) -> Result<(), SessionError> {
        let slot = self.slot_mut(track);
        match slot.phase {
            TrackPhase::Viewing => Err(SessionError::NotEditing(track)),
            TrackPhase::Editing { .. } | TrackPhase::Submitting { .. } => {
                slot.phase = TrackPhase::Viewing;
                slot.notice = None;
                Ok(())
            }
        }
    }

    /// Validate and diff the track, locking it for submission.
    ///
    /// With zero changed fields the track returns straight to viewing and
    /// nothing is dispatched. Otherwise the track enters submitting and
    /// the returned change set must be dispatched and reconciled via
    /// [`Self::resolve_save`].
    ///
    /// # Errors
    ///
    /// [`SessionError::Validation`] when a required field is missing (the
    /// track stays in editing with field errors set); state errors when
    /// the track is not in editing or any track of this customer already
    /// has a submission in flight.
    pub fn prepare_save(&mut self, track: Track) -> Result<SavePrepared, SessionError> {
        // One in-flight submission per customer: the save trigger is
        // disabled while any track of this session is submitting.
        for other in Track::ALL {
            if matches!(self.slot(other).phase, TrackPhase::Submitting { .. }) {
                return Err(SessionError::SubmissionInFlight(other));
            }
        }

        let TrackPhase::Editing { draft, .. } = &self.slot(track).phase else {
            return Err(SessionError::NotEditing(track));
        };
        let draft = draft.clone();

        if let Err(validation) = validate_track(&draft) {
            if let TrackPhase::Editing { errors, .. } = &mut self.slot_mut(track).phase {
                *errors = validation.clone();
            }
            return Err(SessionError::Validation(validation));
        }

        let changes = diff_track(&self.baseline, &draft, self.role);
        if changes.is_empty() {
            let slot = self.slot_mut(track);
            slot.phase = TrackPhase::Viewing;
            slot.notice = Some(Notice::NoChanges);
            return Ok(SavePrepared::NoChanges);
        }

        let tag = RequestTag::new(self.baseline.id().clone(), track);
        self.slot_mut(track).phase = TrackPhase::Submitting {
            draft,
            tag: tag.clone(),
        };
        Ok(SavePrepared::Pending(PendingSubmission { tag, changes }))
    }

    /// Reconcile a submission response with the current state.
    ///
    /// A response whose tag no longer matches the track's in-flight
    /// submission - the edit was cancelled, or a different customer was
    /// selected - is discarded without touching anything.
    pub fn resolve_save(
        &mut self,
        tag: &RequestTag,
        result: Result<Customer, ApiError>,
    ) -> SaveResolution {
        let matches_in_flight = *self.baseline.id() == tag.customer
            && matches!(
                &self.slot(tag.track).phase,
                TrackPhase::Submitting { tag: current, .. } if current == tag
            );
        if !matches_in_flight {
            tracing::debug!(
                customer = %tag.customer,
                track = %tag.track,
                "discarding stale submission response"
            );
            return SaveResolution::Stale;
        }

        match result {
            Ok(updated) => {
                self.baseline = updated.clone();
                let slot = self.slot_mut(tag.track);
                slot.phase = TrackPhase::Viewing;
                slot.notice = Some(Notice::Saved);
                SaveResolution::Saved(updated)
            }
            Err(error) => {
                let server_errors = error.field_errors().cloned().unwrap_or_default();
                let slot = self.slot_mut(tag.track);
                let TrackPhase::Submitting { draft, .. } =
                    std::mem::replace(&mut slot.phase, TrackPhase::Viewing)
                else {
                    // Guarded by matches_in_flight above.
                    return SaveResolution::Stale;
                };
                slot.phase = TrackPhase::Editing {
                    draft,
                    errors: server_errors,
                };
                SaveResolution::Failed(error)
            }
        }
    }

    /// Validate, diff, dispatch, and reconcile one track's save.
    ///
    /// # Errors
    ///
    /// Everything [`Self::prepare_save`] raises, plus the API failure
    /// when the dispatch itself fails - in which case the track is back
    /// in editing with the attempted values intact.
    pub async fn save(
        &mut self,
        track: Track,
        client: &ApiClient,
    ) -> Result<SaveOutcome, SessionError> {
        let pending = match self.prepare_save(track)? {
            SavePrepared::NoChanges => return Ok(SaveOutcome::NoChanges),
            SavePrepared::Pending(pending) => pending,
        };

        let result = client
            .patch_customer(&pending.tag.customer, &pending.changes)
            .await;

        match self.resolve_save(&pending.tag, result) {
            SaveResolution::Saved(updated) => Ok(SaveOutcome::Saved(updated)),
            SaveResolution::Failed(error) => Err(error.into()),
            SaveResolution::Stale => {
                // Unreachable while the session is exclusively borrowed
                // across the await; kept total for external drivers.
                tracing::debug!(track = %track, "submission resolved as stale");
                Ok(SaveOutcome::NoChanges)
            }
        }
    }

    /// Replace the baseline with a freshly fetched record.
    ///
    /// Used when the roster refreshes while this session is open: only
    /// the baseline used for future diffs moves; any working copy stays
    /// untouched. A record for a different customer is ignored.
    pub fn refresh_baseline(&mut self, customer: Customer) {
        if customer.id() != self.baseline.id() {
            tracing::warn!(
                incoming = %customer.id(),
                current = %self.baseline.id(),
                "ignoring baseline refresh for a different customer"
            );
            return;
        }
        self.baseline = customer;
    }
}
