//! Composite status - the customer-level badge derived from the three
//! tracks' status + approval labels.
//!
//! The "No Action" aggregate is a display simplification only: it never
//! gates editing, which stays per-track regardless of the badge.

use serde::{Deserialize, Serialize};

use crate::track::Track;

/// Approval labels that count as a positive outcome for a track.
pub const POSITIVE_APPROVALS: [&str; 4] = ["Approved", "Accepted", "Paid", "Completed"];

/// Approval labels that count as a negative outcome for a track.
pub const NEGATIVE_APPROVALS: [&str; 3] = ["Rejected", "Declined", "Failed"];

/// Approval label shown while an admin is still looking at a track.
pub const UNDER_REVIEW: &str = "Under Review";

/// Status labels meaning the employee finished the track and it now awaits
/// admin approval.
pub const DONE_PENDING_APPROVAL: [&str; 3] = ["Paid", "Agreement Done", "Settlement Done"];

/// The "nothing happened yet" status sentinel per track.
///
/// These match the backend's enumeration strings exactly, including the
/// misspelling in the agreement value. Matching is case-sensitive; the
/// backend enumeration is the source of truth.
#[must_use]
pub const fn status_sentinel(track: Track) -> &'static str {
    match track {
        Track::Payment => "Not Paid",
        Track::Agreement => "No Agrement",
        Track::Settlement => "No Settlement",
    }
}

/// Color tone of one track's badge segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Warning,
    Info,
    Neutral,
}

impl Tone {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Neutral => "neutral",
        }
    }
}

/// One track's resolved labels, as fed to the resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackGlance<'a> {
    /// Resolved status label, `None` when unresolved/absent.
    pub status: Option<&'a str>,
    /// Resolved admin-approval label.
    pub approval: Option<&'a str>,
}

/// Per-track tones of a non-"No Action" badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackTones {
    pub payment: Tone,
    pub agreement: Tone,
    pub settlement: Tone,
}

impl TrackTones {
    #[must_use]
    pub const fn get(&self, track: Track) -> Tone {
        match track {
            Track::Payment => self.payment,
            Track::Agreement => self.agreement,
            Track::Settlement => self.settlement,
        }
    }
}

/// The customer-level badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// All three statuses sit at their sentinels; nothing to do.
    NoAction,
    /// Independent P/A/S tones.
    Tracks(TrackTones),
}

/// Resolver output for one customer card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeStatus {
    pub badge: Badge,
    pub pinned: bool,
    pub online: bool,
}

/// Everything the resolver needs about one customer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerGlance<'a> {
    pub payment: TrackGlance<'a>,
    pub agreement: TrackGlance<'a>,
    pub settlement: TrackGlance<'a>,
    pub pinned: bool,
    pub online: bool,
}

impl CustomerGlance<'_> {
    #[must_use]
    pub const fn track(&self, track: Track) -> TrackGlance<'_> {
        match track {
            Track::Payment => self.payment,
            Track::Agreement => self.agreement,
            Track::Settlement => self.settlement,
        }
    }

    /// Derive the customer-level badge.
    ///
    /// The "No Action" short-circuit fires when every raw status equals its
    /// sentinel, regardless of approval values; otherwise each track
    /// resolves independently through [`track_tone`].
    #[must_use]
    pub fn resolve(&self) -> CompositeStatus {
        let no_action = Track::ALL
            .iter()
            .all(|&track| self.track(track).status == Some(status_sentinel(track)));

        let badge = if no_action {
            Badge::NoAction
        } else {
            Badge::Tracks(TrackTones {
                payment: track_tone(self.payment),
                agreement: track_tone(self.agreement),
                settlement: track_tone(self.settlement),
            })
        };

        CompositeStatus {
            badge,
            pinned: self.pinned,
            online: self.online,
        }
    }
}

/// Resolve one track's tone, in priority order: the admin approval wins
/// over anything status-derived.
#[must_use]
pub fn track_tone(glance: TrackGlance<'_>) -> Tone {
    if let Some(approval) = glance.approval {
        if POSITIVE_APPROVALS.contains(&approval) {
            return Tone::Positive;
        }
        if NEGATIVE_APPROVALS.contains(&approval) {
            return Tone::Negative;
        }
        if approval == UNDER_REVIEW {
            return Tone::Info;
        }
    }
    match glance.status {
        Some(status) if DONE_PENDING_APPROVAL.contains(&status) => Tone::Warning,
        _ => Tone::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn untouched() -> CustomerGlance<'static> {
        CustomerGlance {
            payment: TrackGlance {
                status: Some("Not Paid"),
                approval: None,
            },
            agreement: TrackGlance {
                status: Some("No Agrement"),
                approval: None,
            },
            settlement: TrackGlance {
                status: Some("No Settlement"),
                approval: None,
            },
            pinned: false,
            online: false,
        }
    }

    #[test]
    fn test_no_action_requires_all_three_sentinels() {
        assert_eq!(untouched().resolve().badge, Badge::NoAction);

        // Approvals do not break the aggregate.
        let mut glance = untouched();
        glance.payment.approval = Some("Approved");
        assert_eq!(glance.resolve().badge, Badge::NoAction);

        // Any status leaving its sentinel does.
        let mut glance = untouched();
        glance.settlement.status = Some("Settlement Done");
        let Badge::Tracks(tones) = glance.resolve().badge else {
            panic!("expected per-track badge");
        };
        assert_eq!(tones.settlement, Tone::Warning);
        assert_eq!(tones.payment, Tone::Neutral);
    }

    #[test]
    fn test_sentinel_match_is_case_sensitive() {
        let mut glance = untouched();
        glance.agreement.status = Some("no agrement");
        assert!(matches!(glance.resolve().badge, Badge::Tracks(_)));
    }

    #[test]
    fn test_done_status_pending_approval_is_warning() {
        let tone = track_tone(TrackGlance {
            status: Some("Paid"),
            approval: Some("N/A"),
        });
        assert_eq!(tone, Tone::Warning);
    }

    #[test]
    fn test_approval_overrides_status_tone() {
        let tone = track_tone(TrackGlance {
            status: Some("Paid"),
            approval: Some("Approved"),
        });
        assert_eq!(tone, Tone::Positive);

        let tone = track_tone(TrackGlance {
            status: Some("Agreement Done"),
            approval: Some("Rejected"),
        });
        assert_eq!(tone, Tone::Negative);

        let tone = track_tone(TrackGlance {
            status: Some("Settlement Done"),
            approval: Some("Under Review"),
        });
        assert_eq!(tone, Tone::Info);
    }

    #[test]
    fn test_unmatched_labels_are_neutral() {
        let tone = track_tone(TrackGlance {
            status: Some("Pending"),
            approval: None,
        });
        assert_eq!(tone, Tone::Neutral);
        assert_eq!(track_tone(TrackGlance::default()), Tone::Neutral);
    }
}
