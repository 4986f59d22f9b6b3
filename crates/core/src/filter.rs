//! Roster filter state.
//!
//! An explicit value object instead of ambient globals: the back office
//! persists it between sessions and every screen reads the same shape.

use serde::{Deserialize, Serialize};

/// Which slice of the roster a screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RosterView {
    /// Every customer visible to the actor.
    #[default]
    All,
    /// Customers assigned to the acting employee.
    Mine,
    /// Any track done and awaiting admin approval.
    MyEmployeesRequests,
    /// Payment track done and awaiting admin approval.
    PaymentApproval,
    /// All three tracks still at their sentinels.
    NoAction,
}

impl std::fmt::Display for RosterView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Mine => "mine",
            Self::MyEmployeesRequests => "my-employees-requests",
            Self::PaymentApproval => "payment-approval",
            Self::NoAction => "no-action",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for RosterView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "mine" => Ok(Self::Mine),
            "my-employees-requests" => Ok(Self::MyEmployeesRequests),
            "payment-approval" => Ok(Self::PaymentApproval),
            "no-action" => Ok(Self::NoAction),
            _ => Err(format!("invalid roster view: {s}")),
        }
    }
}

/// Persisted filter state for the customer roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterState {
    #[serde(default)]
    pub view: RosterView,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: usize,
}

impl FilterState {
    /// Reset to defaults (used by the store's `clear`).
    #[must_use]
    pub fn cleared() -> Self {
        Self::default()
    }
}
