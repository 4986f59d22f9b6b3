//! The customer roster: role-scoped list, selection, filtered views, and
//! the assignment sub-flow.

use vivaha_core::composite::{Badge, CompositeStatus, Tone};
use vivaha_core::filter::{FilterState, RosterView};
use vivaha_core::track::Track;
use vivaha_core::{Customer, CustomerId, Employee, EmployeeId, Role};

use crate::api::{ApiClient, RosterScope};
use crate::error::ApiError;
use crate::lookups::LookupCache;
use crate::session::{EditSession, SaveOutcome, SessionError};

/// Errors raised by roster operations.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("unknown customer: {0}")]
    UnknownCustomer(CustomerId),
    #[error("no customer is selected")]
    NoSelection,
    #[error("an employee must be selected for assignment")]
    MissingEmployee,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The customer list plus the (at most one) open edit session.
pub struct Roster {
    client: ApiClient,
    lookups: LookupCache,
    role: Role,
    actor: Option<EmployeeId>,
    customers: Vec<Customer>,
    session: Option<EditSession>,
}

impl Roster {
    #[must_use]
    pub const fn new(
        client: ApiClient,
        lookups: LookupCache,
        role: Role,
        actor: Option<EmployeeId>,
    ) -> Self {
        Self {
            client,
            lookups,
            role,
            actor,
            customers: Vec::new(),
            session: None,
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The lookup cache backing badges and label resolution.
    #[must_use]
    pub const fn lookups(&self) -> &LookupCache {
        &self.lookups
    }

    const fn scope(&self) -> RosterScope {
        match self.role {
            Role::Admin => RosterScope::All,
            Role::Employee => RosterScope::Mine,
        }
    }

    /// Refetch the role-visible customer list.
    ///
    /// Safe to call with an open edit session: the selected customer's
    /// refetched record replaces only the session's baseline; any working
    /// copy stays untouched.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the previous list is kept on error.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let customers = self.client.list_customers(self.scope()).await?;
        self.customers = customers;

        if let Some(session) = &mut self.session
            && let Some(current) = self
                .customers
                .iter()
                .find(|customer| customer.id() == session.customer_id())
        {
            session.refresh_baseline(current.clone());
        }
        Ok(())
    }

    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    #[must_use]
    pub fn get(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|customer| customer.id() == id)
    }

    /// Open an edit session on one customer.
    ///
    /// Any previous session - including in-progress edits - is silently
    /// discarded; the UI offers no confirmation dialog for this.
    ///
    /// # Errors
    ///
    /// Fails when the id is not in the current list.
    pub fn select(&mut self, id: &CustomerId) -> Result<&mut EditSession, RosterError> {
        let customer = self
            .get(id)
            .cloned()
            .ok_or_else(|| RosterError::UnknownCustomer(id.clone()))?;
        self.session = Some(EditSession::new(customer, self.role));
        Ok(self.session.as_mut().expect("session just set"))
    }

    /// Drop the open edit session, if any.
    pub fn deselect(&mut self) {
        self.session = None;
    }

    #[must_use]
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    /// Save one track of the selected customer and fold the server's
    /// record back into the list.
    ///
    /// # Errors
    ///
    /// Fails when nothing is selected, plus everything the session save
    /// raises.
    pub async fn save_track(&mut self, track: Track) -> Result<SaveOutcome, RosterError> {
        let session = self.session.as_mut().ok_or(RosterError::NoSelection)?;
        let outcome = session.save(track, &self.client).await?;
        if let SaveOutcome::Saved(updated) = &outcome {
            merge_customer(&mut self.customers, updated.clone());
        }
        Ok(outcome)
    }

    /// Composite badge for one customer card.
    pub async fn badge(&self, customer: &Customer) -> CompositeStatus {
        self.lookups.customer_badge(customer).await
    }

    /// The customers matching a filter, in list order.
    pub async fn filtered(&self, filter: &FilterState) -> Vec<&Customer> {
        let needle = filter
            .search
            .as_deref()
            .map(str::to_lowercase)
            .filter(|needle| !needle.is_empty());

        let mut matches = Vec::new();
        for customer in &self.customers {
            if let Some(needle) = &needle
                && !search_matches(customer, needle)
            {
                continue;
            }
            if self.view_matches(customer, filter.view).await {
                matches.push(customer);
            }
        }
        matches
    }

    async fn view_matches(&self, customer: &Customer, view: RosterView) -> bool {
        match view {
            RosterView::All => true,
            RosterView::Mine => match (&self.actor, &customer.assigned_employee) {
                (Some(actor), Some(owner)) => owner.id() == actor,
                _ => false,
            },
            RosterView::MyEmployeesRequests => {
                match self.lookups.customer_badge(customer).await.badge {
                    Badge::Tracks(tones) => Track::ALL
                        .iter()
                        .any(|&track| tones.get(track) == Tone::Warning),
                    Badge::NoAction => false,
                }
            }
            RosterView::PaymentApproval => {
                match self.lookups.customer_badge(customer).await.badge {
                    Badge::Tracks(tones) => tones.payment == Tone::Warning,
                    Badge::NoAction => false,
                }
            }
            RosterView::NoAction => {
                self.lookups.customer_badge(customer).await.badge == Badge::NoAction
            }
        }
    }

    /// Reassign a customer to a different employee and refetch the list,
    /// since the customer may have left this actor's visible scope.
    ///
    /// # Errors
    ///
    /// Fails on an empty employee id (before any network call) and on
    /// API failures from the assignment or the refetch.
    pub async fn assign(
        &mut self,
        customer: &CustomerId,
        employee: &EmployeeId,
    ) -> Result<(), RosterError> {
        if employee.is_empty() {
            return Err(RosterError::MissingEmployee);
        }
        self.client.assign_customer(customer, employee).await?;
        self.refresh().await?;
        Ok(())
    }

    /// The employee directory for the assignment picker.
    ///
    /// # Errors
    ///
    /// Returns the API failure.
    pub async fn employees(&self) -> Result<Vec<Employee>, ApiError> {
        self.client.list_employees().await
    }
}

fn search_matches(customer: &Customer, needle: &str) -> bool {
    customer.user_id.as_str().to_lowercase().contains(needle)
        || customer
            .full_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(needle))
}

/// Replace a customer's row with the server's authoritative projection,
/// appending when the row was not yet listed.
fn merge_customer(customers: &mut Vec<Customer>, updated: Customer) {
    match customers.iter_mut().find(|row| row.id() == updated.id()) {
        Some(row) => *row = updated,
        None => customers.push(updated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackofficeConfig;
    use vivaha_core::{EmployeeRef, LookupOption, OptionId};

    fn offline_roster(role: Role, actor: Option<EmployeeId>) -> Roster {
        let config = BackofficeConfig::from_vars(|name| match name {
            "VIVAHA_API_BASE_URL" => Some("http://127.0.0.1:1/".to_string()),
            "VIVAHA_API_TOKEN" => Some("tok-offline-tests".to_string()),
            _ => None,
        })
        .expect("config");
        let client = ApiClient::new(&config).expect("client");
        let lookups = LookupCache::new(client.clone());
        Roster::new(client, lookups, role, actor)
    }

    async fn seed_lookups(roster: &Roster) {
        let option = |id: &str, label: &str| LookupOption {
            id: OptionId::new(id),
            label: label.to_string(),
        };
        roster
            .lookups
            .insert_table(
                "payment-status",
                vec![option("0", "Not Paid"), option("2", "Paid")],
            )
            .await;
        roster
            .lookups
            .insert_table("agreement-status", vec![option("0", "No Agrement")])
            .await;
        roster
            .lookups
            .insert_table("settlement-status", vec![option("0", "No Settlement")])
            .await;
        roster
            .lookups
            .insert_table("admin-approval", vec![option("3", "N/A")])
            .await;
    }

    fn untouched(id: &str, owner: &str) -> Customer {
        let mut customer = Customer::empty(id);
        customer.assigned_employee = Some(EmployeeRef::Id(EmployeeId::new(owner)));
        customer.payment_status = Some(OptionId::new("0"));
        customer.agreement_status = Some(OptionId::new("0"));
        customer.settlement_status = Some(OptionId::new("0"));
        customer
    }

    #[test]
    fn test_select_unknown_customer_fails() {
        let mut roster = offline_roster(Role::Admin, None);
        let err = roster
            .select(&CustomerId::new("ghost"))
            .map(|_| ())
            .expect_err("unknown");
        assert!(matches!(err, RosterError::UnknownCustomer(id) if id.as_str() == "ghost"));
    }

    #[test]
    fn test_select_discards_previous_session() {
        let mut roster = offline_roster(Role::Admin, None);
        roster.customers = vec![untouched("c-1", "e-1"), untouched("c-2", "e-1")];

        let session = roster.select(&CustomerId::new("c-1")).expect("select");
        session.begin_edit(Track::Payment).expect("begin");

        // Selecting another customer silently drops the in-progress edit.
        roster.select(&CustomerId::new("c-2")).expect("select");
        let session = roster.session().expect("session");
        assert_eq!(session.customer_id().as_str(), "c-2");
        assert_eq!(
            session.state(Track::Payment),
            crate::session::TrackState::Viewing
        );

        roster.deselect();
        assert!(roster.session().is_none());
    }

    #[tokio::test]
    async fn test_assign_requires_employee_before_any_network() {
        let mut roster = offline_roster(Role::Admin, None);
        let err = roster
            .assign(&CustomerId::new("c-1"), &EmployeeId::new(""))
            .await
            .expect_err("missing employee");
        assert!(matches!(err, RosterError::MissingEmployee));
    }

    #[tokio::test]
    async fn test_filtered_views() {
        let mut roster = offline_roster(Role::Admin, Some(EmployeeId::new("e-1")));
        seed_lookups(&roster).await;

        let quiet = untouched("c-quiet", "e-1");
        let mut busy = untouched("c-busy", "e-2");
        busy.payment_status = Some(OptionId::new("2"));
        busy.payment_admin_approval = Some(OptionId::new("3"));
        roster.customers = vec![quiet, busy];

        let filter = |view: RosterView| FilterState {
            view,
            search: None,
            page: 0,
        };

        let ids = |rows: Vec<&Customer>| -> Vec<String> {
            rows.iter().map(|c| c.id().to_string()).collect()
        };

        assert_eq!(
            ids(roster.filtered(&filter(RosterView::All)).await),
            ["c-quiet", "c-busy"]
        );
        assert_eq!(
            ids(roster.filtered(&filter(RosterView::Mine)).await),
            ["c-quiet"]
        );
        assert_eq!(
            ids(roster.filtered(&filter(RosterView::NoAction)).await),
            ["c-quiet"]
        );
        assert_eq!(
            ids(roster.filtered(&filter(RosterView::PaymentApproval)).await),
            ["c-busy"]
        );
        assert_eq!(
            ids(roster
                .filtered(&filter(RosterView::MyEmployeesRequests))
                .await),
            ["c-busy"]
        );

        // Search narrows any view.
        let searched = FilterState {
            view: RosterView::All,
            search: Some("BUSY".to_string()),
            page: 0,
        };
        assert_eq!(ids(roster.filtered(&searched).await), ["c-busy"]);
    }

    #[test]
    fn test_merge_replaces_or_appends() {
        let mut customers = vec![untouched("c-1", "e-1")];
        let mut updated = untouched("c-1", "e-1");
        updated.bank_name = Some("HDFC".to_string());
        merge_customer(&mut customers, updated);
        assert_eq!(customers.len(), 1);
        assert_eq!(
            customers.first().and_then(|c| c.bank_name.as_deref()),
            Some("HDFC")
        );

        merge_customer(&mut customers, untouched("c-2", "e-2"));
        assert_eq!(customers.len(), 2);
    }
}
