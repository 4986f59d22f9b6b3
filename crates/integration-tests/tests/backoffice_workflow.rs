//! Integration tests for the customer lifecycle workflow.
//!
//! These tests require:
//! - A reachable bureau backend (`VIVAHA_API_BASE_URL`)
//! - A valid API token (`VIVAHA_API_TOKEN`)
//! - At least one customer visible to the credential
//!
//! Run with: cargo test -p vivaha-integration-tests -- --ignored

use vivaha_backoffice::api::RosterScope;
use vivaha_backoffice::session::SaveOutcome;
use vivaha_backoffice::{ApiClient, BackofficeConfig, LookupCache, Roster};
use vivaha_core::track::{LOOKUP_NAMES, Track};
use vivaha_core::{EmployeeId, FieldValue};

fn config() -> BackofficeConfig {
    BackofficeConfig::from_env().expect("VIVAHA_API_BASE_URL and VIVAHA_API_TOKEN must be set")
}

async fn roster() -> Roster {
    let config = config();
    let client = ApiClient::new(&config).expect("client");
    let lookups = LookupCache::new(client.clone());
    lookups.load_all().await;
    let mut roster = Roster::new(client, lookups, config.role, config.actor_id.clone());
    roster.refresh().await.expect("roster refresh");
    roster
}

#[tokio::test]
#[ignore = "Requires a live bureau backend and credentials"]
async fn test_customer_list_parses_either_envelope() {
    let config = config();
    let client = ApiClient::new(&config).expect("client");

    // Whatever the backend's pagination settings, the list must parse.
    let customers = client
        .list_customers(RosterScope::All)
        .await
        .expect("list customers");
    for customer in &customers {
        assert!(!customer.user_id.is_empty());
    }
}

#[tokio::test]
#[ignore = "Requires a live bureau backend and credentials"]
async fn test_every_lookup_table_loads() {
    let config = config();
    let client = ApiClient::new(&config).expect("client");
    let lookups = LookupCache::new(client);

    let tables = lookups.load_all().await;
    for name in LOOKUP_NAMES {
        assert!(tables.contains_key(name), "missing table {name}");
    }
}

#[tokio::test]
#[ignore = "Requires a live bureau backend and credentials"]
async fn test_save_without_changes_sends_nothing() {
    let mut roster = roster().await;
    let Some(id) = roster.customers().first().map(|c| c.id().clone()) else {
        return; // No visible customers in this environment
    };

    let session = roster.select(&id).expect("select");
    session.begin_edit(Track::Payment).expect("begin edit");
    let outcome = roster.save_track(Track::Payment).await.expect("save");
    assert!(matches!(outcome, SaveOutcome::NoChanges));
}

#[tokio::test]
#[ignore = "Requires a live bureau backend and credentials"]
async fn test_bank_name_patch_round_trip() {
    let mut roster = roster().await;
    let Some(id) = roster.customers().first().map(|c| c.id().clone()) else {
        return;
    };
    let original = roster.get(&id).and_then(|c| c.bank_name.clone());

    let marker = format!("integration-{}", uuid::Uuid::new_v4());
    let session = roster.select(&id).expect("select");
    session.begin_edit(Track::Payment).expect("begin edit");
    session
        .set_field(
            Track::Payment,
            "bank_name",
            FieldValue::Text(marker.clone()),
        )
        .expect("set field");

    match roster.save_track(Track::Payment).await {
        Ok(SaveOutcome::Saved(updated)) => {
            assert_eq!(updated.bank_name.as_deref(), Some(marker.as_str()));
        }
        Ok(SaveOutcome::NoChanges) => panic!("a changed field must be submitted"),
        // Backends enforcing the required subset may reject records that
        // were never initialized; that is a data precondition, not a
        // protocol failure.
        Err(error) => eprintln!("skipping round trip: {error}"),
    }

    // Best-effort restore.
    if let Ok(session) = roster.select(&id) {
        let restore = original.map_or(FieldValue::Null, FieldValue::Text);
        if session.begin_edit(Track::Payment).is_ok()
            && session
                .set_field(Track::Payment, "bank_name", restore)
                .is_ok()
        {
            let _ = roster.save_track(Track::Payment).await;
        }
    }
}

#[tokio::test]
#[ignore = "Requires a live bureau backend, credentials, and an admin role"]
async fn test_assignment_rescopes_the_roster() {
    let mut roster = roster().await;
    let employees = roster.employees().await.expect("employee directory");
    let Some(target) = employees.first().map(|e| e.user_id.clone()) else {
        return;
    };
    let Some(customer) = roster.customers().first().map(|c| c.id().clone()) else {
        return;
    };

    roster.assign(&customer, &target).await.expect("assign");

    // The list was refetched; if the customer is still visible its owner
    // must now be the target employee.
    if let Some(row) = roster.get(&customer) {
        let owner = row.assigned_employee.as_ref().expect("owner");
        assert_eq!(owner.id(), &target);
    }
}

#[tokio::test]
#[ignore = "Requires a live bureau backend and credentials"]
async fn test_assignment_rejects_empty_employee() {
    let mut roster = roster().await;
    let Some(customer) = roster.customers().first().map(|c| c.id().clone()) else {
        return;
    };
    let err = roster
        .assign(&customer, &EmployeeId::new(""))
        .await
        .expect_err("empty employee id");
    assert!(matches!(
        err,
        vivaha_backoffice::roster::RosterError::MissingEmployee
    ));
}
