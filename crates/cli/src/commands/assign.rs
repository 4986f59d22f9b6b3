//! Customer reassignment command.
//!
//! # Usage
//!
//! ```bash
//! vivaha assign VB-1041 e-22
//! ```
//!
//! Reassignment is a whole-field replacement of the customer's owning
//! employee; afterwards the roster is refetched because the customer may
//! have left the acting user's visible scope.

use vivaha_core::{CustomerId, EmployeeId};

use super::open_roster;

/// Reassign one customer to one employee.
pub async fn run(customer: &str, employee: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (mut roster, _config) = open_roster().await?;

    let customer = CustomerId::new(customer);
    let employee_id = EmployeeId::new(employee);

    // Name the target when the directory knows it.
    let directory = roster.employees().await.unwrap_or_default();
    let employee_name = directory
        .iter()
        .find(|entry| entry.user_id == employee_id)
        .and_then(|entry| entry.full_name.clone());

    roster.assign(&customer, &employee_id).await?;

    tracing::info!(
        "Assigned {} to {}",
        customer,
        employee_name.unwrap_or_else(|| employee_id.to_string())
    );
    if roster.get(&customer).is_none() {
        tracing::info!("The customer is no longer in your visible roster");
    }
    Ok(())
}
