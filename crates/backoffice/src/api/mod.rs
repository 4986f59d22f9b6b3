//! HTTP client for the bureau API.
//!
//! A thin, typed layer over `reqwest`: list fetches with tolerant
//! envelopes, changed-fields-only PATCH (JSON or multipart depending on
//! whether the change set carries file bytes), and the assignment
//! endpoint. Auth is a configured token injected on every request; the
//! surrounding application owns the rest of the credential lifecycle.

mod envelope;

pub use envelope::ListEnvelope;

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use vivaha_core::diff::ChangeSet;
use vivaha_core::{Customer, CustomerId, Employee, EmployeeId, FieldValue, LookupOption};

use crate::config::BackofficeConfig;
use crate::error::ApiError;

/// Which slice of the customer list to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterScope {
    /// Every customer the credential may see.
    All,
    /// Customers assigned to the acting employee (or their admin's team);
    /// the backend derives the actor from the credential.
    Mine,
}

impl RosterScope {
    const fn path(self) -> &'static str {
        match self {
            Self::All => "customers/",
            Self::Mine => "customers/mine/",
        }
    }
}

/// Bureau API client.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: url::Url,
}

impl ApiClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &BackofficeConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Token {}", config.token());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ApiError::Parse(format!("invalid token format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }

    /// Fetch the customer list for a scope.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body does not parse.
    #[instrument(skip(self))]
    pub async fn list_customers(&self, scope: RosterScope) -> Result<Vec<Customer>, ApiError> {
        let envelope: ListEnvelope<Customer> = self.get_json(scope.path()).await?;
        Ok(envelope.into_rows("customers"))
    }

    /// Fetch the employee directory for the assignment picker.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body does not parse.
    #[instrument(skip(self))]
    pub async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        let envelope: ListEnvelope<Employee> = self.get_json("employees/").await?;
        Ok(envelope.into_rows("employees"))
    }

    /// Fetch one lookup table by name.
    ///
    /// Unusable entries within the table are skipped, not fatal; an
    /// unexpected envelope degrades to an empty table.
    ///
    /// # Errors
    ///
    /// Returns an error when the request itself fails.
    #[instrument(skip(self))]
    pub async fn fetch_lookup(&self, name: &str) -> Result<Vec<LookupOption>, ApiError> {
        let envelope: ListEnvelope<Value> = self.get_json(&format!("{name}/")).await?;
        let rows = envelope.into_rows(name);
        let total = rows.len();
        let options: Vec<LookupOption> = rows.iter().filter_map(LookupOption::from_value).collect();
        if options.len() < total {
            tracing::warn!(
                lookup = name,
                skipped = total - options.len(),
                "skipped unusable lookup entries"
            );
        }
        Ok(options)
    }

    /// Issue a changed-fields-only partial update for one customer.
    ///
    /// The encoding follows the change set: multipart when any changed
    /// field carries file bytes, JSON otherwise. The body never contains
    /// unchanged fields.
    ///
    /// # Errors
    ///
    /// Returns the taxonomy-mapped failure; the caller decides what to do
    /// with the edit state.
    #[instrument(skip(self, changes), fields(customer_id = %id, track = %changes.track()))]
    pub async fn patch_customer(
        &self,
        id: &CustomerId,
        changes: &ChangeSet,
    ) -> Result<Customer, ApiError> {
        let url = self.url(&format!("customer/{id}/"));
        let request = self.inner.client.patch(&url);

        let request = if changes.has_upload() {
            let mut form = reqwest::multipart::Form::new();
            for (name, value) in changes.iter() {
                form = match value {
                    FieldValue::Upload(upload) => {
                        let part = reqwest::multipart::Part::bytes(upload.bytes.clone())
                            .file_name(upload.filename.clone())
                            .mime_str(&upload.content_type)?;
                        form.part(name, part)
                    }
                    other => form.text(name, other.form_text()),
                };
            }
            request.multipart(form)
        } else {
            request.json(&Value::Object(changes.json_body()))
        };

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Reassign a customer to a different employee.
    ///
    /// A whole-field replacement, not a diff: ownership is a single
    /// atomic relationship.
    ///
    /// # Errors
    ///
    /// Returns the taxonomy-mapped failure.
    #[instrument(skip(self))]
    pub async fn assign_customer(
        &self,
        customer: &CustomerId,
        employee: &EmployeeId,
    ) -> Result<(), ApiError> {
        let url = self.url("assign/customer-to-employee/");
        let body = serde_json::json!({
            "employee_user_id": employee,
            "customer_user_id": customer,
        });
        let response = self.inner.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status, &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self.inner.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_response(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse API response"
            );
            ApiError::Parse(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_paths() {
        assert_eq!(RosterScope::All.path(), "customers/");
        assert_eq!(RosterScope::Mine.path(), "customers/mine/");
    }
}
