//! Session-lifetime lookup cache.
//!
//! Loads enumeration tables once per session (TTL-bounded via `moka`) and
//! resolves opaque ids to display labels. Resolution is total: a failed or
//! partial load degrades to `"N/A"` fallbacks, never an error, because
//! list rendering must survive partially-loaded lookup data.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use vivaha_core::composite::{CompositeStatus, CustomerGlance, TrackGlance};
use vivaha_core::labels::{find_label, resolve_label};
use vivaha_core::track::{FieldSpec, LOOKUP_NAMES, Track};
use vivaha_core::{Customer, FieldValue, LookupOption, OptionId};

use crate::api::ApiClient;

const LOOKUP_CACHE_CAPACITY: u64 = 64;
const LOOKUP_TTL: Duration = Duration::from_secs(30 * 60);

/// Cache of lookup tables keyed by endpoint name.
///
/// Cheap to clone; the cache itself is shared.
#[derive(Clone)]
pub struct LookupCache {
    client: ApiClient,
    cache: Cache<String, Arc<Vec<LookupOption>>>,
}

impl LookupCache {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(LOOKUP_CACHE_CAPACITY)
            .time_to_live(LOOKUP_TTL)
            .build();
        Self { client, cache }
    }

    /// Warm the cache for the given table names, returning what loaded.
    ///
    /// Failures degrade to empty tables (logged); the map always has one
    /// entry per requested name.
    pub async fn load(&self, names: &[&str]) -> HashMap<String, Arc<Vec<LookupOption>>> {
        let mut tables = HashMap::with_capacity(names.len());
        for name in names {
            tables.insert((*name).to_string(), self.table(name).await);
        }
        tables
    }

    /// Warm the cache for every table the track fields reference.
    pub async fn load_all(&self) -> HashMap<String, Arc<Vec<LookupOption>>> {
        self.load(&LOOKUP_NAMES).await
    }

    /// One table by name; an empty table when the fetch fails.
    ///
    /// Failed fetches are not cached, so a later call retries.
    pub async fn table(&self, name: &str) -> Arc<Vec<LookupOption>> {
        let client = self.client.clone();
        let fetch = async move { client.fetch_lookup(name).await.map(Arc::new) };
        match self.cache.try_get_with(name.to_string(), fetch).await {
            Ok(table) => table,
            Err(error) => {
                tracing::warn!(lookup = name, %error, "lookup fetch failed, degrading to empty");
                Arc::new(Vec::new())
            }
        }
    }

    /// Seed a table directly (tests and offline tooling).
    pub async fn insert_table(&self, name: &str, options: Vec<LookupOption>) {
        self.cache.insert(name.to_string(), Arc::new(options)).await;
    }

    /// Resolve one field's display label. Total - see
    /// [`vivaha_core::labels::resolve_label`] for the fallback rules.
    pub async fn resolve_field(&self, spec: &FieldSpec, value: &FieldValue) -> String {
        match spec.lookup {
            Some(name) => {
                let table = self.table(name).await;
                resolve_label(spec, value, Some(&table))
            }
            None => resolve_label(spec, value, None),
        }
    }

    /// The label of one option id within a named table, if present.
    pub async fn option_label(&self, lookup: &str, id: &OptionId) -> Option<String> {
        let table = self.table(lookup).await;
        find_label(&table, id).map(ToString::to_string)
    }

    /// Resolve a customer's composite badge from its three tracks.
    pub async fn customer_badge(&self, customer: &Customer) -> CompositeStatus {
        let mut labels: [(Option<String>, Option<String>); 3] =
            [(None, None), (None, None), (None, None)];

        for (slot, track) in labels.iter_mut().zip(Track::ALL) {
            let status_lookup = track
                .field(track.status_field())
                .and_then(|spec| spec.lookup);
            if let (Some(lookup), Some(id)) = (status_lookup, customer.status(track)) {
                slot.0 = self.option_label(lookup, id).await;
            }
            if let Some(id) = customer.approval(track) {
                slot.1 = self.option_label("admin-approval", id).await;
            }
        }

        let [payment, agreement, settlement] = &labels;
        CustomerGlance {
            payment: TrackGlance {
                status: payment.0.as_deref(),
                approval: payment.1.as_deref(),
            },
            agreement: TrackGlance {
                status: agreement.0.as_deref(),
                approval: agreement.1.as_deref(),
            },
            settlement: TrackGlance {
                status: settlement.0.as_deref(),
                approval: settlement.1.as_deref(),
            },
            pinned: customer.pinned,
            online: customer.online,
        }
        .resolve()
    }
}
