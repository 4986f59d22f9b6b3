//! Lookup table inspection command.
//!
//! # Usage
//!
//! ```bash
//! # Every table the track fields reference
//! vivaha lookups
//!
//! # Specific tables
//! vivaha lookups payment-status admin-approval
//! ```

use vivaha_backoffice::{ApiClient, LookupCache};
use vivaha_core::track::LOOKUP_NAMES;

use super::load_config;

/// Dump the requested lookup tables (all known tables by default).
pub async fn run(names: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let client = ApiClient::new(&config)?;
    let lookups = LookupCache::new(client);

    let names: Vec<&str> = if names.is_empty() {
        LOOKUP_NAMES.to_vec()
    } else {
        names.iter().map(String::as_str).collect()
    };

    let tables = lookups.load(&names).await;
    for name in names {
        let Some(options) = tables.get(name) else {
            continue;
        };
        tracing::info!("{name} ({} option(s))", options.len());
        for option in options.iter() {
            tracing::info!("  {:<6} {}", option.id, option.label);
        }
    }
    Ok(())
}
