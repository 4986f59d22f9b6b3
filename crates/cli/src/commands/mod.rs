//! CLI command implementations.

pub mod assign;
pub mod customers;
pub mod lookups;

use vivaha_backoffice::{ApiClient, BackofficeConfig, ConfigError, LookupCache, Roster};

/// Build a refreshed roster from the environment configuration.
///
/// Loads `.env`, constructs the client, warms the lookup cache, and
/// fetches the role-visible customer list.
pub(crate) async fn open_roster()
-> Result<(Roster, BackofficeConfig), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = BackofficeConfig::from_env()?;
    let client = ApiClient::new(&config)?;
    let lookups = LookupCache::new(client.clone());
    lookups.load_all().await;

    let mut roster = Roster::new(client, lookups, config.role, config.actor_id.clone());
    roster.refresh().await?;
    Ok((roster, config))
}

/// Narrow config-only setup for commands that do not need the roster.
pub(crate) fn load_config() -> Result<BackofficeConfig, ConfigError> {
    dotenvy::dotenv().ok();
    BackofficeConfig::from_env()
}
