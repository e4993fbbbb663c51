use std::collections::HashMap;

use aaprov_application::CredentialProvider;
use aaprov_core::{AppError, AppResult, TenantName};
use aaprov_domain::TenantCredential;
use async_trait::async_trait;

/// Resolves credentials from variables keyed by tenant name.
///
/// Each entry holds `tenantId:<id>,clientId:<id>,clientSecret:<secret>`.
pub struct EnvCredentialProvider {
    entries: HashMap<String, String>,
}

impl EnvCredentialProvider {
    /// Snapshots the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_entries(std::env::vars())
    }

    /// Creates a provider over explicit entries.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn credential_for(&self, tenant: &TenantName) -> AppResult<TenantCredential> {
        let raw = self
            .entries
            .get(tenant.as_str())
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AppError::Credential(format!("no credential entry for tenant '{tenant}'"))
            })?;

        TenantCredential::parse(raw).map_err(|error| error.context(format!("tenant '{tenant}'")))
    }
}
