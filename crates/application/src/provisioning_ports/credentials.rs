use aaprov_core::{AppResult, TenantName};
use aaprov_domain::TenantCredential;
use async_trait::async_trait;

/// Port resolving a tenant name to its service principal credential.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns the tenant's credential, or `AppError::Credential` when it is
    /// missing or unparsable.
    async fn credential_for(&self, tenant: &TenantName) -> AppResult<TenantCredential>;
}
