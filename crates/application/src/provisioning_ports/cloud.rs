use std::collections::BTreeMap;

use aaprov_core::AppResult;
use aaprov_domain::{ContentLink, PackageSpec, ScheduleSpec, Target, TenantCredential};
use async_trait::async_trait;
use uuid::Uuid;

/// Resource group returned by the management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    /// Resource group name.
    pub name: String,
    /// Azure region.
    pub location: String,
}

/// Resource returned by a filtered resource listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudResource {
    /// Resource name.
    pub name: String,
    /// Provider resource type, e.g. `Microsoft.Storage/storageAccounts`.
    pub resource_type: String,
    /// Resource kind when the provider reports one.
    pub kind: Option<String>,
}

/// Port for remote listing used by target discovery.
#[async_trait]
pub trait ResourceDiscoveryClient: Send + Sync {
    /// Lists resource groups of one subscription in remote order.
    async fn list_resource_groups(
        &self,
        credential: &TenantCredential,
        subscription_id: &str,
    ) -> AppResult<Vec<ResourceGroup>>;

    /// Lists resources of one type inside a resource group (server-side filter).
    async fn list_resources(
        &self,
        credential: &TenantCredential,
        subscription_id: &str,
        resource_group_name: &str,
        resource_type: &str,
    ) -> AppResult<Vec<CloudResource>>;
}

/// Address of one automation account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountScope {
    /// Subscription id.
    pub subscription_id: String,
    /// Resource group name.
    pub resource_group_name: String,
    /// Automation account name.
    pub account_name: String,
}

impl AccountScope {
    /// Returns the scope of a target's automation account.
    #[must_use]
    pub fn for_target(target: &Target) -> Self {
        Self {
            subscription_id: target.subscription_id().to_owned(),
            resource_group_name: target.resource_group_name().to_owned(),
            account_name: target.account_name().as_str().to_owned(),
        }
    }
}

/// Automation account create-or-update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountUpsertRequest {
    /// Azure region.
    pub location: String,
    /// Resource tags.
    pub tags: BTreeMap<String, String>,
    /// SKU name.
    pub sku_name: String,
}

/// Variable create-or-update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableUpsertRequest {
    /// Variable name.
    pub name: String,
    /// JSON-encoded value.
    pub value: String,
    /// Variable description.
    pub description: String,
    /// Whether the service stores the value encrypted.
    pub is_encrypted: bool,
}

/// Runbook create-or-update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunbookUpsertRequest {
    /// Runbook name.
    pub name: String,
    /// Azure region.
    pub location: String,
    /// Resource tags.
    pub tags: BTreeMap<String, String>,
    /// Runtime type, e.g. `Python3`.
    pub runbook_type: String,
    /// Verbose job logging.
    pub log_verbose: bool,
    /// Progress job logging.
    pub log_progress: bool,
    /// Activity trace level.
    pub log_activity_trace: u32,
    /// Runbook description.
    pub description: String,
    /// Published content reference.
    pub content_link: ContentLink,
}

/// Job schedule creation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobScheduleCreateRequest {
    /// Association identifier.
    pub job_schedule_id: Uuid,
    /// Runbook to run.
    pub runbook_name: String,
    /// Triggering schedule.
    pub schedule_name: String,
    /// Hybrid worker group, `None` for cloud jobs.
    pub run_on: Option<String>,
    /// Runbook parameters.
    pub parameters: BTreeMap<String, String>,
}

/// Resource returned by a create-or-update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertedResource {
    /// Resource id.
    pub id: String,
    /// Resource name.
    pub name: String,
}

/// Variable returned by a create-or-update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertedVariable {
    /// Variable name.
    pub name: String,
    /// Stored JSON-encoded value.
    pub value: String,
}

/// Port for automation-account create-or-update operations.
///
/// Every operation is an idempotent upsert keyed by name, except
/// `create_job_schedule` which reports an existing association as
/// `AppError::Conflict`.
#[async_trait]
pub trait AutomationClient: Send + Sync {
    /// Creates or updates the automation account.
    async fn upsert_account(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        request: &AccountUpsertRequest,
    ) -> AppResult<UpsertedResource>;

    /// Creates or updates one variable.
    async fn upsert_variable(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        request: &VariableUpsertRequest,
    ) -> AppResult<UpsertedVariable>;

    /// Creates or updates one runbook from a content link.
    async fn upsert_runbook(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        request: &RunbookUpsertRequest,
    ) -> AppResult<UpsertedResource>;

    /// Creates or updates one schedule.
    async fn upsert_schedule(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        schedule: &ScheduleSpec,
    ) -> AppResult<UpsertedResource>;

    /// Creates one runbook-schedule association.
    async fn create_job_schedule(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        request: &JobScheduleCreateRequest,
    ) -> AppResult<UpsertedResource>;

    /// Creates or updates one script package.
    async fn upsert_package(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        package: &PackageSpec,
    ) -> AppResult<UpsertedResource>;
}
