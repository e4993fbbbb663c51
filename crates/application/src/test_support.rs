use std::collections::{HashMap, HashSet};

use aaprov_core::{AppError, AppResult, TenantName};
use aaprov_domain::{
    ContentLink, PackageSpec, RunbookScheduleLink, RunbookSpec, ScheduleFrequency, ScheduleSpec,
    ScheduleSpecInput, Subscription, Target, TenantCredential,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::provisioning_ports::{
    AccountScope, AccountUpsertRequest, AutomationClient, CloudResource, ContentStore,
    CredentialProvider, JobScheduleCreateRequest, ReportSheet, ReportSink,
    ResourceDiscoveryClient, ResourceGroup, RunbookUpsertRequest, UpsertedResource,
    UpsertedVariable, VariableUpsertRequest,
};
use crate::provisioning_service::ProvisioningPlan;

pub(crate) fn tenant_name(value: &str) -> TenantName {
    TenantName::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn credential() -> TenantCredential {
    TenantCredential::new("tenant-id", "client-id", "client-secret")
        .unwrap_or_else(|_| unreachable!())
}

pub(crate) fn subscription(id: &str) -> Subscription {
    Subscription {
        id: id.to_owned(),
        name: format!("{id}-name"),
        created_time: "createdtime".to_owned(),
    }
}

pub(crate) fn target(subscription_id: &str, resource_group: &str, resources: &[&str]) -> Target {
    Target::discovered(
        &subscription(subscription_id),
        resource_group,
        "westeurope",
        resources.iter().map(|name| (*name).to_owned()).collect(),
    )
    .unwrap_or_else(|_| unreachable!())
}

pub(crate) fn runbook_spec(runbook_name: &str, blob_name: &str) -> RunbookSpec {
    RunbookSpec::new(runbook_name, "scripts", "runbooks", blob_name, "?sv=token")
        .unwrap_or_else(|_| unreachable!())
}

pub(crate) fn content_link(runbook_name: &str, body: &str) -> ContentLink {
    let spec = runbook_spec(runbook_name, &format!("{runbook_name}.py"));
    ContentLink::for_script(
        &spec,
        &format!("https://scripts.blob.core.windows.net/runbooks/{runbook_name}.py"),
        body,
    )
    .unwrap_or_else(|_| unreachable!())
}

pub(crate) fn daily_plan() -> ProvisioningPlan {
    let start_time = "2025-01-23T00:00:00Z"
        .parse::<DateTime<Utc>>()
        .unwrap_or_else(|_| unreachable!());
    let schedule = ScheduleSpec::new(ScheduleSpecInput {
        name: "daily-backup".to_owned(),
        start_time,
        expiry_time: None,
        frequency: ScheduleFrequency::Day,
        interval: 1,
        time_zone: "UTC".to_owned(),
        description: None,
        advanced_schedule: None,
    })
    .unwrap_or_else(|_| unreachable!());
    let package = PackageSpec::new(
        "azure-identity",
        "23.2.0",
        "https://files.pythonhosted.org/packages/azure_mgmt_resource-23.2.0-py3-none-any.whl",
    )
    .unwrap_or_else(|_| unreachable!());

    ProvisioningPlan {
        schedules: vec![schedule],
        links: vec![
            RunbookScheduleLink::new("afs_backuprunbook", "daily-backup"),
            RunbookScheduleLink::new("afs_deletionrunbook", "daily-backup"),
        ],
        packages: vec![package],
        ..ProvisioningPlan::default()
    }
}

#[derive(Default)]
pub(crate) struct FakeCredentialProvider {
    pub(crate) known_tenants: HashSet<String>,
}

impl FakeCredentialProvider {
    pub(crate) fn with_tenants(tenants: &[&str]) -> Self {
        Self {
            known_tenants: tenants.iter().map(|tenant| (*tenant).to_owned()).collect(),
        }
    }
}

#[async_trait]
impl CredentialProvider for FakeCredentialProvider {
    async fn credential_for(&self, tenant: &TenantName) -> AppResult<TenantCredential> {
        if self.known_tenants.contains(tenant.as_str()) {
            return Ok(credential());
        }

        Err(AppError::Credential(format!(
            "no credential configured for tenant '{tenant}'"
        )))
    }
}

#[derive(Default)]
pub(crate) struct FakeDiscoveryClient {
    pub(crate) resource_groups: HashMap<String, Vec<ResourceGroup>>,
    pub(crate) resources: HashMap<(String, String), Vec<CloudResource>>,
    pub(crate) failing_subscriptions: HashSet<String>,
    pub(crate) resource_queries: Mutex<Vec<(String, String, String)>>,
}

impl FakeDiscoveryClient {
    pub(crate) fn with_group(
        mut self,
        subscription_id: &str,
        resource_group: &str,
        resources: Vec<CloudResource>,
    ) -> Self {
        self.resource_groups
            .entry(subscription_id.to_owned())
            .or_default()
            .push(ResourceGroup {
                name: resource_group.to_owned(),
                location: "westeurope".to_owned(),
            });
        self.resources.insert(
            (subscription_id.to_owned(), resource_group.to_owned()),
            resources,
        );
        self
    }
}

pub(crate) fn storage_account(name: &str, kind: &str) -> CloudResource {
    CloudResource {
        name: name.to_owned(),
        resource_type: "Microsoft.Storage/storageAccounts".to_owned(),
        kind: Some(kind.to_owned()),
    }
}

#[async_trait]
impl ResourceDiscoveryClient for FakeDiscoveryClient {
    async fn list_resource_groups(
        &self,
        _credential: &TenantCredential,
        subscription_id: &str,
    ) -> AppResult<Vec<ResourceGroup>> {
        if self.failing_subscriptions.contains(subscription_id) {
            return Err(AppError::Discovery(format!(
                "subscription '{subscription_id}' is not accessible"
            )));
        }

        Ok(self
            .resource_groups
            .get(subscription_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_resources(
        &self,
        _credential: &TenantCredential,
        subscription_id: &str,
        resource_group_name: &str,
        resource_type: &str,
    ) -> AppResult<Vec<CloudResource>> {
        self.resource_queries.lock().await.push((
            subscription_id.to_owned(),
            resource_group_name.to_owned(),
            resource_type.to_owned(),
        ));

        Ok(self
            .resources
            .get(&(subscription_id.to_owned(), resource_group_name.to_owned()))
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|resource| resource.resource_type == resource_type)
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub(crate) account: String,
    pub(crate) operation: &'static str,
    pub(crate) name: String,
}

#[derive(Default)]
pub(crate) struct FakeAutomationClient {
    pub(crate) failing: HashSet<(String, &'static str)>,
    pub(crate) existing_job_schedules: HashSet<Uuid>,
    pub(crate) calls: Mutex<Vec<RecordedCall>>,
    pub(crate) variables: Mutex<Vec<(String, VariableUpsertRequest)>>,
    pub(crate) runbooks: Mutex<Vec<(String, RunbookUpsertRequest)>>,
    pub(crate) job_schedules: Mutex<Vec<(String, JobScheduleCreateRequest)>>,
}

impl FakeAutomationClient {
    pub(crate) fn failing(mut self, account: &str, operation: &'static str) -> Self {
        self.failing.insert((account.to_owned(), operation));
        self
    }

    pub(crate) async fn operations_for(&self, account: &str) -> Vec<&'static str> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| call.account == account)
            .map(|call| call.operation)
            .collect()
    }

    async fn record(
        &self,
        scope: &AccountScope,
        operation: &'static str,
        name: &str,
    ) -> AppResult<UpsertedResource> {
        self.calls.lock().await.push(RecordedCall {
            account: scope.account_name.clone(),
            operation,
            name: name.to_owned(),
        });

        if self
            .failing
            .contains(&(scope.account_name.clone(), operation))
        {
            return Err(AppError::Upstream(format!(
                "{operation} '{name}' rejected for '{}'",
                scope.account_name
            )));
        }

        Ok(UpsertedResource {
            id: format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Automation/automationAccounts/{}/{operation}/{name}",
                scope.subscription_id, scope.resource_group_name, scope.account_name
            ),
            name: name.to_owned(),
        })
    }
}

#[async_trait]
impl AutomationClient for FakeAutomationClient {
    async fn upsert_account(
        &self,
        _credential: &TenantCredential,
        scope: &AccountScope,
        _request: &AccountUpsertRequest,
    ) -> AppResult<UpsertedResource> {
        let account_name = scope.account_name.clone();
        self.record(scope, "account", &account_name).await
    }

    async fn upsert_variable(
        &self,
        _credential: &TenantCredential,
        scope: &AccountScope,
        request: &VariableUpsertRequest,
    ) -> AppResult<UpsertedVariable> {
        self.record(scope, "variable", &request.name).await?;
        self.variables
            .lock()
            .await
            .push((scope.account_name.clone(), request.clone()));
        Ok(UpsertedVariable {
            name: request.name.clone(),
            value: request.value.clone(),
        })
    }

    async fn upsert_runbook(
        &self,
        _credential: &TenantCredential,
        scope: &AccountScope,
        request: &RunbookUpsertRequest,
    ) -> AppResult<UpsertedResource> {
        let resource = self.record(scope, "runbook", &request.name).await?;
        self.runbooks
            .lock()
            .await
            .push((scope.account_name.clone(), request.clone()));
        Ok(resource)
    }

    async fn upsert_schedule(
        &self,
        _credential: &TenantCredential,
        scope: &AccountScope,
        schedule: &ScheduleSpec,
    ) -> AppResult<UpsertedResource> {
        self.record(scope, "schedule", schedule.name()).await
    }

    async fn create_job_schedule(
        &self,
        _credential: &TenantCredential,
        scope: &AccountScope,
        request: &JobScheduleCreateRequest,
    ) -> AppResult<UpsertedResource> {
        let resource = self
            .record(scope, "job_schedule", &request.job_schedule_id.to_string())
            .await?;
        if self.existing_job_schedules.contains(&request.job_schedule_id) {
            return Err(AppError::Conflict(format!(
                "job schedule '{}' already exists",
                request.job_schedule_id
            )));
        }

        self.job_schedules
            .lock()
            .await
            .push((scope.account_name.clone(), request.clone()));
        Ok(resource)
    }

    async fn upsert_package(
        &self,
        _credential: &TenantCredential,
        scope: &AccountScope,
        package: &PackageSpec,
    ) -> AppResult<UpsertedResource> {
        self.record(scope, "package", &package.name).await
    }
}

#[derive(Default)]
pub(crate) struct FakeContentStore {
    pub(crate) scripts: HashMap<String, String>,
}

impl FakeContentStore {
    pub(crate) fn with_script(mut self, blob_name: &str, body: &str) -> Self {
        self.scripts.insert(blob_name.to_owned(), body.to_owned());
        self
    }
}

#[async_trait]
impl ContentStore for FakeContentStore {
    async fn read_script(&self, spec: &RunbookSpec) -> AppResult<String> {
        self.scripts.get(spec.blob_name()).cloned().ok_or_else(|| {
            AppError::ContentFetch(format!("blob '{}' does not exist", spec.blob_name()))
        })
    }

    fn blob_url(&self, spec: &RunbookSpec) -> AppResult<String> {
        Ok(format!(
            "https://{}.blob.core.windows.net/{}/{}",
            spec.storage_account(),
            spec.container(),
            spec.blob_name()
        ))
    }
}

#[derive(Default)]
pub(crate) struct FakeReportSink {
    pub(crate) failing_sheets: HashSet<String>,
    pub(crate) sheets: Mutex<Vec<ReportSheet>>,
}

#[async_trait]
impl ReportSink for FakeReportSink {
    async fn write_sheet(&self, sheet: &ReportSheet) -> AppResult<()> {
        if self.failing_sheets.contains(&sheet.name) {
            return Err(AppError::ReportRender(format!(
                "sheet '{}' could not be written",
                sheet.name
            )));
        }

        self.sheets.lock().await.push(sheet.clone());
        Ok(())
    }
}
