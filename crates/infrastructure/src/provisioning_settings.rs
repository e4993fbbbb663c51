use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use aaprov_application::{
    AccountTemplate, ContentLinkService, CredentialProvider, DEFAULT_ACCOUNT_SKU,
    DEFAULT_EXCLUDE_AFS, DiscoveryPolicy, ProvisioningPlan, ProvisioningRunRequest,
    ProvisioningRunService, ProvisioningService, ReportService, RunbookTemplate,
    TargetDiscoveryService, VariableTemplate,
};
use aaprov_core::{AppError, AppResult};
use aaprov_domain::{
    PackageSpec, RunbookScheduleLink, RunbookSpec, ScheduleFrequency, ScheduleSpec,
    ScheduleSpecInput, Tenant,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::arm_management_client::{ArmManagementClient, DEFAULT_ARM_ENDPOINT};
use crate::azure_token_provider::{AzureTokenProvider, DEFAULT_LOGIN_ENDPOINT};
use crate::blob_content_store::{BlobContentStore, DEFAULT_BLOB_ENDPOINT_SUFFIX};
use crate::csv_report_sink::{CsvReportSink, DEFAULT_REPORT_OUTPUT_DIR};

/// Name of the published backup runbook.
pub const BACKUP_RUNBOOK_NAME: &str = "afs_backuprunbook";

/// Name of the published deletion runbook.
pub const DELETION_RUNBOOK_NAME: &str = "afs_deletionrunbook";

/// Start of the default daily schedule.
pub const DEFAULT_SCHEDULE_START_TIME: &str = "2025-01-23T00:00:00Z";

const DEFAULT_PACKAGE_NAME: &str = "azure-identity";
const DEFAULT_PACKAGE_VERSION: &str = "23.2.0";
const DEFAULT_PACKAGE_URI: &str = "https://files.pythonhosted.org/packages/05/ed/85b5e33b2d5ee8ae12228a77f74a484cd6bf58d3288d8524498a02cf0c8c/azure_mgmt_resource-23.2.0-py3-none-any.whl";

/// Timeout and retry policy for every remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteCallSettings {
    /// Per-call timeout.
    pub timeout: Duration,
    /// Attempts per call including the first one.
    pub max_attempts: u8,
    /// Linear backoff step between attempts.
    pub retry_backoff_ms: u64,
}

impl Default for RemoteCallSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            retry_backoff_ms: 500,
        }
    }
}

/// Everything a provisioning run needs, resolved from the environment.
#[derive(Debug, Clone)]
pub struct ProvisioningSettings {
    /// Tenant seeds in processing order.
    pub tenants: Vec<Tenant>,
    /// Runbook scripts published into every account.
    pub runbooks: Vec<RunbookSpec>,
    /// Static provisioning plan.
    pub plan: ProvisioningPlan,
    /// Discovery filters.
    pub discovery_policy: DiscoveryPolicy,
    /// Tenants processed at once.
    pub tenant_concurrency: usize,
    /// Resource manager endpoint.
    pub arm_endpoint: String,
    /// Identity platform endpoint.
    pub login_endpoint: String,
    /// Blob host suffix appended to the storage account name.
    pub blob_endpoint_suffix: String,
    /// Remote call policy.
    pub remote_calls: RemoteCallSettings,
    /// Directory receiving the report workbook.
    pub report_output_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PackageEntry {
    name: String,
    version: String,
    content_uri: String,
}

impl ProvisioningSettings {
    /// Loads settings from the process environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tenants = load_tenants(&lookup)?;

        let storage_account = required(&lookup, "scriptstoragename")?;
        let container = required(&lookup, "containername")?;
        let runbooks = vec![
            RunbookSpec::new(
                BACKUP_RUNBOOK_NAME,
                storage_account.as_str(),
                container.as_str(),
                required(&lookup, "backuprunbookblob")?,
                lookup("backupsastoken").unwrap_or_default(),
            )?,
            RunbookSpec::new(
                DELETION_RUNBOOK_NAME,
                storage_account.as_str(),
                container.as_str(),
                required(&lookup, "deletionrunbookblob")?,
                lookup("deletionsastoken").unwrap_or_default(),
            )?,
        ];

        let schedule_name = required(&lookup, "schedule_name")?;
        let start_time = parse_start_time(
            optional(&lookup, "SCHEDULE_START_TIME")
                .as_deref()
                .unwrap_or(DEFAULT_SCHEDULE_START_TIME),
        )?;
        let schedule = ScheduleSpec::new(ScheduleSpecInput {
            name: schedule_name.clone(),
            start_time,
            expiry_time: None,
            frequency: ScheduleFrequency::Day,
            interval: 1,
            time_zone: "UTC".to_owned(),
            description: None,
            advanced_schedule: None,
        })?;
        let links = runbooks
            .iter()
            .map(|runbook| RunbookScheduleLink::new(runbook.runbook_name(), schedule_name.as_str()))
            .collect();

        let plan = ProvisioningPlan {
            account: AccountTemplate::with_account_type(
                lookup("automationaccounttags").unwrap_or_default().trim(),
                optional(&lookup, "automationaccountsku")
                    .unwrap_or_else(|| DEFAULT_ACCOUNT_SKU.to_owned()),
            ),
            variables: VariableTemplate {
                exclude_afs: optional(&lookup, "EXCLUDE_AFS_VALUE")
                    .unwrap_or_else(|| DEFAULT_EXCLUDE_AFS.to_owned()),
                retention_days: optional(&lookup, "RetentionDays"),
                ..VariableTemplate::default()
            },
            runbook: RunbookTemplate::default(),
            schedules: vec![schedule],
            links,
            packages: load_packages(&lookup)?,
            stage_concurrency: parsed(&lookup, "STAGE_CONCURRENCY", 1_usize)?,
        };

        let remote_defaults = RemoteCallSettings::default();
        let remote_calls = RemoteCallSettings {
            timeout: Duration::from_secs(parsed(
                &lookup,
                "REMOTE_CALL_TIMEOUT_SECONDS",
                remote_defaults.timeout.as_secs(),
            )?),
            max_attempts: parsed(
                &lookup,
                "REMOTE_CALL_MAX_ATTEMPTS",
                remote_defaults.max_attempts,
            )?,
            retry_backoff_ms: parsed(
                &lookup,
                "REMOTE_CALL_RETRY_BACKOFF_MS",
                remote_defaults.retry_backoff_ms,
            )?,
        };

        Ok(Self {
            tenants,
            runbooks,
            plan,
            discovery_policy: DiscoveryPolicy::default(),
            tenant_concurrency: parsed(&lookup, "TENANT_CONCURRENCY", 1_usize)?,
            arm_endpoint: optional(&lookup, "ARM_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ARM_ENDPOINT.to_owned()),
            login_endpoint: optional(&lookup, "AZURE_LOGIN_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_LOGIN_ENDPOINT.to_owned()),
            blob_endpoint_suffix: optional(&lookup, "BLOB_ENDPOINT_SUFFIX")
                .unwrap_or_else(|| DEFAULT_BLOB_ENDPOINT_SUFFIX.to_owned()),
            remote_calls,
            report_output_dir: optional(&lookup, "REPORT_OUTPUT_DIR")
                .unwrap_or_else(|| DEFAULT_REPORT_OUTPUT_DIR.to_owned())
                .into(),
        })
    }

    /// Returns the run request described by these settings.
    #[must_use]
    pub fn run_request(&self) -> ProvisioningRunRequest {
        ProvisioningRunRequest {
            tenants: self.tenants.clone(),
            runbooks: self.runbooks.clone(),
        }
    }

    /// Wires the Azure adapters into a run service.
    pub fn build_run_service(
        &self,
        credential_provider: Arc<dyn CredentialProvider>,
    ) -> AppResult<ProvisioningRunService> {
        let http_client = reqwest::Client::builder()
            .timeout(self.remote_calls.timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

        let token_provider = Arc::new(AzureTokenProvider::new(
            http_client.clone(),
            self.login_endpoint.as_str(),
            self.arm_endpoint.as_str(),
        ));
        let management_client = Arc::new(ArmManagementClient::new(
            http_client.clone(),
            token_provider,
            self.arm_endpoint.as_str(),
            self.remote_calls.max_attempts,
            self.remote_calls.retry_backoff_ms,
        )?);
        let content_store = Arc::new(BlobContentStore::new(
            http_client,
            self.blob_endpoint_suffix.as_str(),
        ));
        let report_sink = Arc::new(CsvReportSink::new(self.report_output_dir.clone()));

        Ok(ProvisioningRunService::new(
            credential_provider,
            TargetDiscoveryService::new(management_client.clone())
                .with_policy(self.discovery_policy.clone()),
            ContentLinkService::new(content_store),
            ProvisioningService::new(management_client, self.plan.clone()),
        )
        .with_report_service(ReportService::new(report_sink))
        .with_tenant_concurrency(self.tenant_concurrency))
    }
}

fn load_tenants<F>(lookup: &F) -> AppResult<Vec<Tenant>>
where
    F: Fn(&str) -> Option<String>,
{
    let (source, document) = if let Some(inline) = optional(lookup, "PROVISIONING_TENANTS") {
        ("PROVISIONING_TENANTS".to_owned(), inline)
    } else if let Some(path) = optional(lookup, "PROVISIONING_TENANTS_FILE") {
        let document = std::fs::read_to_string(&path).map_err(|error| {
            AppError::Validation(format!(
                "failed to read PROVISIONING_TENANTS_FILE '{path}': {error}"
            ))
        })?;
        (path, document)
    } else {
        return Err(AppError::Validation(
            "PROVISIONING_TENANTS or PROVISIONING_TENANTS_FILE is required".to_owned(),
        ));
    };

    serde_json::from_str::<Vec<Tenant>>(&document)
        .map_err(|error| AppError::Validation(format!("invalid tenant seeds in {source}: {error}")))
}

fn load_packages<F>(lookup: &F) -> AppResult<Vec<PackageSpec>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(document) = optional(lookup, "PYTHON_PACKAGES") else {
        return Ok(vec![PackageSpec::new(
            DEFAULT_PACKAGE_NAME,
            DEFAULT_PACKAGE_VERSION,
            DEFAULT_PACKAGE_URI,
        )?]);
    };

    serde_json::from_str::<Vec<PackageEntry>>(&document)
        .map_err(|error| AppError::Validation(format!("invalid PYTHON_PACKAGES: {error}")))?
        .into_iter()
        .map(|entry| PackageSpec::new(entry.name, entry.version, entry.content_uri))
        .collect()
}

fn parse_start_time(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|start_time| start_time.with_timezone(&Utc))
        .map_err(|error| {
            AppError::Validation(format!("invalid SCHEDULE_START_TIME '{value}': {error}"))
        })
}

fn required<F>(lookup: &F, name: &str) -> AppResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parsed<F, T>(lookup: &F, name: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(lookup, name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}")))
        })
        .transpose()
        .map(|value| value.unwrap_or(default))
}
