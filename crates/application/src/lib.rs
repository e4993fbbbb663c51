//! Application services and ports.

#![forbid(unsafe_code)]

mod content_link_service;
mod provisioning_ports;
mod provisioning_run_service;
mod provisioning_service;
mod report_service;
mod target_discovery_service;

#[cfg(test)]
mod test_support;

pub use content_link_service::ContentLinkService;
pub use provisioning_ports::{
    AccountScope, AccountUpsertRequest, AutomationClient, CloudResource, ContentStore,
    CredentialProvider, JobScheduleCreateRequest, ReportSheet, ReportSink,
    ResourceDiscoveryClient, ResourceGroup, RunbookUpsertRequest, UpsertedResource,
    UpsertedVariable, VariableUpsertRequest,
};
pub use provisioning_run_service::{
    ProvisioningRun, ProvisioningRunRequest, ProvisioningRunService,
};
pub use provisioning_service::{
    ACCOUNT_TYPE_TAG, AccountTemplate, DEFAULT_ACCOUNT_SKU, DEFAULT_EXCLUDE_AFS,
    ProvisioningPlan, ProvisioningService, RunbookTemplate, VARIABLE_DESCRIPTION,
    VariableTemplate,
};
pub use report_service::{
    REPORT_COLUMNS, ReportService, ReportSummary, SHEET_NAME_LIMIT, SheetFailure,
};
pub use target_discovery_service::{
    DEFAULT_RESOURCE_GROUP_PREFIX, DEFAULT_RESOURCE_KIND, DEFAULT_RESOURCE_TYPE,
    DiscoveryPolicy, TargetDiscoveryService,
};
